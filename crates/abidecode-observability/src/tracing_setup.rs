//! Tracing / logging initialisation helpers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError, EnvFilter,
};

/// Log level per component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Global default level: "trace" | "debug" | "info" | "warn" | "error"
    #[serde(default = "default_level")]
    pub level: String,
    /// Override per component, e.g. `abidecode-evm → debug`
    #[serde(default)]
    pub components: BTreeMap<String, String>,
    /// Emit JSON structured logs (true) or human-readable text (false)
    #[serde(default)]
    pub json: bool,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            components: BTreeMap::new(),
            json: false,
        }
    }
}

/// `EnvFilter` directive string for `config`: "info,abidecode_evm=debug" etc.
/// Crate names are accepted with dashes and mapped to their target form.
pub fn directives(config: &LogConfig) -> String {
    let mut out = config.level.clone();
    for (component, level) in &config.components {
        out.push_str(&format!(",{}={}", component.replace('-', "_"), level));
    }
    out
}

/// Filter for `config`, falling back to `info` on an unparseable directive.
pub fn env_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_new(directives(config)).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. Fails if one is already set.
pub fn init_tracing(config: &LogConfig) -> Result<(), TryInitError> {
    let filter = env_filter(config);
    if config.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .try_init()
    }
}
