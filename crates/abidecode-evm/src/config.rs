//! Decoder configuration.

use abidecode_core::ErrorMode;
use serde::{Deserialize, Serialize};

/// Tunables for `AbiDecoder` and the batch helpers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoderConfig {
    /// Match logs whose `topics[0]` is not a registered event topic against
    /// the first registered event with as many indexed parameters as the log
    /// has topics (anonymous events).
    #[serde(default = "bool_true")]
    pub anonymous_fallback: bool,
    /// When set, empty parameter names are rendered as `<prefix><index>`.
    #[serde(default)]
    pub unnamed_param_prefix: Option<String>,
    /// Max inputs per parallel chunk in batch decoding
    #[serde(default = "default_chunk_size")]
    pub batch_chunk_size: usize,
    /// How batch decoding handles malformed inputs
    #[serde(default)]
    pub error_mode: ErrorMode,
}

fn bool_true() -> bool { true }
fn default_chunk_size() -> usize { 10_000 }

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            anonymous_fallback: true,
            unnamed_param_prefix: None,
            batch_chunk_size: default_chunk_size(),
            error_mode: ErrorMode::Skip,
        }
    }
}

impl DecoderConfig {
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(s)
    }

    /// Name to report for the parameter at `index` declared as `declared`.
    pub fn param_name(&self, declared: &str, index: usize) -> String {
        match &self.unnamed_param_prefix {
            Some(prefix) if declared.is_empty() => format!("{prefix}{index}"),
            _ => declared.to_string(),
        }
    }
}
