//! Raw and decoded log types.

use crate::value::{DecodedParam, DecodedValue};
use serde::{Deserialize, Serialize};

/// A raw, undecoded log entry as returned by `eth_getLogs` or a receipt.
/// This is the input to the log decoder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLog {
    /// Contract address that emitted the log; passed through verbatim
    pub address: String,
    /// 32-byte hex words. For non-anonymous events `topics[0]` is the
    /// event signature hash; the rest are indexed parameters.
    pub topics: Vec<String>,
    /// ABI-encoded non-indexed parameters, `0x`-prefixed hex
    pub data: String,
}

impl RawLog {
    /// `topics[0]`, if present.
    pub fn signature_topic(&self) -> Option<&str> {
        self.topics.first().map(|s| s.as_str())
    }
}

/// A decoded log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedLog {
    /// Matched event name, e.g. "Transfer"
    pub name: String,
    /// Emitting contract, as given in the raw log
    pub address: String,
    /// All event parameters in declaration order, indexed and not
    pub events: Vec<DecodedParam>,
}

impl DecodedLog {
    /// Look up a decoded event parameter by name.
    pub fn event(&self, name: &str) -> Option<&DecodedValue> {
        self.events.iter().find(|p| p.name == name).map(|p| &p.value)
    }
}
