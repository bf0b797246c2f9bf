//! Types for decoded function calls.
//!
//! These are the output types when decoding transaction calldata
//! (as opposed to event logs, which produce `DecodedLog`).

use crate::value::{DecodedParam, DecodedValue};
use serde::{Deserialize, Serialize};

/// Result of decoding a call payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedCall {
    /// Function name (e.g. "transfer"); empty for constructor arguments
    pub name: String,
    /// Decoded input parameters in declaration order
    pub params: Vec<DecodedParam>,
}

impl DecodedCall {
    /// Look up a decoded parameter by name
    pub fn param(&self, name: &str) -> Option<&DecodedValue> {
        self.params.iter().find(|p| p.name == name).map(|p| &p.value)
    }
}
