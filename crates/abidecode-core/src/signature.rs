//! Canonical signatures and selector derivation.
//!
//! The selector of a function is the first 4 bytes of
//! keccak256 of its canonical signature string, e.g.:
//!   keccak256("transfer(address,uint256)")[..4] → 0xa9059cbb
//!
//! The topic of an event is the full 32-byte digest:
//!   keccak256("Transfer(address,address,uint256)")
//!   → 0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef

use crate::types::TypeDescriptor;
use tiny_keccak::{Hasher, Keccak};

/// keccak256 digest of `input`.
pub fn keccak256(input: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    let mut output = [0u8; 32];
    hasher.update(input);
    hasher.finalize(&mut output);
    output
}

/// `name(type1,type2,...)` with tuples expanded to their component lists.
pub fn signature(name: &str, inputs: &[TypeDescriptor]) -> String {
    let types: Vec<String> = inputs.iter().map(|t| t.to_string()).collect();
    format!("{name}({})", types.join(","))
}

/// First 4 bytes of the signature digest, lower-case hex with `0x` prefix.
pub fn function_selector(signature: &str) -> String {
    let digest = keccak256(signature.as_bytes());
    format!("0x{}", hex::encode(&digest[..4]))
}

/// Full signature digest, lower-case hex with `0x` prefix.
pub fn event_topic(signature: &str) -> String {
    format!("0x{}", hex::encode(keccak256(signature.as_bytes())))
}

/// Normalise a caller-supplied selector or topic for index lookups:
/// lower-case, `0x`-prefixed.
pub fn normalize_selector(selector: &str) -> String {
    let trimmed = selector.trim();
    let body = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    format!("0x{}", body.to_ascii_lowercase())
}
