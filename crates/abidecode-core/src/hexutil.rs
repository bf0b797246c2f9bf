//! Hex helpers for `0x`-prefixed payloads.

use crate::error::DecodeError;

/// Strip an optional `0x`/`0X` prefix.
pub fn strip_0x(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

/// Decode a hex string with or without `0x` prefix. `"0x"` is empty input.
pub fn decode_hex(s: &str) -> Result<Vec<u8>, DecodeError> {
    hex::decode(strip_0x(s.trim())).map_err(|e| DecodeError::InvalidHex {
        reason: e.to_string(),
    })
}

/// Lower-case `0x`-prefixed hex of `bytes`.
pub fn encode_0x(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_payload() {
        assert!(decode_hex("0x").unwrap().is_empty());
    }

    #[test]
    fn mixed_case_accepted() {
        assert_eq!(decode_hex("0xAbCd").unwrap(), vec![0xab, 0xcd]);
    }

    #[test]
    fn odd_length_rejected() {
        assert!(matches!(decode_hex("0xabc"), Err(DecodeError::InvalidHex { .. })));
    }
}
