//! Renders a single 32-byte ABI word as text for an elementary type.
//!
//! Integers go through `alloy-primitives` 256-bit types so values wider than
//! any machine integer render exactly.

use abidecode_core::{error::DecodeError, hexutil::encode_0x, types::Elementary, WORD};
use alloy_primitives::{I256, U256};

/// Decode one word as the given elementary type.
///
/// `bytes` and `string` never sit inline in a word; when they show up here
/// the word is a topic digest and is rendered as raw hex.
///
/// Widths the parser would reject (`int0`, `bytes33`, ...) are an error
/// rather than a panic, since `Elementary` can be built by hand.
pub fn decode_word(word: &[u8; WORD], ty: Elementary) -> Result<String, DecodeError> {
    let invalid = || DecodeError::InvalidWidth { ty: ty.to_string() };
    let rendered = match ty {
        Elementary::Uint(bits) => {
            int_width(bits).ok_or_else(invalid)?;
            U256::from_be_bytes(*word).to_string()
        }
        Elementary::Int(bits) => {
            let width = int_width(bits).ok_or_else(invalid)?;
            sign_extend(word, width).to_string()
        }
        Elementary::Address => encode_0x(&word[12..]),
        Elementary::Bool => {
            if word.iter().any(|b| *b != 0) {
                "true".into()
            } else {
                "false".into()
            }
        }
        Elementary::FixedBytes(n) => {
            let prefix = word.get(..n as usize).filter(|_| n > 0).ok_or_else(invalid)?;
            encode_0x(prefix)
        }
        Elementary::Function => encode_0x(&word[..24]),
        Elementary::Bytes | Elementary::String => encode_0x(word),
    };
    Ok(rendered)
}

/// Byte width of an integer type, if `bits` is a valid ABI width.
fn int_width(bits: u16) -> Option<usize> {
    (bits > 0 && bits <= 256 && bits % 8 == 0).then(|| (bits / 8) as usize)
}

/// Two's-complement sign extension from the top bit of the low `width` bytes.
fn sign_extend(word: &[u8; WORD], width: usize) -> I256 {
    let mut buf = *word;
    if width < WORD {
        let fill = if buf[WORD - width] & 0x80 != 0 { 0xff } else { 0x00 };
        buf[..WORD - width].fill(fill);
    }
    I256::from_raw(U256::from_be_bytes(buf))
}
