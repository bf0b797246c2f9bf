//! Head/tail ABI decoding.
//!
//! A tuple encoding is a head of fixed-size slots followed by a tail. Static
//! members sit inline in the head; dynamic members leave a single offset
//! word in the head pointing into the tail. Offsets are relative to the
//! start of the buffer of the tuple being decoded, which for nested values is
//! the sub-slice the parent pointed at, never the top-level payload.
//!
//! All reads are bounds-checked; a short buffer is a `DecodeError`, and a
//! failed decode returns no partial values.
//!
//! Offsets may alias, so one tail can be referenced from many heads. Every
//! decode runs against a word budget proportional to the input size, which
//! keeps work and output linear in the payload no matter how the offsets
//! are arranged.

use abidecode_core::{
    error::DecodeError,
    hexutil::encode_0x,
    types::{Elementary, TypeDescriptor, TypeKind},
    value::{DecodedParam, DecodedValue},
    WORD,
};
use std::iter;

use crate::word::decode_word;

/// Words of decoded output allowed per word of input. A well-formed
/// encoding charges at most two per input word.
const EXPANSION_FACTOR: usize = 4;

/// Remaining decode allowance, in words.
struct Budget {
    limit: usize,
    remaining: usize,
}

impl Budget {
    fn for_input(buf: &[u8]) -> Self {
        let limit = (buf.len() / WORD)
            .saturating_add(1)
            .saturating_mul(EXPANSION_FACTOR);
        Self { limit, remaining: limit }
    }

    fn charge(&mut self, words: usize) -> Result<(), DecodeError> {
        self.remaining = self
            .remaining
            .checked_sub(words)
            .ok_or(DecodeError::ExpansionLimit { limit: self.limit })?;
        Ok(())
    }
}

/// Decode `buf` as the encoding of a tuple whose members have the given
/// types, in order.
pub fn decode_tuple<'t, I>(buf: &[u8], types: I) -> Result<Vec<DecodedValue>, DecodeError>
where
    I: IntoIterator<Item = &'t TypeDescriptor>,
{
    decode_members(buf, types, &mut Budget::for_input(buf))
}

/// Decode one value whose encoding starts at the beginning of `region`.
///
/// For static types `region` is exactly their inline slot; for dynamic types
/// it is everything from the offset their head slot pointed at.
pub fn decode_value(region: &[u8], ty: &TypeDescriptor) -> Result<DecodedValue, DecodeError> {
    decode_one(region, ty, &mut Budget::for_input(region))
}

fn decode_members<'t, I>(
    buf: &[u8],
    types: I,
    budget: &mut Budget,
) -> Result<Vec<DecodedValue>, DecodeError>
where
    I: IntoIterator<Item = &'t TypeDescriptor>,
{
    let mut values = Vec::new();
    let mut head = 0usize;

    for ty in types {
        let value = if ty.is_dynamic() {
            let offset = read_usize(buf, head)?;
            head += WORD;
            decode_one(tail(buf, offset)?, ty, budget)?
        } else {
            let size = ty.head_words().saturating_mul(WORD);
            let region = slice(buf, head, size)?;
            head += size;
            decode_one(region, ty, budget)?
        };
        values.push(value);
    }

    Ok(values)
}

fn decode_one(
    region: &[u8],
    ty: &TypeDescriptor,
    budget: &mut Budget,
) -> Result<DecodedValue, DecodeError> {
    match ty.kind() {
        TypeKind::Elementary(Elementary::Bytes) => {
            let bytes = read_byte_string(region, budget)?;
            Ok(DecodedValue::Scalar(encode_0x(bytes)))
        }
        TypeKind::Elementary(Elementary::String) => {
            let bytes = read_byte_string(region, budget)?;
            Ok(DecodedValue::Scalar(String::from_utf8(bytes.to_vec())?))
        }
        TypeKind::Elementary(e) => {
            budget.charge(1)?;
            Ok(DecodedValue::Scalar(decode_word(&read_word(region, 0)?, *e)?))
        }
        TypeKind::DynamicArray(element) => {
            let len = read_usize(region, 0)?;
            let body = tail(region, WORD)?;
            // each element owns at least one head word, so a claimed length
            // larger than the body can never decode
            let min_size = len
                .checked_mul(element.head_words().max(1))
                .and_then(|w| w.checked_mul(WORD));
            match min_size {
                Some(n) if n <= body.len() => {}
                _ => {
                    return Err(DecodeError::OutOfBounds {
                        offset: WORD,
                        needed: min_size.unwrap_or(usize::MAX),
                        available: body.len(),
                    })
                }
            }
            budget.charge(len.saturating_add(1))?;
            let items = decode_members(body, iter::repeat(&**element).take(len), budget)?;
            Ok(DecodedValue::Array(items))
        }
        TypeKind::FixedArray { element, len } => {
            let items = decode_members(region, iter::repeat(&**element).take(*len), budget)?;
            Ok(DecodedValue::Array(items))
        }
        TypeKind::Tuple(components) => {
            let values = decode_members(region, components.iter().map(|c| &c.ty), budget)?;
            let params = components
                .iter()
                .zip(values)
                .map(|(c, value)| DecodedParam {
                    name: c.name.clone(),
                    type_name: c.type_name.clone(),
                    value,
                })
                .collect();
            Ok(DecodedValue::Tuple(params))
        }
    }
}

/// `bytes`/`string` body: a length word followed by the payload. Only the
/// first `len` bytes are required; trailing zero padding is not checked.
fn read_byte_string<'a>(region: &'a [u8], budget: &mut Budget) -> Result<&'a [u8], DecodeError> {
    let len = read_usize(region, 0)?;
    let bytes = slice(region, WORD, len)?;
    budget.charge(1 + len.div_ceil(WORD))?;
    Ok(bytes)
}

fn slice(buf: &[u8], offset: usize, len: usize) -> Result<&[u8], DecodeError> {
    match offset.checked_add(len) {
        Some(end) if end <= buf.len() => Ok(&buf[offset..end]),
        _ => Err(DecodeError::OutOfBounds {
            offset,
            needed: len,
            available: buf.len().saturating_sub(offset),
        }),
    }
}

fn tail(buf: &[u8], offset: usize) -> Result<&[u8], DecodeError> {
    buf.get(offset..).ok_or(DecodeError::OutOfBounds {
        offset,
        needed: WORD,
        available: 0,
    })
}

fn read_word(buf: &[u8], offset: usize) -> Result<[u8; WORD], DecodeError> {
    let mut word = [0u8; WORD];
    word.copy_from_slice(slice(buf, offset, WORD)?);
    Ok(word)
}

/// An offset or length word. Anything that cannot index memory is malformed.
fn read_usize(buf: &[u8], offset: usize) -> Result<usize, DecodeError> {
    let word = read_word(buf, offset)?;
    let invalid = || DecodeError::InvalidOffset {
        word: hex::encode(word),
    };
    if word[..24].iter().any(|b| *b != 0) {
        return Err(invalid());
    }
    let mut low = [0u8; 8];
    low.copy_from_slice(&word[24..]);
    usize::try_from(u64::from_be_bytes(low)).map_err(|_| invalid())
}
