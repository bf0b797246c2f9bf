//! Function-call, constructor, and return-data decoding.
//!
//! # How it works
//! - First 4 bytes of calldata = keccak256(function_signature)[..4] (the selector)
//! - Remaining bytes = ABI-encoded inputs tuple
//! - Constructor: no selector prefix; all bytes = ABI-encoded constructor args
//!
//! An unknown selector is an expected outcome and yields `Ok(None)`.

use abidecode_core::{
    abi::{AbiEntry, AbiLookup, AbiParam, EntryKind},
    call::DecodedCall,
    error::DecodeError,
    hexutil::{decode_hex, encode_0x, strip_0x},
    signature::normalize_selector,
    value::{DecodedParam, DecodedValue},
};
use tracing::{debug, trace};

use crate::{config::DecoderConfig, engine};

/// Selector length in hex characters.
const SELECTOR_HEX_LEN: usize = 8;

/// Decode a `0x`-prefixed call payload against the registry.
pub fn decode_call(
    registry: &dyn AbiLookup,
    payload: &str,
) -> Result<Option<DecodedCall>, DecodeError> {
    decode_call_with(registry, payload, &DecoderConfig::default())
}

/// Same as [`decode_call`] with explicit naming options.
pub fn decode_call_with(
    registry: &dyn AbiLookup,
    payload: &str,
    config: &DecoderConfig,
) -> Result<Option<DecodedCall>, DecodeError> {
    let body = strip_0x(payload.trim());
    if body.len() < SELECTOR_HEX_LEN {
        return Ok(None);
    }
    let (selector, args) = match (body.get(..SELECTOR_HEX_LEN), body.get(SELECTOR_HEX_LEN..)) {
        (Some(sel), Some(rest)) => (sel, rest),
        _ => {
            return Err(DecodeError::InvalidHex {
                reason: "selector is not ASCII hex".into(),
            })
        }
    };
    // a malformed selector is bad input, not a registry miss
    decode_hex(selector)?;
    let selector = normalize_selector(selector);

    let Some(entry) = lookup_callable(registry, &selector) else {
        return Ok(None);
    };

    let args = decode_hex(args)?;
    decode_args(&entry, &args, config).map(Some)
}

/// Decode raw calldata bytes (selector included).
pub fn decode_call_bytes(
    registry: &dyn AbiLookup,
    calldata: &[u8],
    config: &DecoderConfig,
) -> Result<Option<DecodedCall>, DecodeError> {
    if calldata.len() < 4 {
        return Ok(None);
    }
    let selector = encode_0x(&calldata[..4]);
    let Some(entry) = lookup_callable(registry, &selector) else {
        return Ok(None);
    };
    decode_args(&entry, &calldata[4..], config).map(Some)
}

/// Decode constructor arguments (no selector prefix) against a constructor
/// definition.
pub fn decode_constructor(
    entry: &AbiEntry,
    args_hex: &str,
    config: &DecoderConfig,
) -> Result<DecodedCall, DecodeError> {
    if entry.kind() != EntryKind::Constructor {
        return Err(DecodeError::WrongEntryKind {
            name: entry.name().to_string(),
            reason: format!("expected a constructor, got a {}", entry.kind()),
        });
    }
    let args = decode_hex(args_hex)?;
    decode_args(entry, &args, config)
}

/// Decode function return data against the definition's `outputs`.
pub fn decode_output(
    entry: &AbiEntry,
    data_hex: &str,
    config: &DecoderConfig,
) -> Result<Vec<DecodedParam>, DecodeError> {
    if entry.kind() != EntryKind::Function {
        return Err(DecodeError::WrongEntryKind {
            name: entry.name().to_string(),
            reason: format!("only functions have outputs, got a {}", entry.kind()),
        });
    }
    let data = decode_hex(data_hex)?;
    let values = engine::decode_tuple(&data, entry.output_types())?;
    Ok(named_params(entry.outputs(), values, config))
}

fn lookup_callable(registry: &dyn AbiLookup, selector: &str) -> Option<std::sync::Arc<AbiEntry>> {
    match registry.find_by_selector(selector) {
        Some(entry) if matches!(entry.kind(), EntryKind::Function | EntryKind::Error) => Some(entry),
        Some(entry) => {
            debug!(selector, kind = %entry.kind(), "selector belongs to a non-callable entry");
            None
        }
        None => {
            debug!(selector, "no definition registered for selector");
            None
        }
    }
}

fn decode_args(
    entry: &AbiEntry,
    args: &[u8],
    config: &DecoderConfig,
) -> Result<DecodedCall, DecodeError> {
    let values = engine::decode_tuple(args, entry.input_types())?;
    trace!(name = entry.name(), params = values.len(), "decoded call");
    Ok(DecodedCall {
        name: entry.name().to_string(),
        params: named_params(entry.inputs(), values, config),
    })
}

/// Pair decoded values with their declared names and types.
pub(crate) fn named_params(
    params: &[AbiParam],
    values: Vec<DecodedValue>,
    config: &DecoderConfig,
) -> Vec<DecodedParam> {
    params
        .iter()
        .zip(values)
        .enumerate()
        .map(|(i, (param, value))| DecodedParam {
            name: config.param_name(&param.name, i),
            type_name: param.type_name.clone(),
            value,
        })
        .collect()
}
