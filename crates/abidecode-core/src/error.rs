//! Error types for the abidecode pipeline.
//!
//! Expected misses (unknown selector, no matching event) are not errors and
//! never appear here; they surface as `Ok(None)`. Everything below means the
//! caller handed us a definition or payload that violates the ABI contract.

use thiserror::Error;

/// A type name that the descriptor parser cannot accept.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("Unknown ABI type '{ty}'")]
    UnknownType { ty: String },

    #[error("Invalid bit width in '{ty}': must be a multiple of 8 in 8..=256")]
    InvalidIntWidth { ty: String },

    #[error("Invalid size in '{ty}': fixed bytes must be 1..=32")]
    InvalidBytesWidth { ty: String },

    #[error("Invalid array suffix in '{ty}'")]
    InvalidArrayLength { ty: String },

    #[error("Tuple type '{ty}' declared without components")]
    MissingComponents { ty: String },

    #[error("Unbalanced parentheses in '{ty}'")]
    Unbalanced { ty: String },

    #[error("Type '{ty}' nests arrays or tuples deeper than {max} levels")]
    TooDeep { ty: String, max: usize },
}

/// A definition record that cannot become an `AbiEntry`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbiError {
    #[error("Unknown ABI entry type '{kind}'")]
    UnknownEntryKind { kind: String },

    #[error("Invalid parameter '{param}' in '{entry}': {source}")]
    InvalidParam {
        entry: String,
        param: String,
        #[source]
        source: TypeError,
    },
}

/// Errors raised while decoding a payload against a known definition.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Buffer too short: need {needed} bytes at offset {offset}, have {available}")]
    OutOfBounds {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("Offset or length word does not fit in a machine index: 0x{word}")]
    InvalidOffset { word: String },

    #[error("Invalid hex input: {reason}")]
    InvalidHex { reason: String },

    #[error("Invalid UTF-8 in string parameter: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("Invalid topic at index {index}: expected 32 bytes, got {len}")]
    InvalidTopic { index: usize, len: usize },

    #[error("Entry '{name}' cannot be decoded here: {reason}")]
    WrongEntryKind { name: String, reason: String },

    #[error("Type '{ty}' has a width that does not fit in one word")]
    InvalidWidth { ty: String },

    #[error("Decoding would expand past {limit} words for this payload")]
    ExpansionLimit { limit: usize },
}

/// Errors from the definition registry and its import helpers.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Invalid ABI definition: {0}")]
    InvalidDefinition(#[from] AbiError),

    #[error("ABI JSON is neither an array nor an artifact with an 'abi' field")]
    UnrecognizedFormat,

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur during batch decoding.
#[derive(Debug, Error)]
pub enum BatchDecodeError {
    #[error("Decode error at index {index}: {source}")]
    ItemFailed {
        index: usize,
        #[source]
        source: DecodeError,
    },
}
