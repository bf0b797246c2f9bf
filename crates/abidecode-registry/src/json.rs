//! JSON ABI import.
//!
//! Accepts the two shapes ABI JSON is usually found in:
//! - a bare array of ABI items (`solc --abi`, block explorers)
//! - a compiler artifact object with an `abi` array (Hardhat, Foundry)
//!
//! Every item is validated before anything is returned, so a single bad
//! definition rejects the whole document.

use abidecode_core::{
    abi::{AbiEntry, AbiItem},
    error::RegistryError,
};
use serde_json::Value;

/// Parse raw ABI items out of a JSON document.
pub fn parse_items(json: &str) -> Result<Vec<AbiItem>, RegistryError> {
    let doc: Value = serde_json::from_str(json)?;
    let abi = match doc {
        Value::Array(items) => Value::Array(items),
        Value::Object(mut obj) => match obj.remove("abi") {
            Some(abi @ Value::Array(_)) => abi,
            _ => return Err(RegistryError::UnrecognizedFormat),
        },
        _ => return Err(RegistryError::UnrecognizedFormat),
    };
    Ok(serde_json::from_value(abi)?)
}

/// Parse and validate a JSON document into entries ready for registration.
pub fn parse_entries(json: &str) -> Result<Vec<AbiEntry>, RegistryError> {
    into_entries(parse_items(json)?)
}

/// Validate raw items, failing on the first definition that does not parse.
pub fn into_entries(items: Vec<AbiItem>) -> Result<Vec<AbiEntry>, RegistryError> {
    items
        .into_iter()
        .map(|item| AbiEntry::from_item(item).map_err(RegistryError::from))
        .collect()
}
