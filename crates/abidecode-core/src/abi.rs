//! ABI definition records: the in-memory form of a JSON ABI.
//!
//! `AbiItem` mirrors one element of a JSON ABI array as emitted by solc.
//! `AbiEntry` is the validated, immutable form: every parameter type is
//! parsed and the signature and selector are derived exactly once.

use crate::error::{AbiError, TypeError};
use crate::signature;
use crate::types::TypeDescriptor;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

fn is_false(b: &bool) -> bool {
    !*b
}

/// One declared parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiParam {
    /// Parameter name (may be empty)
    #[serde(default)]
    pub name: String,
    /// Type name as declared, e.g. "uint256[]" or "tuple"
    #[serde(rename = "type")]
    pub type_name: String,
    /// Members of a tuple type, in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<AbiParam>,
    /// Events only: is this parameter stored in a topic?
    #[serde(default, skip_serializing_if = "is_false")]
    pub indexed: bool,
    /// Solidity-level type, e.g. "struct Total"; informational only
    #[serde(
        default,
        rename = "internalType",
        skip_serializing_if = "Option::is_none"
    )]
    pub internal_type: Option<String>,
}

impl AbiParam {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            ..Default::default()
        }
    }

    pub fn indexed(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            indexed: true,
            ..Self::new(name, type_name)
        }
    }

    pub fn tuple(name: impl Into<String>, components: Vec<AbiParam>) -> Self {
        Self {
            components,
            ..Self::new(name, "tuple")
        }
    }

    /// Parse the declared type into a descriptor.
    pub fn resolve(&self) -> Result<TypeDescriptor, TypeError> {
        TypeDescriptor::parse(&self.type_name, &self.components)
    }
}

/// Kind of a top-level ABI element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Function,
    Event,
    Constructor,
    Fallback,
    Receive,
    /// Custom error; selector derived like a function.
    Error,
}

impl EntryKind {
    /// Whether entries of this kind carry a selector.
    pub fn has_selector(&self) -> bool {
        matches!(self, EntryKind::Function | EntryKind::Event | EntryKind::Error)
    }
}

impl FromStr for EntryKind {
    type Err = AbiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "function" => Ok(EntryKind::Function),
            "event" => Ok(EntryKind::Event),
            "constructor" => Ok(EntryKind::Constructor),
            "fallback" => Ok(EntryKind::Fallback),
            "receive" => Ok(EntryKind::Receive),
            "error" => Ok(EntryKind::Error),
            other => Err(AbiError::UnknownEntryKind { kind: other.into() }),
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EntryKind::Function => "function",
            EntryKind::Event => "event",
            EntryKind::Constructor => "constructor",
            EntryKind::Fallback => "fallback",
            EntryKind::Receive => "receive",
            EntryKind::Error => "error",
        };
        write!(f, "{s}")
    }
}

/// One raw JSON ABI element.
///
/// Only `type`, `name`, `inputs` and the `anonymous`/`indexed` flags affect
/// decoding; the remaining fields are carried so a round-trip through serde
/// does not lose them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbiItem {
    /// Entry kind; legacy ABIs omit it for functions
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub inputs: Vec<AbiParam>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<AbiParam>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub anonymous: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constant: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_mutability: Option<String>,
}

/// A validated definition with its derived signature and selector.
///
/// Created once at registration and never mutated.
#[derive(Debug, Clone)]
pub struct AbiEntry {
    kind: EntryKind,
    name: String,
    inputs: Vec<AbiParam>,
    outputs: Vec<AbiParam>,
    anonymous: bool,
    state_mutability: Option<String>,
    input_types: Vec<TypeDescriptor>,
    output_types: Vec<TypeDescriptor>,
    signature: Option<String>,
    selector: Option<String>,
}

impl AbiEntry {
    /// Validate a raw record: parse every parameter type and derive the
    /// signature and selector.
    pub fn from_item(item: AbiItem) -> Result<Self, AbiError> {
        let kind = match item.kind.as_deref() {
            Some(k) => k.parse()?,
            None => EntryKind::Function,
        };
        let name = item.name.unwrap_or_default();

        let input_types = resolve_all(&name, kind, &item.inputs)?;
        let output_types = resolve_all(&name, kind, &item.outputs)?;

        let (signature, selector) = if kind.has_selector() {
            let sig = signature::signature(&name, &input_types);
            let sel = match kind {
                EntryKind::Event => signature::event_topic(&sig),
                _ => signature::function_selector(&sig),
            };
            (Some(sig), Some(sel))
        } else {
            (None, None)
        };

        Ok(Self {
            kind,
            name,
            inputs: item.inputs,
            outputs: item.outputs,
            anonymous: item.anonymous,
            state_mutability: item.state_mutability,
            input_types,
            output_types,
            signature,
            selector,
        })
    }

    /// Shorthand for a function definition.
    pub fn function(name: &str, inputs: Vec<AbiParam>) -> Result<Self, AbiError> {
        Self::from_item(AbiItem {
            kind: Some("function".into()),
            name: Some(name.into()),
            inputs,
            ..Default::default()
        })
    }

    /// Shorthand for an event definition.
    pub fn event(name: &str, inputs: Vec<AbiParam>, anonymous: bool) -> Result<Self, AbiError> {
        Self::from_item(AbiItem {
            kind: Some("event".into()),
            name: Some(name.into()),
            inputs,
            anonymous,
            ..Default::default()
        })
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Declared name; empty for constructor, fallback and receive.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn inputs(&self) -> &[AbiParam] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[AbiParam] {
        &self.outputs
    }

    pub fn anonymous(&self) -> bool {
        self.anonymous
    }

    pub fn state_mutability(&self) -> Option<&str> {
        self.state_mutability.as_deref()
    }

    /// Parsed descriptors for `inputs`, same order.
    pub fn input_types(&self) -> &[TypeDescriptor] {
        &self.input_types
    }

    /// Parsed descriptors for `outputs`, same order.
    pub fn output_types(&self) -> &[TypeDescriptor] {
        &self.output_types
    }

    /// Canonical signature, e.g. `transfer(address,uint256)`.
    pub fn signature(&self) -> Option<&str> {
        self.signature.as_deref()
    }

    /// `0x`-prefixed selector: 4 bytes for functions and errors, 32 bytes
    /// for events.
    pub fn selector(&self) -> Option<&str> {
        self.selector.as_deref()
    }

    pub fn is_event(&self) -> bool {
        self.kind == EntryKind::Event
    }

    /// Number of inputs flagged `indexed`.
    pub fn indexed_count(&self) -> usize {
        self.inputs.iter().filter(|p| p.indexed).count()
    }
}

fn resolve_all(
    entry: &str,
    kind: EntryKind,
    params: &[AbiParam],
) -> Result<Vec<TypeDescriptor>, AbiError> {
    params
        .iter()
        .map(|p| {
            p.resolve().map_err(|source| AbiError::InvalidParam {
                entry: if entry.is_empty() {
                    kind.to_string()
                } else {
                    entry.to_string()
                },
                param: p.name.clone(),
                source,
            })
        })
        .collect()
}

/// A thread-safe, read-only view of a definition registry.
/// The concrete store lives in `abidecode-registry`.
pub trait AbiLookup: Send + Sync {
    /// Most recently registered entry with this selector (function, error,
    /// or event topic). `selector` is matched case-insensitively.
    fn find_by_selector(&self, selector: &str) -> Option<Arc<AbiEntry>>;

    /// Every registered entry in insertion order, duplicates included.
    fn all(&self) -> Vec<Arc<AbiEntry>>;
}

impl<T: AbiLookup + ?Sized> AbiLookup for Arc<T> {
    fn find_by_selector(&self, selector: &str) -> Option<Arc<AbiEntry>> {
        (**self).find_by_selector(selector)
    }

    fn all(&self) -> Vec<Arc<AbiEntry>> {
        (**self).all()
    }
}

impl<T: AbiLookup + ?Sized> AbiLookup for &T {
    fn find_by_selector(&self, selector: &str) -> Option<Arc<AbiEntry>> {
        (**self).find_by_selector(selector)
    }

    fn all(&self) -> Vec<Arc<AbiEntry>> {
        (**self).all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_entry_derives_selector() {
        let entry = AbiEntry::function(
            "create",
            vec![
                AbiParam::new("_owners", "address[]"),
                AbiParam::new("_required", "uint256"),
                AbiParam::new("_dailyLimit", "uint256"),
            ],
        )
        .unwrap();
        assert_eq!(entry.signature(), Some("create(address[],uint256,uint256)"));
        assert_eq!(entry.selector(), Some("0x53d9d910"));
        assert_eq!(entry.input_types().len(), 3);
    }

    #[test]
    fn event_entry_derives_full_topic() {
        let entry = AbiEntry::event(
            "Deposit",
            vec![
                AbiParam::indexed("sender", "address"),
                AbiParam::new("value", "uint256"),
            ],
            false,
        )
        .unwrap();
        assert_eq!(
            entry.selector(),
            Some("0xe1fffcc4923d04b559f4d29a8bfc6cda04eb5b0d3c460751c2402c5c5cc9109c")
        );
        assert_eq!(entry.indexed_count(), 1);
    }

    #[test]
    fn constructor_and_fallback_have_no_selector() {
        let json = r#"[
            {"type": "constructor", "inputs": [{"name": "_required", "type": "uint256"}]},
            {"type": "fallback", "payable": true}
        ]"#;
        let items: Vec<AbiItem> = serde_json::from_str(json).unwrap();
        for item in items {
            let entry = AbiEntry::from_item(item).unwrap();
            assert!(entry.selector().is_none());
            assert!(entry.signature().is_none());
            assert_eq!(entry.name(), "");
        }
    }

    #[test]
    fn missing_type_defaults_to_function() {
        let item: AbiItem =
            serde_json::from_str(r#"{"name": "owner", "inputs": [], "constant": true}"#).unwrap();
        let entry = AbiEntry::from_item(item).unwrap();
        assert_eq!(entry.kind(), EntryKind::Function);
        assert_eq!(entry.selector(), Some("0x8da5cb5b"));
    }

    #[test]
    fn unknown_entry_kind_rejected() {
        let item = AbiItem {
            kind: Some("modifier".into()),
            ..Default::default()
        };
        assert!(matches!(
            AbiEntry::from_item(item),
            Err(AbiError::UnknownEntryKind { .. })
        ));
    }

    #[test]
    fn malformed_param_type_fails_fast() {
        let err = AbiEntry::function("broken", vec![AbiParam::new("x", "uint257")]).unwrap_err();
        assert!(matches!(err, AbiError::InvalidParam { ref param, .. } if param == "x"));
    }

    #[test]
    fn signature_matches_alloy() {
        let json = r#"{
            "type": "function",
            "name": "swap",
            "inputs": [
                {"name": "path", "type": "tuple[]", "components": [
                    {"name": "token", "type": "address"},
                    {"name": "fee", "type": "uint24"}
                ]},
                {"name": "amounts", "type": "uint256[2]"},
                {"name": "data", "type": "bytes"}
            ],
            "outputs": [],
            "stateMutability": "nonpayable"
        }"#;
        let ours = AbiEntry::from_item(serde_json::from_str(json).unwrap()).unwrap();
        let theirs: alloy_json_abi::Function = serde_json::from_str(json).unwrap();
        assert_eq!(ours.signature(), Some(theirs.signature().as_str()));
        assert_eq!(
            ours.selector().unwrap(),
            format!("0x{}", hex::encode(theirs.selector()))
        );
    }

    #[test]
    fn abi_item_serde_keeps_ignored_fields() {
        let json = r#"{"type":"function","name":"f","inputs":[],"outputs":[{"name":"","type":"bool"}],"constant":true,"payable":false,"stateMutability":"view"}"#;
        let item: AbiItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.state_mutability.as_deref(), Some("view"));
        let back: AbiItem = serde_json::from_str(&serde_json::to_string(&item).unwrap()).unwrap();
        assert_eq!(item, back);
    }
}
