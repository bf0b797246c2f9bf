//! Decoded values.
//!
//! Every decoded leaf is rendered as a string so callers never deal with
//! width-specific integer types: integers as base-10, addresses and byte
//! strings as lower-case `0x` hex, booleans as `true`/`false`.

use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;

/// A decoded ABI value.
///
/// Serialises untagged: a scalar is a string, an array is a list of values,
/// and a tuple is a list of `{name, type, value}` objects. Deserialising
/// tells tuples from arrays by their elements; an empty list reads back as
/// an empty array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DecodedValue {
    /// Any elementary type rendered to text
    Scalar(String),
    /// Tuple members in declaration order
    Tuple(Vec<DecodedParam>),
    /// Fixed or dynamic array elements
    Array(Vec<DecodedValue>),
}

impl DecodedValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DecodedValue::Scalar(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[DecodedValue]> {
        match self {
            DecodedValue::Array(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    pub fn as_tuple(&self) -> Option<&[DecodedParam]> {
        match self {
            DecodedValue::Tuple(v) => Some(v.as_slice()),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for DecodedValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Scalar(String),
            List(Vec<Element>),
        }

        // `Value` first: a tuple member only matches as an object
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Element {
            Value(DecodedValue),
            Member(DecodedParam),
        }

        let items = match Repr::deserialize(deserializer)? {
            Repr::Scalar(s) => return Ok(DecodedValue::Scalar(s)),
            Repr::List(items) => items,
        };
        if matches!(items.first(), Some(Element::Member(_))) {
            items
                .into_iter()
                .map(|item| match item {
                    Element::Member(p) => Ok(p),
                    Element::Value(_) => {
                        Err(<D::Error as de::Error>::custom("tuple mixes members and bare values"))
                    }
                })
                .collect::<Result<_, _>>()
                .map(DecodedValue::Tuple)
        } else {
            items
                .into_iter()
                .map(|item| match item {
                    Element::Value(v) => Ok(v),
                    Element::Member(_) => {
                        Err(<D::Error as de::Error>::custom("array mixes values and tuple members"))
                    }
                })
                .collect::<Result<_, _>>()
                .map(DecodedValue::Array)
        }
    }
}

impl From<String> for DecodedValue {
    fn from(s: String) -> Self {
        DecodedValue::Scalar(s)
    }
}

impl From<&str> for DecodedValue {
    fn from(s: &str) -> Self {
        DecodedValue::Scalar(s.to_string())
    }
}

impl fmt::Display for DecodedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodedValue::Scalar(s) => write!(f, "{s}"),
            DecodedValue::Array(v) => {
                let parts: Vec<_> = v.iter().map(|x| x.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            DecodedValue::Tuple(fields) => {
                let parts: Vec<_> = fields
                    .iter()
                    .map(|p| format!("{}: {}", p.name, p.value))
                    .collect();
                write!(f, "({})", parts.join(", "))
            }
        }
    }
}

/// A named, typed decoded value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedParam {
    pub name: String,
    /// Type name as declared in the definition
    #[serde(rename = "type")]
    pub type_name: String,
    pub value: DecodedValue,
}

impl DecodedParam {
    pub fn new(
        name: impl Into<String>,
        type_name: impl Into<String>,
        value: impl Into<DecodedValue>,
    ) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            value: value.into(),
        }
    }
}
