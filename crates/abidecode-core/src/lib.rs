//! # abidecode-core
//!
//! Definition model, type descriptors, and signature codec shared by all
//! abidecode crates. The decode engine, the registry, and the logging
//! setup are built on top of the types defined here.

pub mod abi;
pub mod call;
pub mod decoder;
pub mod error;
pub mod event;
pub mod hexutil;
pub mod signature;
pub mod types;
pub mod value;

pub use abi::{AbiEntry, AbiItem, AbiLookup, AbiParam, EntryKind};
pub use call::DecodedCall;
pub use decoder::{BatchDecodeResult, ErrorMode, ProgressCallback};
pub use error::{AbiError, BatchDecodeError, DecodeError, RegistryError, TypeError};
pub use event::{DecodedLog, RawLog};
pub use types::{Component, Elementary, TypeDescriptor, TypeKind, MAX_NESTING, WORD};
pub use value::{DecodedParam, DecodedValue};
