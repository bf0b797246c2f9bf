//! # abidecode-registry
//!
//! Definition registry for abidecode.
//!
//! An append-only log of every registered definition plus a selector index
//! with last-write-wins semantics. Definitions come from `AbiEntry` values
//! or JSON ABI documents (bare arrays or compiler artifacts).
//!
//! The public-facing read API is the `AbiLookup` trait from `abidecode-core`.

pub mod json;
pub mod memory;

pub use memory::AbiRegistry;
