//! # abidecode-evm
//!
//! Decodes Ethereum ABI payloads against definitions held in an
//! [`AbiLookup`](abidecode_core::AbiLookup) registry.
//!
//! ## Implementation notes
//! - Calldata: first 4 bytes select the function, the rest is the inputs tuple
//! - Logs: `topics[0]` selects the event, `topics[1..]` hold indexed params,
//!   `data` holds the rest
//! - Offsets inside an encoding are relative to the enclosing tuple, see [`engine`]
//! - Unknown selectors and unmatched logs are `Ok(None)`, never errors

pub mod batch;
pub mod call_decoder;
pub mod config;
pub mod decoder;
pub mod engine;
pub mod log_decoder;
pub mod word;

pub use call_decoder::{decode_call, decode_call_bytes, decode_constructor, decode_output};
pub use config::DecoderConfig;
pub use decoder::AbiDecoder;
pub use log_decoder::{decode_log, decode_logs};
