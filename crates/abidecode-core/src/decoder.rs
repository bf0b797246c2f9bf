//! Batch policy and progress types shared by the decoders.

use crate::error::DecodeError;
use serde::{Deserialize, Serialize};

/// Callback invoked by the batch helpers after each chunk.
/// `processed` is the number of inputs handled so far;
/// `total` is the total count in the current batch.
pub trait ProgressCallback: Send + Sync {
    fn on_progress(&self, processed: usize, total: usize);
}

/// Blanket impl so closures can be used as progress callbacks.
impl<F: Fn(usize, usize) + Send + Sync> ProgressCallback for F {
    fn on_progress(&self, processed: usize, total: usize) {
        self(processed, total)
    }
}

/// Controls how batch decoding reacts to malformed inputs.
///
/// Inputs that simply match no definition are never errors; they are left
/// out of the output in every mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorMode {
    /// Silently skip inputs that fail to decode.
    #[default]
    Skip,
    /// Collect decode errors alongside successes and return both at the end.
    Collect,
    /// Abort the entire batch on first error.
    Throw,
}

/// The output of a batch decode: successes in input order plus any
/// collected errors keyed by input index.
#[derive(Debug)]
pub struct BatchDecodeResult<T> {
    pub decoded: Vec<T>,
    /// Populated only when `ErrorMode::Collect` is used.
    pub errors: Vec<(usize, DecodeError)>,
}

impl<T> Default for BatchDecodeResult<T> {
    fn default() -> Self {
        Self {
            decoded: Vec::new(),
            errors: Vec::new(),
        }
    }
}
