//! Rayon-powered batch decoding.
//!
//! Inputs are split into chunks of `DecoderConfig::batch_chunk_size`; each
//! chunk is decoded in parallel and results are folded back in input order.
//! Inputs that match no definition are dropped in every `ErrorMode`.

use abidecode_core::{
    abi::AbiLookup,
    call::DecodedCall,
    decoder::{BatchDecodeResult, ErrorMode, ProgressCallback},
    error::{BatchDecodeError, DecodeError},
    event::{DecodedLog, RawLog},
};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::{call_decoder, config::DecoderConfig, log_decoder};

/// Decode logs in parallel.
pub fn decode_logs_parallel(
    registry: &dyn AbiLookup,
    logs: &[RawLog],
    config: &DecoderConfig,
    progress: Option<&dyn ProgressCallback>,
) -> Result<BatchDecodeResult<DecodedLog>, BatchDecodeError> {
    chunked(logs, config, progress, |log| {
        log_decoder::decode_log_with(registry, log, config)
    })
}

/// Decode call payloads (hex, selector included) in parallel.
pub fn decode_calls_parallel<S>(
    registry: &dyn AbiLookup,
    payloads: &[S],
    config: &DecoderConfig,
    progress: Option<&dyn ProgressCallback>,
) -> Result<BatchDecodeResult<DecodedCall>, BatchDecodeError>
where
    S: AsRef<str> + Sync,
{
    chunked(payloads, config, progress, |payload| {
        call_decoder::decode_call_with(registry, payload.as_ref(), config)
    })
}

fn chunked<I, T, F>(
    inputs: &[I],
    config: &DecoderConfig,
    progress: Option<&dyn ProgressCallback>,
    decode_one: F,
) -> Result<BatchDecodeResult<T>, BatchDecodeError>
where
    I: Sync,
    T: Send,
    F: Fn(&I) -> Result<Option<T>, DecodeError> + Sync,
{
    let total = inputs.len();
    let chunk_size = config.batch_chunk_size.max(1);
    info!(total, chunk_size, mode = ?config.error_mode, "batch decode started");

    let mut out = BatchDecodeResult {
        decoded: Vec::with_capacity(total),
        errors: Vec::new(),
    };
    let mut offset = 0;

    for chunk in inputs.chunks(chunk_size) {
        let results: Vec<Result<Option<T>, DecodeError>> =
            chunk.par_iter().map(&decode_one).collect();

        for (i, result) in results.into_iter().enumerate() {
            let index = offset + i;
            match result {
                Ok(Some(value)) => out.decoded.push(value),
                Ok(None) => {}
                Err(err) => match config.error_mode {
                    ErrorMode::Skip => debug!(index, error = %err, "skipping malformed input"),
                    ErrorMode::Collect => out.errors.push((index, err)),
                    ErrorMode::Throw => {
                        return Err(BatchDecodeError::ItemFailed { index, source: err });
                    }
                },
            }
        }

        offset += chunk.len();
        if let Some(cb) = progress {
            cb.on_progress(offset, total);
        }
    }

    info!(
        total,
        decoded = out.decoded.len(),
        errors = out.errors.len(),
        "batch decode finished"
    );
    Ok(out)
}
