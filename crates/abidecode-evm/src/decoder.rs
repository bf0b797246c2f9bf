//! `AbiDecoder`: a registry handle plus options, with one method per
//! decode entry point.

use abidecode_core::{
    abi::AbiLookup,
    call::DecodedCall,
    decoder::{BatchDecodeResult, ProgressCallback},
    error::{BatchDecodeError, DecodeError},
    event::{DecodedLog, RawLog},
};

use crate::{batch, call_decoder, config::DecoderConfig, log_decoder};

/// Decoder bound to a definition registry.
/// Cheap to clone when `R` is (e.g. `AbiRegistry` or `Arc<_>`).
#[derive(Debug, Clone)]
pub struct AbiDecoder<R> {
    registry: R,
    config: DecoderConfig,
}

impl<R: AbiLookup> AbiDecoder<R> {
    pub fn new(registry: R) -> Self {
        Self::with_config(registry, DecoderConfig::default())
    }

    pub fn with_config(registry: R, config: DecoderConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decode a `0x`-prefixed call payload; `Ok(None)` for unknown selectors.
    pub fn decode_call(&self, payload: &str) -> Result<Option<DecodedCall>, DecodeError> {
        call_decoder::decode_call_with(&self.registry, payload, &self.config)
    }

    pub fn decode_call_bytes(&self, calldata: &[u8]) -> Result<Option<DecodedCall>, DecodeError> {
        call_decoder::decode_call_bytes(&self.registry, calldata, &self.config)
    }

    /// Decode one log; `Ok(None)` when no registered event matches.
    pub fn decode_log(&self, log: &RawLog) -> Result<Option<DecodedLog>, DecodeError> {
        log_decoder::decode_log_with(&self.registry, log, &self.config)
    }

    /// Decode the logs that match, in input order.
    pub fn decode_logs(&self, logs: &[RawLog]) -> Result<Vec<DecodedLog>, DecodeError> {
        log_decoder::decode_logs_with(&self.registry, logs, &self.config)
    }

    pub fn decode_logs_parallel(
        &self,
        logs: &[RawLog],
        progress: Option<&dyn ProgressCallback>,
    ) -> Result<BatchDecodeResult<DecodedLog>, BatchDecodeError> {
        batch::decode_logs_parallel(&self.registry, logs, &self.config, progress)
    }

    pub fn decode_calls_parallel<S: AsRef<str> + Sync>(
        &self,
        payloads: &[S],
        progress: Option<&dyn ProgressCallback>,
    ) -> Result<BatchDecodeResult<DecodedCall>, BatchDecodeError> {
        batch::decode_calls_parallel(&self.registry, payloads, &self.config, progress)
    }
}
