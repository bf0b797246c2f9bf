//! Event log decoding.
//!
//! # EVM log layout
//! - `topics[0]` → keccak256 of the event signature (absent for anonymous events)
//! - `topics[1..]` → indexed parameters, one 32-byte word each
//! - `data` → non-indexed parameters, ABI-encoded as a tuple
//!
//! Indexed reference types (string, bytes, arrays, tuples) are stored as the
//! keccak256 of their encoding; the original value is unrecoverable and the
//! raw digest is surfaced instead.

use std::sync::Arc;

use abidecode_core::{
    abi::{AbiEntry, AbiLookup},
    error::DecodeError,
    event::{DecodedLog, RawLog},
    hexutil::{decode_hex, encode_0x},
    types::{TypeDescriptor, TypeKind},
    value::{DecodedParam, DecodedValue},
    WORD,
};
use tracing::{debug, trace, warn};

use crate::{config::DecoderConfig, engine, word::decode_word};

/// Decode a single log with default options. `Ok(None)` when no registered
/// event matches.
pub fn decode_log(registry: &dyn AbiLookup, log: &RawLog) -> Result<Option<DecodedLog>, DecodeError> {
    decode_log_with(registry, log, &DecoderConfig::default())
}

pub fn decode_log_with(
    registry: &dyn AbiLookup,
    log: &RawLog,
    config: &DecoderConfig,
) -> Result<Option<DecodedLog>, DecodeError> {
    let Some((entry, indexed_topics)) = match_event(registry, log, config) else {
        return Ok(None);
    };
    decode_with_entry(&entry, log, indexed_topics, config).map(Some)
}

/// Decode every log that matches a registered event, in input order.
/// Logs that match nothing are left out; malformed matched logs are errors.
pub fn decode_logs(registry: &dyn AbiLookup, logs: &[RawLog]) -> Result<Vec<DecodedLog>, DecodeError> {
    decode_logs_with(registry, logs, &DecoderConfig::default())
}

pub fn decode_logs_with(
    registry: &dyn AbiLookup,
    logs: &[RawLog],
    config: &DecoderConfig,
) -> Result<Vec<DecodedLog>, DecodeError> {
    let mut decoded = Vec::with_capacity(logs.len());
    for log in logs {
        if let Some(d) = decode_log_with(registry, log, config)? {
            decoded.push(d);
        }
    }
    Ok(decoded)
}

/// Pick the event definition for `log` and the topics that carry its
/// indexed parameters.
fn match_event<'l>(
    registry: &dyn AbiLookup,
    log: &'l RawLog,
    config: &DecoderConfig,
) -> Option<(Arc<AbiEntry>, &'l [String])> {
    if let Some(topic0) = log.signature_topic() {
        match registry.find_by_selector(topic0) {
            Some(entry) if entry.is_event() && !entry.anonymous() => {
                if entry.indexed_count() == log.topics.len() - 1 {
                    return Some((entry, &log.topics[1..]));
                }
                debug!(
                    event = entry.name(),
                    topics = log.topics.len(),
                    indexed = entry.indexed_count(),
                    "topic count does not fit matched event"
                );
            }
            _ => trace!(topic0, "no event registered for topic"),
        }
    }

    if !config.anonymous_fallback {
        return None;
    }
    anonymous_candidate(registry, log.topics.len()).map(|entry| (entry, log.topics.as_slice()))
}

/// First registered event whose indexed-parameter count equals the number
/// of topics. Distinct candidates are reported since the pick is a guess.
fn anonymous_candidate(registry: &dyn AbiLookup, topics: usize) -> Option<Arc<AbiEntry>> {
    let mut candidates = registry
        .all()
        .into_iter()
        .filter(|e| e.is_event() && e.indexed_count() == topics);

    let first = candidates.next()?;
    let others: Vec<String> = candidates
        .filter(|e| e.signature() != first.signature())
        .filter_map(|e| e.signature().map(str::to_string))
        .collect();
    if !others.is_empty() {
        warn!(
            picked = first.signature().unwrap_or_default(),
            ?others,
            "ambiguous anonymous event match; using first registered"
        );
    }
    Some(first)
}

fn decode_with_entry(
    entry: &AbiEntry,
    log: &RawLog,
    indexed_topics: &[String],
    config: &DecoderConfig,
) -> Result<DecodedLog, DecodeError> {
    let inputs = entry.inputs();
    let types = entry.input_types();

    let mut indexed = Vec::with_capacity(indexed_topics.len());
    for (i, topic) in indexed_topics.iter().enumerate() {
        indexed.push(topic_word(topic, i)?);
    }

    let data = decode_hex(&log.data)?;
    let data_values = engine::decode_tuple(
        &data,
        inputs
            .iter()
            .zip(types)
            .filter(|(p, _)| !p.indexed)
            .map(|(_, ty)| ty),
    )?;

    // merge back into declaration order
    let mut indexed = indexed.into_iter();
    let mut data_values = data_values.into_iter();
    let mut events = Vec::with_capacity(inputs.len());
    for (i, (param, ty)) in inputs.iter().zip(types).enumerate() {
        let value = if param.indexed {
            indexed.next().map(|w| indexed_value(&w, ty)).transpose()?
        } else {
            data_values.next()
        };
        // counts were checked while matching
        let Some(value) = value else { break };
        events.push(DecodedParam {
            name: config.param_name(&param.name, i),
            type_name: param.type_name.clone(),
            value,
        });
    }

    trace!(event = entry.name(), params = events.len(), "decoded log");
    Ok(DecodedLog {
        name: entry.name().to_string(),
        address: log.address.clone(),
        events,
    })
}

fn topic_word(topic: &str, index: usize) -> Result<[u8; WORD], DecodeError> {
    let bytes = decode_hex(topic)?;
    <[u8; WORD]>::try_from(bytes.as_slice()).map_err(|_| DecodeError::InvalidTopic {
        index,
        len: bytes.len(),
    })
}

/// Static elementary values are recovered from the word; everything else
/// surfaces the stored digest.
fn indexed_value(word: &[u8; WORD], ty: &TypeDescriptor) -> Result<DecodedValue, DecodeError> {
    let rendered = match ty.kind() {
        TypeKind::Elementary(e) if !e.is_dynamic() => decode_word(word, *e)?,
        _ => encode_0x(word),
    };
    Ok(DecodedValue::Scalar(rendered))
}

#[cfg(test)]
mod tests {
    use super::*;
    use abidecode_core::{AbiParam, signature::normalize_selector};
    use std::collections::HashMap;

    #[derive(Default)]
    struct MapLookup {
        entries: Vec<Arc<AbiEntry>>,
        by_selector: HashMap<String, Arc<AbiEntry>>,
    }

    impl MapLookup {
        fn with(entries: Vec<AbiEntry>) -> Self {
            let mut lookup = Self::default();
            for e in entries {
                let e = Arc::new(e);
                if let Some(sel) = e.selector() {
                    lookup.by_selector.insert(sel.to_string(), e.clone());
                }
                lookup.entries.push(e);
            }
            lookup
        }
    }

    impl AbiLookup for MapLookup {
        fn find_by_selector(&self, selector: &str) -> Option<Arc<AbiEntry>> {
            self.by_selector.get(&normalize_selector(selector)).cloned()
        }

        fn all(&self) -> Vec<Arc<AbiEntry>> {
            self.entries.clone()
        }
    }

    fn deposit() -> AbiEntry {
        AbiEntry::event(
            "Deposit",
            vec![AbiParam::indexed("sender", "address"), AbiParam::new("value", "uint256")],
            false,
        )
        .unwrap()
    }

    fn voted() -> AbiEntry {
        AbiEntry::event(
            "Voted",
            vec![
                AbiParam::indexed("voter", "address"),
                AbiParam::indexed("pollId", "uint256"),
                AbiParam::indexed("optionId", "uint256"),
            ],
            false,
        )
        .unwrap()
    }

    fn word(hex_tail: &str) -> String {
        format!("0x{:0>64}", hex_tail)
    }

    fn deposit_log() -> RawLog {
        RawLog {
            address: "0x0457874Bb0a346962128a0C01310d00Fc5bb6a81".into(),
            topics: vec![
                "0xe1fffcc4923d04b559f4d29a8bfc6cda04eb5b0d3c460751c2402c5c5cc9109c".into(),
                word("05039084cc6f4773291a6ed7dcf5bc3a2e894ff3"),
            ],
            data: word("38d7ea4c68000"),
        }
    }

    #[test]
    fn decode_deposit() {
        let reg = MapLookup::with(vec![deposit()]);
        let log = decode_log(&reg, &deposit_log()).unwrap().unwrap();
        assert_eq!(log.name, "Deposit");
        assert_eq!(log.address, "0x0457874Bb0a346962128a0C01310d00Fc5bb6a81");
        assert_eq!(
            log.event("sender").and_then(|v| v.as_str()),
            Some("0x05039084cc6f4773291a6ed7dcf5bc3a2e894ff3")
        );
        assert_eq!(log.event("value").and_then(|v| v.as_str()), Some("1000000000000000"));
        assert_eq!(log.events[1].type_name, "uint256");
    }

    #[test]
    fn all_indexed_with_empty_data() {
        let reg = MapLookup::with(vec![deposit(), voted()]);
        let raw = RawLog {
            address: "0xF9be8F0945acDdeeDaA64DFCA5Fe9629D0CF8E5D".into(),
            topics: vec![
                voted().selector().unwrap().to_string(),
                word("14341f81df14ca86e1420ec9e6abd343fb1c5bfc"),
                word("22"),
                word("f1"),
            ],
            data: "0x".into(),
        };
        let log = decode_log(&reg, &raw).unwrap().unwrap();
        assert_eq!(log.name, "Voted");
        assert_eq!(log.event("pollId").and_then(|v| v.as_str()), Some("34"));
        assert_eq!(log.event("optionId").and_then(|v| v.as_str()), Some("241"));
    }

    #[test]
    fn indexed_order_is_declaration_order() {
        let entry = AbiEntry::event(
            "Mixed",
            vec![
                AbiParam::new("a", "uint256"),
                AbiParam::indexed("b", "address"),
                AbiParam::new("c", "bool"),
            ],
            false,
        )
        .unwrap();
        let raw = RawLog {
            address: "0x00".into(),
            topics: vec![entry.selector().unwrap().to_string(), word("aa")],
            data: format!("0x{}{}", &word("7")[2..], &word("1")[2..]),
        };
        let reg = MapLookup::with(vec![entry]);
        let log = decode_log(&reg, &raw).unwrap().unwrap();
        let names: Vec<&str> = log.events.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
        assert_eq!(log.events[0].value.as_str(), Some("7"));
        assert_eq!(log.events[2].value.as_str(), Some("true"));
    }

    #[test]
    fn indexed_dynamic_yields_digest() {
        let entry = AbiEntry::event(
            "Named",
            vec![AbiParam::indexed("label", "string")],
            false,
        )
        .unwrap();
        let digest = "0xC5D2460186F7233C927E7DB2DCC703C0E500B653CA82273B7BFAD8045D85A470";
        let raw = RawLog {
            address: "0x00".into(),
            topics: vec![entry.selector().unwrap().to_string(), digest.into()],
            data: "0x".into(),
        };
        let reg = MapLookup::with(vec![entry]);
        let log = decode_log(&reg, &raw).unwrap().unwrap();
        assert_eq!(log.events[0].type_name, "string");
        assert_eq!(log.events[0].value.as_str(), Some(digest.to_lowercase().as_str()));
    }

    #[test]
    fn indexed_tuple_and_array_yield_digest() {
        let mut order = AbiParam::tuple(
            "order",
            vec![AbiParam::new("maker", "address"), AbiParam::new("amount", "uint256")],
        );
        order.indexed = true;
        let entry = AbiEntry::event(
            "Filled",
            vec![
                order,
                AbiParam::indexed("ids", "uint256[]"),
                AbiParam::new("fee", "uint256"),
            ],
            false,
        )
        .unwrap();
        let order_digest = format!("0x{}", "1f".repeat(32));
        let ids_digest = format!("0x{}", "e2".repeat(32));
        let raw = RawLog {
            address: "0x00".into(),
            topics: vec![
                entry.selector().unwrap().to_string(),
                order_digest.clone(),
                ids_digest.clone(),
            ],
            data: word("5"),
        };
        let reg = MapLookup::with(vec![entry]);
        let log = decode_log(&reg, &raw).unwrap().unwrap();

        assert_eq!(log.events[0].type_name, "tuple");
        assert_eq!(log.events[0].value.as_str(), Some(order_digest.as_str()));
        assert_eq!(log.events[1].type_name, "uint256[]");
        assert_eq!(log.events[1].value.as_str(), Some(ids_digest.as_str()));
        assert_eq!(log.event("fee").and_then(|v| v.as_str()), Some("5"));
    }

    #[test]
    fn anonymous_event_matches_by_topic_count() {
        let anon = AbiEntry::event(
            "Ping",
            vec![AbiParam::indexed("from", "address"), AbiParam::new("n", "uint8")],
            true,
        )
        .unwrap();
        let reg = MapLookup::with(vec![voted(), anon]);
        let raw = RawLog {
            address: "0x00".into(),
            topics: vec![word("1111111111111111111111111111111111111111")],
            data: word("5"),
        };
        let log = decode_log(&reg, &raw).unwrap().unwrap();
        assert_eq!(log.name, "Ping");
        assert_eq!(
            log.event("from").and_then(|v| v.as_str()),
            Some("0x1111111111111111111111111111111111111111")
        );
        assert_eq!(log.event("n").and_then(|v| v.as_str()), Some("5"));

        let strict = DecoderConfig { anonymous_fallback: false, ..Default::default() };
        assert!(decode_log_with(&reg, &raw, &strict).unwrap().is_none());
    }

    #[test]
    fn ambiguous_fallback_picks_first_registered() {
        let first = AbiEntry::event("A", vec![AbiParam::indexed("x", "uint256")], true).unwrap();
        let second = AbiEntry::event("B", vec![AbiParam::indexed("y", "address")], true).unwrap();
        let reg = MapLookup::with(vec![first, second]);
        let raw = RawLog { address: "0x00".into(), topics: vec![word("2a")], data: "0x".into() };
        let log = decode_log(&reg, &raw).unwrap().unwrap();
        assert_eq!(log.name, "A");
        assert_eq!(log.events[0].value.as_str(), Some("42"));
    }

    #[test]
    fn unknown_log_is_none() {
        let reg = MapLookup::with(vec![voted()]);
        assert!(decode_log(&reg, &deposit_log()).unwrap().is_none());
        assert!(decode_log(&MapLookup::default(), &deposit_log()).unwrap().is_none());
    }

    #[test]
    fn short_topic_is_an_error() {
        let reg = MapLookup::with(vec![deposit()]);
        let mut raw = deposit_log();
        raw.topics[1] = "0x05039084cc6f4773291a6ed7dcf5bc3a2e894ff3".into();
        assert!(matches!(
            decode_log(&reg, &raw),
            Err(DecodeError::InvalidTopic { index: 0, len: 20 })
        ));
    }

    #[test]
    fn truncated_data_is_an_error() {
        let reg = MapLookup::with(vec![deposit()]);
        let mut raw = deposit_log();
        raw.data = "0x00".into();
        assert!(matches!(decode_log(&reg, &raw), Err(DecodeError::OutOfBounds { .. })));
    }

    #[test]
    fn decode_logs_skips_misses() {
        let reg = MapLookup::with(vec![deposit()]);
        let unknown = RawLog {
            address: "0x00".into(),
            topics: vec![word("dead"), word("beef"), word("cafe")],
            data: "0x".into(),
        };
        let logs = vec![unknown.clone(), deposit_log(), unknown, deposit_log()];
        let decoded = decode_logs(&reg, &logs).unwrap();
        assert_eq!(decoded.len(), 2);
        assert!(decoded.iter().all(|l| l.name == "Deposit"));
    }
}
