//! Decode throughput benchmarks.
//!
//! # Running
//! ```bash
//! cargo bench --package abidecode-evm
//! ```

use abidecode_core::{ErrorMode, RawLog};
use abidecode_evm::{batch, decode_call, decode_log, engine, DecoderConfig};
use abidecode_registry::AbiRegistry;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

const ABI: &str = r#"[
    {"type": "event", "name": "Transfer", "anonymous": false, "inputs": [
        {"name": "from", "type": "address", "indexed": true},
        {"name": "to", "type": "address", "indexed": true},
        {"name": "value", "type": "uint256", "indexed": false}
    ]},
    {"type": "function", "name": "numbers",
     "inputs": [{"name": "n", "type": "uint256[]"}]}
]"#;

const TRANSFER_TOPIC: &str = "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef";

fn make_registry() -> AbiRegistry {
    let reg = AbiRegistry::new();
    reg.add_json(ABI).expect("load bench abi");
    reg
}

fn make_transfer_log(i: u64) -> RawLog {
    RawLog {
        address: "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48".into(),
        topics: vec![
            TRANSFER_TOPIC.into(),
            format!("0x{:064x}", i & 0xff),
            format!("0x{:064x}", (i + 1) & 0xff),
        ],
        data: format!("0x{i:064x}"),
    }
}

/// `numbers(uint256[])` calldata with `n` elements.
fn make_numbers_call(n: usize) -> String {
    let mut s = String::from("0x37273081");
    s.push_str(&format!("{:064x}{n:064x}", 0x20));
    for i in 0..n {
        s.push_str(&format!("{i:064x}"));
    }
    s
}

fn bench_decode_log(c: &mut Criterion) {
    let registry = make_registry();
    let log = make_transfer_log(7);
    c.bench_function("decode_log_transfer", |b| {
        b.iter(|| decode_log(&registry, &log));
    });
}

fn bench_decode_call_array(c: &mut Criterion) {
    let registry = make_registry();
    let mut group = c.benchmark_group("decode_call_uint_array");
    for len in [1usize, 16, 256] {
        let payload = make_numbers_call(len);
        group.throughput(Throughput::Elements(len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &payload, |b, payload| {
            b.iter(|| decode_call(&registry, payload));
        });
    }
    group.finish();
}

fn bench_engine_static_tuple(c: &mut Criterion) {
    let types = vec![
        abidecode_core::TypeDescriptor::parse("(address,uint256,bool)", &[]).expect("type"),
    ];
    let buf = hex::decode(format!("{:064x}{:064x}{:064x}", 1, 2, 1)).expect("hex");
    c.bench_function("engine_static_tuple", |b| {
        b.iter(|| engine::decode_tuple(&buf, &types));
    });
}

fn bench_parallel_logs(c: &mut Criterion) {
    let registry = make_registry();
    let config = DecoderConfig { error_mode: ErrorMode::Skip, ..Default::default() };
    let mut group = c.benchmark_group("parallel_decode_logs");
    for batch_size in [1_000usize, 10_000, 100_000] {
        let logs: Vec<RawLog> = (0..batch_size as u64).map(make_transfer_log).collect();
        group.throughput(Throughput::Elements(batch_size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(batch_size), &logs, |b, logs| {
            b.iter(|| batch::decode_logs_parallel(&registry, logs, &config, None));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_decode_log,
    bench_decode_call_array,
    bench_engine_static_tuple,
    bench_parallel_logs,
);
criterion_main!(benches);
