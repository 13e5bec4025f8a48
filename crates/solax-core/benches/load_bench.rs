//! Criterion benchmarks for configuration decoding and the store round trip.
//!
//! Run with:
//! ```bash
//! cargo bench --package solax-core --bench load_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::{Map, Value};
use solax_core::{render_form, BaseConfig, ConfigStore, MemoryFs, CONFIG_FILE_NAME};

const FULL_DOCUMENT: &str = r#"{"mqttroot":"garage","SelectConnectivity":"eth","SelectLAN":"WT32-ETH01","mqttserver":"192.168.1.10","mqttport":"1884","mqttuser":"bridge","mqttpass":"secret","mqttbasepath":"home/inverter/","UseRandomClientID":"none","debuglevel":"0"}"#;

fn full_document() -> Map<String, Value> {
    match serde_json::from_str(FULL_DOCUMENT) {
        Ok(Value::Object(doc)) => doc,
        _ => unreachable!("fixture is a JSON object"),
    }
}

fn bench_decode(c: &mut Criterion) {
    let doc = full_document();
    c.bench_function("decode_full_document", |b| {
        b.iter(|| BaseConfig::from_document(black_box(&doc)))
    });

    let empty = Map::new();
    c.bench_function("decode_empty_document", |b| {
        b.iter(|| BaseConfig::from_document(black_box(&empty)))
    });
}

fn bench_store_round_trip(c: &mut Criterion) {
    let mut store = ConfigStore::open(MemoryFs::with_file(CONFIG_FILE_NAME, FULL_DOCUMENT));
    c.bench_function("store_and_reload", |b| {
        b.iter(|| store.store(black_box(FULL_DOCUMENT)))
    });
    c.bench_function("load", |b| b.iter(|| store.load()));
}

fn bench_render(c: &mut Criterion) {
    let cfg = BaseConfig::from_document(&full_document());
    c.bench_function("render_form", |b| b.iter(|| render_form(black_box(&cfg))));
}

criterion_group!(benches, bench_decode, bench_store_round_trip, bench_render);
criterion_main!(benches);
