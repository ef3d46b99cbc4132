//! Criterion benchmarks for literal parsing of option values.
//!
//! Every `get_option` call re-parses its value, so this is the per-lookup
//! cost.  Covers typical scalar values, containers, and the fallback path
//! for plain strings.
//!
//! Run with:
//! ```bash
//! cargo bench --package ovn-k8s-config --bench literal_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ovn_k8s_config::{parse_literal, ConfigStore};

const INPUTS: &[(&str, &str)] = &[
    ("int", "4"),
    ("float", "3.14"),
    ("bool", "True"),
    ("string", "'br-int'"),
    ("list", "[\"a\", \"b\", \"c\"]"),
    ("dict", "{'mtu': 1400, 'encap': 'geneve', 'gateways': ['10.0.0.1', '10.0.0.2']}"),
    ("fallback_word", "ovn-node"),
    ("fallback_path", "/etc/openvswitch/conf.db"),
];

/// Benchmarks `parse_literal` for a range of value shapes.
fn bench_parse_literal(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_literal");
    for (name, text) in INPUTS {
        group.bench_with_input(BenchmarkId::new("value", name), text, |b, text| {
            b.iter(|| parse_literal(black_box(text)))
        });
    }
    group.finish();
}

/// Benchmarks a full `get_option` lookup including section/option resolution.
fn bench_get_option(c: &mut Criterion) {
    let text: String = std::iter::once("[default]".to_string())
        .chain(INPUTS.iter().map(|(name, value)| format!("{name} = {value}")))
        .collect::<Vec<_>>()
        .join("\n");
    let store: ConfigStore = text.parse().expect("benchmark config must parse");

    let mut group = c.benchmark_group("get_option");
    for (name, _) in INPUTS {
        group.bench_with_input(BenchmarkId::new("option", name), name, |b, name| {
            b.iter(|| store.get_option(black_box(name)).expect("option exists"))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parse_literal, bench_get_option);
criterion_main!(benches);
