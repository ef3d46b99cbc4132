//! Criterion benchmarks for INI parsing.
//!
//! Loading happens once per process, so this mostly guards against
//! accidental quadratic behaviour on large files.
//!
//! Run with:
//! ```bash
//! cargo bench --package ovn-k8s-config --bench ini_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ovn_k8s_config::parse_ini;

/// Builds a file with `sections` sections of `options` options each.
fn make_ini(sections: usize, options: usize) -> String {
    let mut text = String::from("# generated\n[DEFAULT]\nlog_level = info\n");
    for s in 0..sections {
        text.push_str(&format!("[section_{s}]\n"));
        for o in 0..options {
            text.push_str(&format!("option_{o} = [{o}, '{s}'] ; comment\n"));
        }
    }
    text
}

fn bench_parse_ini(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_ini");
    for (sections, options) in [(1, 10), (10, 10), (50, 40)] {
        let text = make_ini(sections, options);
        group.bench_with_input(
            BenchmarkId::new("size", format!("{sections}x{options}")),
            &text,
            |b, text| b.iter(|| parse_ini(black_box(text)).expect("parse must succeed")),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_parse_ini);
criterion_main!(benches);
