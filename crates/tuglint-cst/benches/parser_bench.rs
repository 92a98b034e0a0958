// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Performance benchmarks for the tuglint-cst parser, renderer and matcher.
//!
//! Run with:
//! ```bash
//! cargo bench -p tuglint-cst
//! ```

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use tuglint_cst::matcher::{find_all, m};
use tuglint_cst::{parse_module, parse_module_with_positions, Codegen, Pattern};

// =============================================================================
// Test Data Generation
// =============================================================================

/// Generate Python code with classes and methods.
fn generate_class_code(num_classes: usize) -> String {
    let mut code = String::new();
    for i in 0..num_classes {
        code.push_str(&format!(
            r#"class MyClass{i}(object):
    """Class {i} docstring."""

    def __init__(self, value, items=[]):
        self.value = value
        self.items = items

    def process(self, data):
        if data == None:
            print("no data")
        return self.value + data

    def transform(self, items):
        result = list()
        for item in items:
            result.append(self.process(item))
        return result

"#
        ));
    }
    code
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for size in [10, 100, 500] {
        let code = generate_class_code(size);
        group.throughput(Throughput::Bytes(code.len() as u64));
        group.bench_with_input(BenchmarkId::new("parse_module", size), &code, |b, code| {
            b.iter(|| parse_module(black_box(code)).expect("parse"))
        });
        group.bench_with_input(
            BenchmarkId::new("parse_module_with_positions", size),
            &code,
            |b, code| b.iter(|| parse_module_with_positions(black_box(code)).expect("parse")),
        );
    }
    group.finish();
}

fn bench_codegen(c: &mut Criterion) {
    let mut group = c.benchmark_group("codegen");
    for size in [10, 100, 500] {
        let code = generate_class_code(size);
        let module = parse_module(&code).expect("parse");
        group.throughput(Throughput::Bytes(code.len() as u64));
        group.bench_with_input(BenchmarkId::new("to_source", size), &module, |b, module| {
            b.iter(|| black_box(module.to_source()))
        });
    }
    group.finish();
}

fn bench_matcher(c: &mut Criterion) {
    let code = generate_class_code(100);
    let module = parse_module(&code).expect("parse");
    let pattern: Pattern = m::class_def()
        .bases([m::at_least(1, m::arg().value(m::name("object")))])
        .into();
    c.bench_function("find_all_object_bases", |b| {
        b.iter(|| find_all(black_box(&module), &pattern))
    });
}

criterion_group!(benches, bench_parse, bench_codegen, bench_matcher);
criterion_main!(benches);
