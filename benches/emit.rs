//! Benchmarks for symbol emission.
//!
//! Measures the hot paths of a rewrite:
//! - Encoding the iterator custom metadata blobs
//! - Decoding them back
//! - Emitting a synthetic program of many methods into a recording sink
//! - A complete remap-then-emit rewrite

extern crate symremap;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use std::hint::black_box;
use symremap::{
    customdebuginfo::{encode_iterator_class, encode_iterator_scopes, parse_custom_metadata},
    prelude::*,
};

/// Build a program of `methods` methods spread over 16 documents, each with a nested scope,
/// locals, a constant and a few sequence points. Every fourth method is an iterator.
fn synthetic_program(methods: u32) -> DebugInfo {
    let mut info = DebugInfo::new();
    let documents: Vec<DocumentId> = (0..16)
        .map(|i| info.add_document(SourceDocument::csharp(format!("/build/src/File{i}.cs"))))
        .collect();

    for row in 0..methods {
        let mut function = SymFunction::new(Token(0x0600_0001 + row), 0x40);
        function.slot_token = Token(0x1100_0001 + row);
        function.lines.push(DocumentLines::new(
            documents[(row % 16) as usize],
            (0..8)
                .map(|i| SequencePoint::new(i * 8, 10 + i, 9, 10 + i, 30))
                .collect(),
        ));

        function.scope.variables = vec![SymVariable::new("a", 0), SymVariable::new("b", 1)];
        let mut inner = SymScope::new(0x10, 0x20);
        inner.variables = vec![SymVariable::new("i", 2)];
        inner.constants = vec![SymConstant::new("c", ConstantValue::I4(2), Token(0))];
        function.scope.scopes.push(inner);

        if row % 4 == 0 {
            function.iterator_class = format!("<Method{row}>d__{row}");
            function.iterator_scopes = vec![IteratorScope::new(0x10, 0x20)];
        }
        info.functions.push(function);
    }

    info
}

/// Benchmark encoding a typical generated iterator class name.
fn bench_encode_iterator_class(c: &mut Criterion) {
    c.bench_function("encode_iterator_class", |b| {
        b.iter(|| {
            let blob = encode_iterator_class(black_box("<GetEnumerator>d__12")).unwrap();
            black_box(blob)
        });
    });
}

/// Benchmark encoding eight iterator scopes.
fn bench_encode_iterator_scopes(c: &mut Criterion) {
    let scopes: Vec<IteratorScope> = (0..8).map(|i| IteratorScope::new(i * 16, 12)).collect();

    c.bench_function("encode_iterator_scopes", |b| {
        b.iter(|| {
            let blob = encode_iterator_scopes(black_box(&scopes)).unwrap();
            black_box(blob)
        });
    });
}

/// Benchmark decoding an iterator scopes blob.
fn bench_parse_custom_metadata(c: &mut Criterion) {
    let scopes: Vec<IteratorScope> = (0..8).map(|i| IteratorScope::new(i * 16, 12)).collect();
    let blob = encode_iterator_scopes(&scopes).unwrap();

    c.bench_function("parse_custom_metadata", |b| {
        b.iter(|| {
            let records = parse_custom_metadata(black_box(&blob)).unwrap();
            black_box(records)
        });
    });
}

/// Benchmark emitting 1000 methods into a recording sink.
fn bench_emit_program(c: &mut Criterion) {
    let info = synthetic_program(1000);

    c.bench_function("emit_1000_methods", |b| {
        b.iter(|| {
            let mut sink = RecordingSink::new();
            let mut emitter = SymbolEmitter::new(RewriteOptions::default());
            emitter.emit(black_box(&info), &mut sink).unwrap();
            black_box(sink)
        });
    });
}

/// Benchmark a full rewrite of 1000 methods, remapping every document.
fn bench_rewrite_program(c: &mut Criterion) {
    let info = synthetic_program(1000);
    let map: PathMap = (0..16)
        .map(|i| (format!("/build/src/File{i}.cs"), format!("src/File{i}.cs")))
        .collect();

    c.bench_function("rewrite_1000_methods", |b| {
        b.iter_batched(
            || info.clone(),
            |info| {
                let summary = SymbolRewriter::default()
                    .rewrite(info, black_box(&map), RecordingSink::new())
                    .unwrap();
                black_box(summary)
            },
            BatchSize::LargeInput,
        );
    });
}

criterion_group!(
    benches,
    bench_encode_iterator_class,
    bench_encode_iterator_scopes,
    bench_parse_custom_metadata,
    bench_emit_program,
    bench_rewrite_program,
);
criterion_main!(benches);
