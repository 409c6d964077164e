//! Benchmarks for stream decoding.
//!
//! Covers the three shapes that dominate real payloads:
//! - A class instance with inline primitive members
//! - A collection wrapper backed by a primitive array
//! - A string-heavy object graph resolved through references

extern crate nrbf;

use criterion::{criterion_group, criterion_main, Criterion};
use nrbf::deserialize;
use std::hint::black_box;

fn push_u32(data: &mut Vec<u8>, value: u32) {
    data.extend_from_slice(&value.to_le_bytes());
}

fn push_str(data: &mut Vec<u8>, value: &str) {
    data.push(u8::try_from(value.len()).unwrap());
    data.extend_from_slice(value.as_bytes());
}

fn header() -> Vec<u8> {
    let mut data = vec![0x00];
    push_u32(&mut data, 1);
    push_u32(&mut data, u32::MAX);
    push_u32(&mut data, 1);
    push_u32(&mut data, 0);
    data
}

/// Class with four inline Int32 members.
fn class_stream() -> Vec<u8> {
    let mut data = header();
    data.push(0x04);
    push_u32(&mut data, 1);
    push_str(&mut data, "Bench.Quad");
    push_u32(&mut data, 4);
    for name in ["a", "b", "c", "d"] {
        push_str(&mut data, name);
    }
    data.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);
    data.extend_from_slice(&[0x08, 0x08, 0x08, 0x08]);
    for n in 0..4_i32 {
        data.extend_from_slice(&n.to_le_bytes());
    }
    data.push(0x0B);
    data
}

/// List wrapper whose `_items` member references a 1024-element Int32 array.
fn list_stream() -> Vec<u8> {
    let mut data = header();
    data.push(0x04);
    push_u32(&mut data, 1);
    push_str(&mut data, "List`1");
    push_u32(&mut data, 2);
    push_str(&mut data, "_items");
    push_str(&mut data, "_size");
    data.extend_from_slice(&[0x02, 0x00]);
    data.push(0x08);
    data.push(0x09);
    push_u32(&mut data, 2);
    data.extend_from_slice(&1024_i32.to_le_bytes());
    data.push(0x0F);
    push_u32(&mut data, 2);
    push_u32(&mut data, 1024);
    data.push(0x08);
    for n in 0..1024_i32 {
        data.extend_from_slice(&n.to_le_bytes());
    }
    data.push(0x0B);
    data
}

/// Object array of 256 strings, each reached through a reference.
fn string_graph_stream() -> Vec<u8> {
    let mut data = header();
    data.push(0x07);
    push_u32(&mut data, 1);
    data.push(0x00);
    push_u32(&mut data, 1);
    push_u32(&mut data, 256);
    data.push(0x02);
    for n in 0..256_u32 {
        data.push(0x09);
        push_u32(&mut data, 100 + n);
    }
    for n in 0..256_u32 {
        data.push(0x06);
        push_u32(&mut data, 100 + n);
        push_str(&mut data, "payload");
    }
    data.push(0x0B);
    data
}

fn bench_decode_class(c: &mut Criterion) {
    let data = class_stream();

    c.bench_function("decode_class_inline_primitives", |b| {
        b.iter(|| {
            let value = deserialize(black_box(&data)).unwrap();
            black_box(value)
        });
    });
}

fn bench_decode_list(c: &mut Criterion) {
    let data = list_stream();

    c.bench_function("decode_list_1024_ints", |b| {
        b.iter(|| {
            let value = deserialize(black_box(&data)).unwrap();
            black_box(value)
        });
    });
}

fn bench_decode_string_graph(c: &mut Criterion) {
    let data = string_graph_stream();

    c.bench_function("decode_string_graph_256_refs", |b| {
        b.iter(|| {
            let value = deserialize(black_box(&data)).unwrap();
            black_box(value)
        });
    });
}

criterion_group!(
    benches,
    bench_decode_class,
    bench_decode_list,
    bench_decode_string_graph
);
criterion_main!(benches);
