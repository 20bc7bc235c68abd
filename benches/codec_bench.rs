//! Benchmarks for the ARRCON packet codec

use criterion::{criterion_group, criterion_main, Criterion};

use arrcon::protocol::{deserialize, serialize, Packet};

fn codec_benchmarks(c: &mut Criterion) {
    let small = Packet::exec(1, "status");
    let large = Packet::exec(2, &"x".repeat(4000));

    c.bench_function("serialize_small", |b| {
        b.iter(|| serialize(std::hint::black_box(&small)).unwrap())
    });

    c.bench_function("serialize_large", |b| {
        b.iter(|| serialize(std::hint::black_box(&large)).unwrap())
    });

    let frame = serialize(&large).unwrap();
    c.bench_function("deserialize_large", |b| {
        b.iter(|| deserialize(std::hint::black_box(&frame)).unwrap())
    });
}

criterion_group!(benches, codec_benchmarks);
criterion_main!(benches);
