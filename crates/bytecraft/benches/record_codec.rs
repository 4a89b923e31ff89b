use std::hint::black_box;

use bytecraft::{ByteOrder, from_bytes, to_bytes};
use bytecraft_derive::Record;
use criterion::{Criterion, criterion_group, criterion_main};

#[derive(Debug, Default, Record)]
struct Sample {
    timestamp: u64,
    #[bytecraft("le")]
    channel: u16,
    reading: f32,
}

#[derive(Debug, Default, Record)]
struct Capture {
    count: u32,
    #[bytecraft("len=count")]
    samples: Vec<Sample>,
    #[bytecraft("len=count")]
    raw: Vec<u32>,
    #[bytecraft("nt")]
    source: String,
}

fn gen_capture(count: usize) -> Capture {
    // Deterministic but non-trivial pattern
    Capture {
        count: count as u32,
        samples: (0..count)
            .map(|i| Sample {
                timestamp: (i * 1_000) as u64,
                channel: (i % 8) as u16,
                reading: i as f32 * 0.5,
            })
            .collect(),
        raw: (0..count).map(|i| (i * 31 % 4096) as u32).collect(),
        source: format!("bench-{count}"),
    }
}

fn bench_record_codec(c: &mut Criterion) {
    for &count in &[1usize, 16, 256, 4096] {
        let capture = gen_capture(count);
        let bytes = to_bytes(ByteOrder::Big, &capture).unwrap();

        c.bench_function(&format!("decode_{}_samples", count), |b| {
            b.iter(|| {
                let _: Capture = from_bytes(black_box(&bytes), ByteOrder::Big).unwrap();
            })
        });

        c.bench_function(&format!("encode_{}_samples", count), |b| {
            b.iter(|| {
                let _ = to_bytes(ByteOrder::Big, black_box(&capture)).unwrap();
            })
        });
    }
}

criterion_group!(benches, bench_record_codec);
criterion_main!(benches);
