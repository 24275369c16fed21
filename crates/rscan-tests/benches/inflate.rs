use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rscan_inflate::{Decompressor, Inflate, ScratchBuffer};
use rscan_tests::{LARGE, gzip, noise, repetitive, text, zlib};

fn bench_zlib(c: &mut Criterion) {
    let mut group = c.benchmark_group("zlib");

    for (name, data) in [
        ("text", text()),
        ("repetitive_1mib", repetitive(LARGE)),
        ("noise_256kib", noise(256 * 1024)),
    ] {
        let input = zlib(&data, 6);
        group.throughput(Throughput::Bytes(data.len() as u64));
        for d in Decompressor::ALL {
            group.bench_with_input(BenchmarkId::new(d.name(), name), &input, |b, input| {
                let mut scratch = ScratchBuffer::new();
                b.iter(|| d.decode_zlib(input, Some(&mut scratch)).unwrap().len());
            });
        }
    }

    group.finish();
}

fn bench_gzip(c: &mut Criterion) {
    let mut group = c.benchmark_group("gzip");

    for (name, data) in [("text", text()), ("repetitive_1mib", repetitive(LARGE))] {
        let input = gzip(&data, 6);
        group.throughput(Throughput::Bytes(data.len() as u64));
        for d in Decompressor::ALL {
            group.bench_with_input(BenchmarkId::new(d.name(), name), &input, |b, input| {
                let mut scratch = ScratchBuffer::new();
                b.iter(|| d.decode_gzip(input, Some(&mut scratch)).unwrap().len());
            });
        }
    }

    group.finish();
}

fn bench_scratch_reuse(c: &mut Criterion) {
    let data = repetitive(64 * 1024);
    let input = zlib(&data, 6);
    let mut group = c.benchmark_group("zlib_scratch");

    group.bench_function("fresh_buffer", |b| {
        b.iter(|| Decompressor::Internal.decode_zlib(&input, None).unwrap().len());
    });
    group.bench_function("reused_buffer", |b| {
        let mut scratch = ScratchBuffer::new();
        b.iter(|| {
            Decompressor::Internal
                .decode_zlib(&input, Some(&mut scratch))
                .unwrap()
                .len()
        });
    });

    group.finish();
}

criterion_group!(benches, bench_zlib, bench_gzip, bench_scratch_reuse);
criterion_main!(benches);
