use a51_core::{
    BURST_KEYSTREAM_BYTES, CipherSession, KeyByteOrder, KeystreamEngine, parse_key_hex,
};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use std::fs;
use tempfile::NamedTempFile;

const BENCH_KEY: &str = "0123456789ABCDEF";
const BENCH_FILE_BYTES: usize = 4 * 1024 * 1024;

fn bench_key() -> u64 {
    parse_key_hex(BENCH_KEY, KeyByteOrder::LittleEndian).unwrap()
}

fn ready_engine() -> KeystreamEngine {
    let mut engine = KeystreamEngine::new();
    engine.initialize(bench_key(), 0);
    engine
}

fn bench_initialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("initialize");
    let key = bench_key();
    let mut engine = KeystreamEngine::new();
    group.bench_function("key_frame_warmup", |b| {
        b.iter(|| {
            engine.initialize(black_box(key), black_box(0x134));
        })
    });
}

fn bench_keystream(c: &mut Criterion) {
    let mut group = c.benchmark_group("keystream");
    let mut engine = ready_engine();
    group.bench_function("burst_bits", |b| {
        b.iter(|| black_box(engine.generate_keystream_bits(114)))
    });
    group.bench_function("burst_bytes", |b| {
        b.iter(|| black_box(engine.generate_keystream_bytes(BURST_KEYSTREAM_BYTES)))
    });
    for size in [64usize, 1024, 16 * 1024] {
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("bytes", size), &size, |b, &size| {
            b.iter(|| black_box(engine.generate_keystream_bytes(size)))
        });
    }
}

fn bench_encrypt(c: &mut Criterion) {
    let mut group = c.benchmark_group("encrypt");
    let data = vec![0x5Au8; 4096];
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("fresh_engine_4k", |b| {
        b.iter(|| {
            let mut engine = ready_engine();
            black_box(engine.encrypt(&data))
        })
    });
    let mut engine = ready_engine();
    let mut buf = data.clone();
    group.bench_function("in_place_4k", |b| {
        b.iter(|| {
            engine.apply_keystream(&mut buf);
            black_box(&buf);
        })
    });
}

fn bench_file_io(c: &mut Criterion) {
    let mut group = c.benchmark_group("file_io");
    group.sample_size(10);
    group.throughput(Throughput::Bytes(BENCH_FILE_BYTES as u64));
    let mut data = vec![0u8; BENCH_FILE_BYTES];
    for (i, byte) in data.iter_mut().enumerate() {
        *byte = (i as u8).wrapping_mul(31).wrapping_add(17);
    }
    let input = NamedTempFile::new().expect("input file");
    fs::write(input.path(), &data).unwrap();
    let output = NamedTempFile::new().expect("output");
    let mut session = CipherSession::default();
    session.initialize(BENCH_KEY, "0").unwrap();
    group.bench_function("encrypt_file_4mb", |b| {
        b.iter(|| {
            let mut run = session.clone();
            run.encrypt_file(input.path(), output.path()).unwrap()
        })
    });
}

criterion_group!(
    benches,
    bench_initialize,
    bench_keystream,
    bench_encrypt,
    bench_file_io
);
criterion_main!(benches);
