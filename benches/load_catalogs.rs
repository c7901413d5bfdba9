use std::io::Write;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use flate2::write::GzEncoder;
use starmap::catalogs::{Catalog, DeepSkyObject, HipparcosStar};

/// Repeat the data rows of a sample file, renumbering the key column so keys stay unique.
fn scaled_sample(path: &str, delimiter: char, key_column: usize, copies: usize) -> Vec<u8> {
    let text = std::fs::read_to_string(path).unwrap();
    let rows: Vec<&str> = text
        .lines()
        .filter(|l| !l.trim().is_empty() && !l.starts_with('#'))
        .collect();

    let mut out = String::new();
    let mut key = 1_u32;
    for _ in 0..copies {
        for row in &rows {
            let mut fields: Vec<String> = row.split(delimiter).map(str::to_string).collect();
            fields[key_column] = key.to_string();
            out.push_str(&fields.join(&delimiter.to_string()));
            out.push('\n');
            key += 1;
        }
    }
    out.into_bytes()
}

fn gzip(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(bytes).unwrap();
    encoder.finish().unwrap()
}

fn bench_load_catalogs(c: &mut Criterion) {
    let mut group = c.benchmark_group("load_catalogs");

    for copies in [10, 100, 1000] {
        let dsos = scaled_sample("tests/data/catalog.txt", '\t', 0, copies);
        let dsos_gz = gzip(&dsos);
        let stars = scaled_sample("tests/data/hip_main_sample.dat", '|', 1, copies);

        group.throughput(Throughput::Bytes(dsos.len() as u64));
        group.bench_with_input(BenchmarkId::new("dsos_plain", copies), &dsos, |b, bytes| {
            b.iter(|| Catalog::<DeepSkyObject>::from_bytes(bytes).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("dsos_gzip", copies), &dsos_gz, |b, bytes| {
            b.iter(|| Catalog::<DeepSkyObject>::from_bytes(bytes).unwrap())
        });

        group.throughput(Throughput::Bytes(stars.len() as u64));
        group.bench_with_input(BenchmarkId::new("hipparcos", copies), &stars, |b, bytes| {
            b.iter(|| Catalog::<HipparcosStar>::from_bytes(bytes).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_load_catalogs);
criterion_main!(benches);
