use criterion::{black_box, criterion_group, criterion_main, Criterion};
use cs_cache::{CacheRegistry, FileStamp, Fingerprint};
use cs_core::{OutputFormat, TransformMode, TransformResult};

fn stamps(n: usize) -> Vec<FileStamp> {
    (0..n).map(|i| FileStamp::new(format!("src/file_{i}.ts"), 1000 + i * 37)).collect()
}

fn bench_fingerprint(c: &mut Criterion) {
    for &n in &[10, 100, 1000] {
        let files = stamps(n);
        c.bench_function(&format!("fingerprint_{n}_files"), |b| {
            b.iter(|| black_box(Fingerprint::of(black_box(&files))))
        });
    }
}

fn bench_registry_hit(c: &mut Criterion) {
    let reg = CacheRegistry::default();
    let files = stamps(500);
    let result = TransformResult::new((0..2000).map(|i| format!("line {i}")).collect(), 100_000, 60_000);
    reg.set_cached_result("bench", &files, OutputFormat::Markdown, TransformMode::Minify, result);
    c.bench_function("registry_hit_500_files", |b| {
        b.iter(|| {
            black_box(reg.get_cached_result("bench", black_box(&files), OutputFormat::Markdown, TransformMode::Minify))
        })
    });
}

criterion_group!(benches, bench_fingerprint, bench_registry_hit);
criterion_main!(benches);
