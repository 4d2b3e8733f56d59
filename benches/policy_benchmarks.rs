use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dupescan::duplicates::{DuplicateFinder, FinderConfig, ScanPolicy};
use dupescan::scanner::{Hasher, Walker};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

// Helper to create a test directory tree seeded with duplicate groups
fn setup_test_dir(depth: usize, files_per_dir: usize) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    create_dir_recursive(temp_dir.path().to_path_buf(), depth, files_per_dir);
    temp_dir
}

fn create_dir_recursive(path: PathBuf, depth: usize, files_per_dir: usize) {
    if depth == 0 {
        return;
    }

    if !path.exists() {
        fs::create_dir_all(&path).expect("Failed to create dir");
    }

    for i in 0..files_per_dir {
        // Four distinct bodies, so every level contributes to duplicate groups.
        let content = format!("file body variant {}", i % 4);
        let file_path = path.join(format!("file_{}.txt", i));
        fs::write(file_path, content).expect("Failed to write file");
    }

    if depth > 1 {
        for i in 0..2 {
            // 2 subdirectories per level
            let sub_dir = path.join(format!("dir_{}", i));
            create_dir_recursive(sub_dir, depth - 1, files_per_dir);
        }
    }
}

// 1. Directory Walking Benchmarks
fn bench_walker(c: &mut Criterion) {
    let temp_dir = setup_test_dir(4, 10); // depth 4, 10 files per dir -> roughly 150 files

    c.bench_function("walker_150_files", |b| {
        b.iter(|| {
            let walker = Walker::new(temp_dir.path());
            let files: Vec<_> = walker.walk().collect();
            black_box(files);
        })
    });
}

// 2. Hashing Benchmarks
fn bench_hasher(c: &mut Criterion) {
    let mut group = c.benchmark_group("hasher");
    let hasher = Hasher::default();

    for size_kb in [1, 1024, 10240] {
        // 1KB, 1MB, 10MB
        let data = vec![b'a'; size_kb * 1024];
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("bench_file.dat");
        fs::write(&file_path, &data).expect("Failed to write bench file");

        group.bench_with_input(format!("blake3_{}KB", size_kb), &file_path, |b, path| {
            b.iter(|| {
                let digest = hasher.digest_file(path).unwrap();
                black_box(digest);
            });
        });
    }
    group.finish();
}

// 3. Policy Comparison Benchmarks
fn bench_policies(c: &mut Criterion) {
    let temp_dir = setup_test_dir(4, 10);
    let mut group = c.benchmark_group("policy_scan");

    for policy in [
        ScanPolicy::Pool,
        ScanPolicy::Fanout,
        ScanPolicy::BoundedFanout,
    ] {
        let finder = DuplicateFinder::new(FinderConfig::default().with_policy(policy));
        group.bench_with_input(policy.to_string(), &finder, |b, finder| {
            b.iter(|| {
                let results = finder.find_duplicates(temp_dir.path()).unwrap();
                black_box(results);
            });
        });
    }
    group.finish();
}

// 4. Pool Sizing Benchmarks
fn bench_pool_workers(c: &mut Criterion) {
    let temp_dir = setup_test_dir(3, 10); // ~70 files
    let mut group = c.benchmark_group("pool_workers");

    for workers in [1, 2, 4, 8] {
        let finder = DuplicateFinder::new(
            FinderConfig::default()
                .with_policy(ScanPolicy::Pool)
                .with_workers(workers),
        );
        group.bench_with_input(format!("workers_{}", workers), &finder, |b, finder| {
            b.iter(|| {
                let results = finder.find_duplicates(temp_dir.path()).unwrap();
                black_box(results);
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_walker,
    bench_hasher,
    bench_policies,
    bench_pool_workers
);
criterion_main!(benches);
