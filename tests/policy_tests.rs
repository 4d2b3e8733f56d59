//! Cross-policy equivalence tests.
//!
//! The three concurrency policies schedule work differently but share the
//! walker, the digest routine, and the collector, so a given tree must
//! produce identical duplicate groups under every policy and every tuning
//! of one policy.

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use dupescan::duplicates::{
    DuplicateFinder, DuplicateGroup, FinderConfig, ScanPolicy, ScanSummary,
};
use dupescan::scanner::Digest;
use tempfile::{tempdir, TempDir};

fn write_file(dir: &Path, name: &str, content: &[u8]) {
    let mut file = File::create(dir.join(name)).expect("create test file");
    file.write_all(content).expect("write test file");
}

/// A tree with a pair, a triple, unique files, empty files, and nesting.
fn build_mixed_tree() -> TempDir {
    let dir = tempdir().expect("create temp dir");
    let root = dir.path();

    write_file(root, "pair_a.txt", b"alpha alpha alpha");
    write_file(root, "unique_0.txt", b"nothing like me");
    write_file(root, "empty_0", b"");
    write_file(root, "blob_a.bin", &[0x5a; 1000]);

    let d1 = root.join("d1");
    fs::create_dir(&d1).expect("create d1");
    write_file(&d1, "pair_b.txt", b"alpha alpha alpha");
    write_file(&d1, "triple_a.dat", b"beta");

    let d2 = d1.join("d2");
    fs::create_dir(&d2).expect("create d2");
    write_file(&d2, "triple_b.dat", b"beta");
    write_file(&d2, "unique_1.txt", b"me neither");
    write_file(&d2, "empty_1", b"");

    let d3 = d2.join("d3");
    fs::create_dir(&d3).expect("create d3");
    write_file(&d3, "triple_c.dat", b"beta");
    write_file(&d3, "blob_b.bin", &[0x5a; 1000]);

    dir
}

fn scan(root: &Path, config: FinderConfig) -> (Vec<DuplicateGroup>, ScanSummary) {
    DuplicateFinder::new(config)
        .find_duplicates(root)
        .expect("scan succeeds")
}

/// Order-insensitive view of each group: its digest and the set of member
/// paths. Group order itself is deterministic and preserved.
fn fingerprint(groups: &[DuplicateGroup]) -> Vec<(Digest, BTreeSet<PathBuf>)> {
    groups
        .iter()
        .map(|g| (g.digest, g.paths.iter().cloned().collect()))
        .collect()
}

#[test]
fn all_policies_report_identical_groups() {
    let dir = build_mixed_tree();

    let (pool, _) = scan(dir.path(), FinderConfig::default().with_policy(ScanPolicy::Pool));
    let (fanout, _) = scan(dir.path(), FinderConfig::default().with_policy(ScanPolicy::Fanout));
    let (bounded, _) = scan(
        dir.path(),
        FinderConfig::default().with_policy(ScanPolicy::BoundedFanout),
    );

    // Triple of "beta", pair of the blob, pair of "alpha alpha alpha".
    assert_eq!(pool.len(), 3);
    assert_eq!(fingerprint(&pool), fingerprint(&fanout));
    assert_eq!(fingerprint(&pool), fingerprint(&bounded));
}

#[test]
fn policies_agree_on_summary_counts() {
    let dir = build_mixed_tree();

    let summaries: Vec<ScanSummary> = [
        ScanPolicy::Pool,
        ScanPolicy::Fanout,
        ScanPolicy::BoundedFanout,
    ]
    .into_iter()
    .map(|policy| scan(dir.path(), FinderConfig::default().with_policy(policy)).1)
    .collect();

    for summary in &summaries {
        assert_eq!(summary.total_files, 9, "seven grouped files plus two unique");
        assert_eq!(summary.hashed_files, 9);
        assert_eq!(summary.duplicate_groups, 3);
        assert_eq!(summary.duplicate_files, 7);
        assert_eq!(summary.walk_errors, 0);
        assert_eq!(summary.hash_errors, 0);
        // One redundant alpha (17), two redundant betas (8), one blob (1000).
        assert_eq!(summary.wasted_bytes, 17 + 8 + 1000);
    }
}

#[test]
fn worker_count_does_not_change_result() {
    let dir = build_mixed_tree();

    let (one, _) = scan(
        dir.path(),
        FinderConfig::default()
            .with_policy(ScanPolicy::Pool)
            .with_workers(1),
    );
    let (eight, _) = scan(
        dir.path(),
        FinderConfig::default()
            .with_policy(ScanPolicy::Pool)
            .with_workers(8),
    );

    assert_eq!(fingerprint(&one), fingerprint(&eight));
}

#[test]
fn tiny_queue_does_not_change_result() {
    let dir = build_mixed_tree();

    let (default_queue, _) = scan(
        dir.path(),
        FinderConfig::default().with_policy(ScanPolicy::Pool),
    );
    let (tiny_queue, _) = scan(
        dir.path(),
        FinderConfig::default()
            .with_policy(ScanPolicy::Pool)
            .with_workers(2)
            .with_queue_capacity(1),
    );

    assert_eq!(fingerprint(&default_queue), fingerprint(&tiny_queue));
}

#[test]
fn task_ceiling_sweep_matches_unbounded() {
    let dir = build_mixed_tree();
    let (unbounded, _) = scan(
        dir.path(),
        FinderConfig::default().with_policy(ScanPolicy::Fanout),
    );

    for max_tasks in [1, 2, 3, 8] {
        let (bounded, summary) = scan(
            dir.path(),
            FinderConfig::default()
                .with_policy(ScanPolicy::BoundedFanout)
                .with_max_tasks(max_tasks),
        );
        assert_eq!(
            fingerprint(&bounded),
            fingerprint(&unbounded),
            "ceiling {max_tasks} changed the result"
        );
        let peak = summary.peak_active_tasks.expect("bounded policy reports a peak");
        assert!(
            peak <= max_tasks,
            "peak {peak} exceeded ceiling {max_tasks}"
        );
    }
}

#[test]
fn peak_reporting_follows_policy() {
    let dir = build_mixed_tree();

    let (_, pool) = scan(dir.path(), FinderConfig::default().with_policy(ScanPolicy::Pool));
    assert_eq!(pool.peak_active_tasks, None);

    let (_, fanout) = scan(
        dir.path(),
        FinderConfig::default().with_policy(ScanPolicy::Fanout),
    );
    let fanout_peak = fanout.peak_active_tasks.expect("fan-out reports a peak");
    assert!(fanout_peak >= 2, "nested tree must overlap tasks");

    let (_, bounded) = scan(
        dir.path(),
        FinderConfig::default()
            .with_policy(ScanPolicy::BoundedFanout)
            .with_max_tasks(4),
    );
    let bounded_peak = bounded.peak_active_tasks.expect("limiter reports a peak");
    assert!(bounded_peak >= 1 && bounded_peak <= 4);
}

#[test]
fn group_order_is_identical_across_policies() {
    let dir = build_mixed_tree();

    let order = |policy: ScanPolicy| {
        let (groups, _) = scan(dir.path(), FinderConfig::default().with_policy(policy));
        groups.iter().map(|g| g.digest).collect::<Vec<_>>()
    };

    let pool_order = order(ScanPolicy::Pool);
    assert_eq!(pool_order, order(ScanPolicy::Fanout));
    assert_eq!(pool_order, order(ScanPolicy::BoundedFanout));
    // Largest group leads.
    let (groups, _) = scan(dir.path(), FinderConfig::default().with_policy(ScanPolicy::Pool));
    assert_eq!(groups[0].len(), 3);
}
