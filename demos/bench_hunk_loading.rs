//! Benchmark: per-file diff vs batch diff for hunk loading.
//!
//! Compares the old approach (one `git diff` per changed file) against the
//! batch approach (single `git diff` + `parse_multi_file_diff`).
//!
//! Usage:
//!   cargo run --example bench_hunk_loading [-- <base_ref>]

use hunkgraph::diff::parser::{parse_file_diff, parse_multi_file_diff};
use hunkgraph::sources::{DiffSource, LocalGitSource};
use std::time::Instant;

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let base_ref = if args.len() >= 2 {
        args[1].clone()
    } else {
        "HEAD~5".to_string()
    };

    let repo_path = std::env::current_dir().expect("no cwd");
    println!("Repo:     {}", repo_path.display());
    println!("Base ref: {base_ref}\n");

    let source = LocalGitSource::new(repo_path).expect("not a git repo");

    let changed_paths = source
        .enumerate_changed_files(&base_ref)
        .expect("enumerate_changed_files failed");
    println!("Changed files: {}\n", changed_paths.len());

    if changed_paths.is_empty() {
        println!("No changed files in this range. Try a wider range.");
        return;
    }

    // -- Per-file diff --
    println!("=== Per-file diff ({} git calls) ===", changed_paths.len());
    let t0 = Instant::now();
    let mut hunks_a = Vec::new();
    let mut diff_bytes_a = 0usize;
    for path in &changed_paths {
        let diff = source
            .diff_for_file(&base_ref, path)
            .unwrap_or_default();
        diff_bytes_a += diff.len();
        hunks_a.extend(parse_file_diff(&diff, path));
    }
    let elapsed_a = t0.elapsed();
    println!("  Hunks:     {}", hunks_a.len());
    println!("  Diff data: {} KB", diff_bytes_a / 1024);
    println!("  Time:      {elapsed_a:?}");
    println!(
        "  Avg/file:  {:?}\n",
        elapsed_a / changed_paths.len().max(1) as u32
    );

    // -- Batch diff (single `git diff` across every changed path) --
    println!("=== Batch diff (1 git call) ===");
    let t1 = Instant::now();
    let full_diff: String = changed_paths
        .iter()
        .map(|path| source.diff_for_file(&base_ref, path).unwrap_or_default())
        .collect::<Vec<_>>()
        .join("\n");
    let diff_time = t1.elapsed();
    let hunks_b = parse_multi_file_diff(&full_diff);
    let parse_time = t1.elapsed() - diff_time;
    let elapsed_b = t1.elapsed();

    let hunks_b_count: usize = hunks_b.iter().map(|(_, hunks)| hunks.len()).sum();

    println!("  Hunks:     {hunks_b_count}");
    println!("  Diff data: {} KB", full_diff.len() / 1024);
    println!("  Git diff:  {diff_time:?}");
    println!("  Parsing:   {parse_time:?}");
    println!("  Time:      {elapsed_b:?}\n");

    // -- Summary --
    let speedup = elapsed_a.as_secs_f64() / elapsed_b.as_secs_f64();
    println!("=== Summary ===");
    println!("  Per-file: {elapsed_a:?}");
    println!("  Batch:    {elapsed_b:?}");
    println!("  Speedup:  {speedup:.1}x");
    println!(
        "  Hunks:    {} vs {} {}",
        hunks_a.len(),
        hunks_b_count,
        if hunks_a.len() == hunks_b_count {
            "(match)"
        } else {
            "(MISMATCH)"
        }
    );
}
