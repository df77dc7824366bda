//! The Two-Version Orchestrator: runs exactly two Reference-Graph Builder
//! invocations concurrently — one per version — under a single shared
//! deadline.
//!
//! Grounded on the teacher's `classify/claude.rs::classify_hunks_batched`
//! concurrency idiom (`tokio::spawn` + `tokio::task::spawn_blocking` +
//! joining the results), simplified to exactly two workers and wrapped in
//! one `tokio::time::timeout` instead of a per-task deadline, per spec.md
//! §4.2's "single shared deadline bounding both" requirement.

use crate::error::EngineError;
use crate::graph::extractor::{build_reference_graph, BuildOutcome, Version};
use crate::model::DiffFile;
use std::path::PathBuf;
use std::time::Duration;

/// The immutable pair of reference graphs produced by one orchestrator
/// run, plus the union of both builders' diagnostics.
pub struct VersionPair {
    pub base: BuildOutcome,
    pub current: BuildOutcome,
}

/// Run the base-version and current-version Reference-Graph Builders
/// concurrently, bounded by `deadline_seconds` shared across both.
///
/// On timeout neither builder's output is observable — `tokio::time::
/// timeout` drops the joined future (and with it both `spawn_blocking`
/// join handles) before either result reaches the caller, so no partial
/// graph ever leaks into the Hunk-Link Analyzer.
pub async fn build_version_pair(
    base_dir: PathBuf,
    current_dir: PathBuf,
    diff_files: Vec<DiffFile>,
    deadline_seconds: u64,
) -> Result<VersionPair, EngineError> {
    let base_files = diff_files.clone();
    let current_files = diff_files;

    let base_task = tokio::task::spawn_blocking(move || {
        build_reference_graph(&base_dir, &base_files, Version::Base)
    });
    let current_task = tokio::task::spawn_blocking(move || {
        build_reference_graph(&current_dir, &current_files, Version::Current)
    });

    let joined = async {
        let (base, current) = tokio::join!(base_task, current_task);
        let base = base.map_err(|e| EngineError::builder_failure(e.to_string()))?;
        let current = current.map_err(|e| EngineError::builder_failure(e.to_string()))?;
        Ok::<_, EngineError>(VersionPair { base, current })
    };

    match tokio::time::timeout(Duration::from_secs(deadline_seconds), joined).await {
        Ok(result) => result,
        Err(_) => {
            log::warn!("reference graph build exceeded the {deadline_seconds}s deadline, abandoning both builders");
            Err(EngineError::build_timeout(deadline_seconds))
        }
    }
}
