//! Top-level `analyze` entry point: wires the Change Model, Two-Version
//! Orchestrator, Hunk-Link Analyzer, and Grouping Engine together.
//!
//! Mirrors the teacher's pattern of carrying a `Vec` of recoverable
//! diagnostics alongside a still-successful result (see
//! `review/src/symbols/extractor.rs`'s per-file `has_grammar` flag) rather
//! than dropping non-fatal issues on the floor.

use crate::config::AnalysisConfig;
use crate::error::EngineError;
use crate::links::{hard, soft};
use crate::model::{assign_unique_indices, DiffFile, FileType, Group};
use crate::{grouping, orchestrator};
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;

/// The result of one `analyze` run: the final group map, plus every
/// recoverable diagnostic accumulated along the way.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub groups: HashMap<String, Group>,
    pub diagnostics: Vec<EngineError>,
}

/// Partition `diff_files`' hunks into cohesive [`Group`]s.
///
/// `base_dir`/`current_dir` are the two materialized snapshot
/// directories the Reference-Graph Builder walks — see
/// [`crate::sources::DiffSource::materialize`] for the reference adapter
/// that produces them from a local git checkout.
///
/// Returns `Ok` with an empty group map and an `InputEmpty` diagnostic
/// when no valid hunk is supplied. Propagates `Err` only for the two
/// fatal variants of [`EngineError`] (`BuildTimeout`, `BuilderFailure`);
/// every other problem is folded into the report's `diagnostics`.
pub async fn analyze(
    mut diff_files: Vec<DiffFile>,
    base_dir: PathBuf,
    current_dir: PathBuf,
    config: &AnalysisConfig,
) -> Result<AnalysisReport, EngineError> {
    let mut diagnostics = Vec::new();

    for file in &mut diff_files {
        if file.file_id.trim().is_empty() {
            diagnostics.push(EngineError::invalid_identifier(format!(
                "empty fileID for {}",
                file.relative_path
            )));
        }
        file.hunks
            .retain(|hunk| hunk.is_valid() && !hunk.diff_hunk_id.trim().is_empty());
    }
    diff_files.retain(|file| !file.file_id.trim().is_empty());

    let has_any_hunk = diff_files.iter().any(|f| !f.hunks.is_empty());
    if !has_any_hunk {
        log::info!("analyze: no valid hunks in {} file(s), returning empty group map", diff_files.len());
        diagnostics.push(EngineError::InputEmpty);
        return Ok(AnalysisReport {
            groups: HashMap::new(),
            diagnostics,
        });
    }

    assign_unique_indices(&mut diff_files);

    let pair = orchestrator::build_version_pair(
        base_dir,
        current_dir,
        diff_files.clone(),
        config.build_deadline_seconds,
    )
    .await?;

    for diagnostic in pair.base.diagnostics.iter().chain(&pair.current.diagnostics) {
        log::warn!("reference graph build diagnostic: {diagnostic}");
    }
    diagnostics.extend(pair.base.diagnostics);
    diagnostics.extend(pair.current.diagnostics);

    let hard_links: Vec<hard::HardLink> = hard::derive(&pair.base.graph, &pair.current.graph)
        .into_iter()
        .collect();

    let source_hunks: Vec<_> = diff_files
        .iter()
        .filter(|f| f.file_type == FileType::Source)
        .flat_map(|f| f.hunks.iter().cloned())
        .collect();
    let soft_links = soft::derive(&source_hunks, config.similarity_threshold);

    let groups = grouping::group(
        &diff_files,
        &hard_links,
        &soft_links,
        config.process_non_source_changes,
    );
    log::debug!(
        "analyze: partitioned {} source hunk(s) into {} group(s) ({} hard link(s), {} soft link(s))",
        source_hunks.len(),
        groups.len(),
        hard_links.len(),
        soft_links.len()
    );

    Ok(AnalysisReport { groups, diagnostics })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DiffHunk, HunkSide};

    fn hunk(id: &str, current: &str) -> DiffHunk {
        DiffHunk {
            diff_hunk_id: id.to_owned(),
            unique_index: String::new(),
            base_hunk: None,
            current_hunk: Some(HunkSide {
                start_line: 1,
                end_line: 1,
                lines: vec![current.to_owned()],
                relative_file_path: "a.rs".into(),
            }),
            raw_diff: String::new(),
        }
    }

    #[tokio::test]
    async fn empty_input_yields_input_empty_diagnostic() {
        let base_dir = tempfile::tempdir().unwrap();
        let current_dir = tempfile::tempdir().unwrap();

        let report = analyze(
            vec![],
            base_dir.path().to_path_buf(),
            current_dir.path().to_path_buf(),
            &AnalysisConfig::default(),
        )
        .await
        .unwrap();

        assert!(report.groups.is_empty());
        assert!(matches!(report.diagnostics[0], EngineError::InputEmpty));
    }

    #[tokio::test]
    async fn single_file_single_hunk_lands_in_one_group() {
        let base_dir = tempfile::tempdir().unwrap();
        let current_dir = tempfile::tempdir().unwrap();
        std::fs::write(current_dir.path().join("a.rs"), "fn a() {}\n").unwrap();
        std::fs::write(base_dir.path().join("a.rs"), "\n").unwrap();

        let diff_files = vec![DiffFile {
            file_id: "a.rs".into(),
            file_type: FileType::Source,
            relative_path: "a.rs".into(),
            base_content: None,
            current_content: None,
            hunks: vec![hunk("h0", "fn a() {}")],
        }];

        let report = analyze(
            diff_files,
            base_dir.path().to_path_buf(),
            current_dir.path().to_path_buf(),
            &AnalysisConfig::default(),
        )
        .await
        .unwrap();

        let total_hunks: usize = report.groups.values().map(|g| g.diff_hunk_ids.len()).sum();
        assert_eq!(total_hunks, 1);
    }
}
