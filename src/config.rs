//! Tuning parameters for an analysis run.

use serde::{Deserialize, Serialize};

/// The five knobs spec.md §6 exposes to callers of
/// [`analyze`](crate::analyze). Plain struct, `serde`-derived, no external
/// config-file format — the teacher's own config-holding structs (e.g. its
/// classification model/command settings) are likewise bare structs
/// constructed by the caller, not loaded from a dedicated format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Minimum averaged normalized-similarity score for a soft link to be
    /// emitted between two hunks.
    pub similarity_threshold: f64,

    /// Reserved: only `0` ("exact path reachability") is implemented. Any
    /// other value is accepted but has no effect on the current build.
    pub distance_threshold: u8,

    /// Reserved passthrough flag for a future refactoring-detection pass.
    /// Has no effect on the current build.
    pub detect_refactorings: bool,

    /// Whether non-source hunks are grouped into group 0 at all. When
    /// `false`, non-source hunks are dropped entirely rather than grouped
    /// (see §4.4).
    pub process_non_source_changes: bool,

    /// Wall-clock budget shared by both Reference-Graph Builder workers in
    /// the Two-Version Orchestrator.
    pub build_deadline_seconds: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.618,
            distance_threshold: 0,
            detect_refactorings: false,
            process_non_source_changes: true,
            build_deadline_seconds: 600,
        }
    }
}
