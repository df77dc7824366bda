//! The Change Model: typed representation of files, hunks, and their
//! pre/post code, plus the two stable identifier schemes used throughout
//! the engine (`uniqueIndex` and the `fileID:diffHunkID` composite key).

use serde::{Deserialize, Serialize};

/// Whether a changed file is source code (subject to reference-graph
/// analysis) or something else (config, docs, assets — bypassed straight
/// to group 0, see [`crate::grouping`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Source,
    NonSource,
}

/// One changed file in the working set.
///
/// `hunks` must be non-overlapping and sorted by start line; this is an
/// input invariant the engine assumes rather than re-validates, since
/// hunk extraction (external to this crate) is the only place that can
/// violate it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffFile {
    #[serde(rename = "fileID")]
    pub file_id: String,
    #[serde(rename = "fileType")]
    pub file_type: FileType,
    #[serde(rename = "relativePath")]
    pub relative_path: String,
    #[serde(rename = "baseContent")]
    pub base_content: Option<String>,
    #[serde(rename = "currentContent")]
    pub current_content: Option<String>,
    pub hunks: Vec<DiffHunk>,
}

/// A contiguous region of changed lines, with pre- and post-change text.
///
/// `unique_index` is not supplied by callers — it is assigned by
/// [`assign_unique_indices`] from each hunk's position in the ordered
/// working set, and is what the rest of the engine keys on internally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffHunk {
    #[serde(rename = "diffHunkID")]
    pub diff_hunk_id: String,
    #[serde(rename = "uniqueIndex", default)]
    pub unique_index: String,
    #[serde(rename = "baseHunk")]
    pub base_hunk: Option<HunkSide>,
    #[serde(rename = "currentHunk")]
    pub current_hunk: Option<HunkSide>,
    #[serde(rename = "rawDiff")]
    pub raw_diff: String,
}

/// One side (base or current) of a hunk: its line range, the code itself,
/// and the file path it lives in for that version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HunkSide {
    #[serde(rename = "startLine")]
    pub start_line: u32,
    #[serde(rename = "endLine")]
    pub end_line: u32,
    pub lines: Vec<String>,
    #[serde(rename = "relativeFilePath")]
    pub relative_file_path: String,
}

impl HunkSide {
    /// Lines joined with `\n`, used as the unit of comparison for soft
    /// links (see [`crate::links::soft`]).
    pub fn joined(&self) -> String {
        self.lines.join("\n")
    }
}

impl DiffHunk {
    /// `true` if at least one of `base_hunk`/`current_hunk` carries lines —
    /// the Data Model invariant from spec.md §3.
    pub fn is_valid(&self) -> bool {
        self.base_hunk.as_ref().is_some_and(|s| !s.lines.is_empty())
            || self.current_hunk.as_ref().is_some_and(|s| !s.lines.is_empty())
    }

    /// The `(fileIndex, hunkIndex)` pair encoded in `unique_index`.
    pub fn index_pair(&self) -> Option<(usize, usize)> {
        parse_unique_index(&self.unique_index)
    }
}

/// Parse a `"<fileIndex>:<hunkIndex>"` string into its components.
pub fn parse_unique_index(unique_index: &str) -> Option<(usize, usize)> {
    let (file_idx, hunk_idx) = unique_index.split_once(':')?;
    Some((file_idx.parse().ok()?, hunk_idx.parse().ok()?))
}

/// Assign `unique_index` to every hunk based on its position within the
/// ordered `diff_files` slice. Must be called once, right after the
/// working set is assembled, before any graph building happens — every
/// other component treats `unique_index` as already present and stable.
pub fn assign_unique_indices(diff_files: &mut [DiffFile]) {
    for (file_index, file) in diff_files.iter_mut().enumerate() {
        for (hunk_index, hunk) in file.hunks.iter_mut().enumerate() {
            hunk.unique_index = format!("{file_index}:{hunk_index}");
        }
    }
}

/// The `fileID:diffHunkID` composite key uniquely identifying a hunk
/// across files, independent of its position in the working set.
pub fn composite_key(file_id: &str, diff_hunk_id: &str) -> String {
    format!("{file_id}:{diff_hunk_id}")
}

/// A candidate commit: an ordered set of hunks (by composite key) that
/// should be reviewed and committed together.
///
/// `repo_id`/`repo_name`/`commit_msg`/`recommended_commit_msgs` are part
/// of the persisted wire shape (spec.md §6) but are never populated by
/// this engine: repo identity is supplied by the caller at export time,
/// and commit-message synthesis is an explicit Non-goal (spec.md §1).
/// They round-trip through (de)serialization as `None`/omitted so a
/// caller that fills them in downstream doesn't lose them on a re-read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    #[serde(rename = "repoID", skip_serializing_if = "Option::is_none", default)]
    pub repo_id: Option<String>,
    #[serde(rename = "repoName", skip_serializing_if = "Option::is_none", default)]
    pub repo_name: Option<String>,
    #[serde(rename = "groupID")]
    pub group_id: String,
    #[serde(rename = "diffHunkIDs")]
    pub diff_hunk_ids: Vec<String>,
    #[serde(rename = "intentLabel", skip_serializing_if = "Option::is_none", default)]
    pub intent_label: Option<String>,
    #[serde(rename = "commitMsg", skip_serializing_if = "Option::is_none", default)]
    pub commit_msg: Option<String>,
    #[serde(
        rename = "recommendedCommitMsgs",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub recommended_commit_msgs: Option<Vec<String>>,
}
