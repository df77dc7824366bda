//! Unified-diff parsing: turns raw `git diff` text into the engine's
//! [`DiffHunk`](crate::model::DiffHunk)/[`HunkSide`](crate::model::HunkSide)
//! shape.
//!
//! The line-by-line hunk-header parsing and the SHA-256-based stable id
//! scheme are carried over near-verbatim; what changes is the output
//! shape, which splits a flat old/new line list into the pre/post
//! `HunkSide` pair the Change Model calls for.

use crate::model::{DiffHunk, HunkSide};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffLine {
    #[serde(rename = "type")]
    pub line_type: LineType,
    pub content: String,
    #[serde(rename = "oldLineNumber")]
    pub old_line_number: Option<u32>,
    #[serde(rename = "newLineNumber")]
    pub new_line_number: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineType {
    Context,
    Added,
    Removed,
}

/// Parse one file's unified diff body (no `diff --git`/`@@` section
/// boundaries beyond its own) into [`DiffHunk`]s.
pub fn parse_file_diff(diff_output: &str, relative_path: &str) -> Vec<DiffHunk> {
    let mut hunks = Vec::new();
    let mut current_hunk: Option<HunkBuilder> = None;

    for line in diff_output.lines() {
        if line.starts_with("@@") {
            if let Some(builder) = current_hunk.take() {
                hunks.push(builder.build(relative_path));
            }

            if let Some((old_start, old_count, new_start, new_count)) = parse_hunk_header(line) {
                current_hunk = Some(HunkBuilder {
                    old_start,
                    old_count,
                    new_start,
                    new_count,
                    raw: String::new(),
                    lines: Vec::new(),
                    old_line: old_start,
                    new_line: new_start,
                });
            }
        } else if let Some(ref mut builder) = current_hunk {
            if line.starts_with('+') && !line.starts_with("+++") {
                builder.add_line(LineType::Added, &line[1..]);
            } else if line.starts_with('-') && !line.starts_with("---") {
                builder.add_line(LineType::Removed, &line[1..]);
            } else if line.starts_with(' ') || line.is_empty() {
                let content = if line.is_empty() { "" } else { &line[1..] };
                builder.add_line(LineType::Context, content);
            }
        }
    }

    if let Some(builder) = current_hunk {
        hunks.push(builder.build(relative_path));
    }

    hunks
}

/// Parse a combined multi-file `git diff` into `(relative_path, hunks)`
/// pairs, one per changed file, preserving the order files appear in the
/// diff. Deleted files (`+++ /dev/null`) are skipped — a non-source
/// deletion has no post-change content to analyze and is represented by
/// the caller as a whole-file non-source change if needed.
pub fn parse_multi_file_diff(diff_output: &str) -> Vec<(String, Vec<DiffHunk>)> {
    let mut files = Vec::new();
    let mut current_section = String::new();
    let mut current_file: Option<String> = None;

    let mut flush = |file: &Option<String>, section: &mut String, out: &mut Vec<(String, Vec<DiffHunk>)>| {
        if let Some(path) = file {
            if !section.is_empty() {
                out.push((path.clone(), parse_file_diff(section, path)));
            }
        }
        section.clear();
    };

    for line in diff_output.lines() {
        if line.starts_with("diff --git ") {
            flush(&current_file, &mut current_section, &mut files);
            current_file = None;
        } else if let Some(path) = line.strip_prefix("+++ b/") {
            current_file = Some(path.to_owned());
        } else if line.starts_with("+++ /dev/null") {
            current_file = None;
        } else {
            current_section.push_str(line);
            current_section.push('\n');
        }
    }
    flush(&current_file, &mut current_section, &mut files);

    files
}

struct HunkBuilder {
    old_start: u32,
    old_count: u32,
    new_start: u32,
    new_count: u32,
    raw: String,
    lines: Vec<DiffLine>,
    old_line: u32,
    new_line: u32,
}

impl HunkBuilder {
    fn add_line(&mut self, line_type: LineType, content: &str) {
        let (old_ln, new_ln) = match line_type {
            LineType::Added => {
                let n = self.new_line;
                self.new_line += 1;
                (None, Some(n))
            }
            LineType::Removed => {
                let o = self.old_line;
                self.old_line += 1;
                (Some(o), None)
            }
            LineType::Context => {
                let o = self.old_line;
                let n = self.new_line;
                self.old_line += 1;
                self.new_line += 1;
                (Some(o), Some(n))
            }
        };

        let marker = match line_type {
            LineType::Added => '+',
            LineType::Removed => '-',
            LineType::Context => ' ',
        };
        self.raw.push(marker);
        self.raw.push_str(content);
        self.raw.push('\n');

        self.lines.push(DiffLine {
            line_type,
            content: content.to_owned(),
            old_line_number: old_ln,
            new_line_number: new_ln,
        });
    }

    fn build(self, relative_path: &str) -> DiffHunk {
        let mut hasher = Sha256::new();
        hasher.update(self.raw.as_bytes());
        let content_hash = hex::encode(&hasher.finalize()[..8]);
        let diff_hunk_id = format!("{relative_path}:{content_hash}");

        let base_lines: Vec<String> = self
            .lines
            .iter()
            .filter(|l| l.line_type != LineType::Added)
            .map(|l| l.content.clone())
            .collect();
        let current_lines: Vec<String> = self
            .lines
            .iter()
            .filter(|l| l.line_type != LineType::Removed)
            .map(|l| l.content.clone())
            .collect();

        let base_hunk = (self.old_count > 0 || !base_lines.is_empty()).then(|| HunkSide {
            start_line: self.old_start,
            end_line: self.old_start + self.old_count.saturating_sub(1),
            lines: base_lines,
            relative_file_path: relative_path.to_owned(),
        });
        let current_hunk = (self.new_count > 0 || !current_lines.is_empty()).then(|| HunkSide {
            start_line: self.new_start,
            end_line: self.new_start + self.new_count.saturating_sub(1),
            lines: current_lines,
            relative_file_path: relative_path.to_owned(),
        });

        DiffHunk {
            diff_hunk_id,
            unique_index: String::new(),
            base_hunk,
            current_hunk,
            raw_diff: self.raw,
        }
    }
}

fn parse_hunk_header(line: &str) -> Option<(u32, u32, u32, u32)> {
    let line = line.trim_start_matches("@@ ");
    let parts: Vec<&str> = line.split(' ').collect();
    if parts.len() < 2 {
        return None;
    }

    let old = parts[0].trim_start_matches('-');
    let new = parts[1].trim_start_matches('+');

    let (old_start, old_count) = parse_range(old)?;
    let (new_start, new_count) = parse_range(new)?;

    Some((old_start, old_count, new_start, new_count))
}

fn parse_range(range: &str) -> Option<(u32, u32)> {
    if let Some((start, count)) = range.split_once(',') {
        Some((start.parse().ok()?, count.parse().ok()?))
    } else {
        Some((range.parse().ok()?, 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hunk_header_variants() {
        assert_eq!(parse_hunk_header("@@ -1,5 +1,7 @@"), Some((1, 5, 1, 7)));
        assert_eq!(
            parse_hunk_header("@@ -10,3 +12,5 @@ function foo()"),
            Some((10, 3, 12, 5))
        );
        assert_eq!(parse_hunk_header("@@ -5 +5 @@"), Some((5, 1, 5, 1)));
        assert_eq!(parse_hunk_header("@@ -1,0 +1,5 @@"), Some((1, 0, 1, 5)));
    }

    #[test]
    fn splits_base_and_current_sides() {
        let diff = "@@ -1,3 +1,4 @@\n context\n+added line\n context2\n context3";
        let hunks = parse_file_diff(diff, "test.rs");
        assert_eq!(hunks.len(), 1);
        let hunk = &hunks[0];
        assert_eq!(hunk.base_hunk.as_ref().unwrap().lines.len(), 3);
        assert_eq!(hunk.current_hunk.as_ref().unwrap().lines.len(), 4);
    }

    #[test]
    fn hunk_id_is_deterministic_and_path_scoped() {
        let diff = "@@ -1,1 +1,1 @@\n-old\n+new";
        let a = parse_file_diff(diff, "a.rs");
        let b = parse_file_diff(diff, "a.rs");
        assert_eq!(a[0].diff_hunk_id, b[0].diff_hunk_id);

        let c = parse_file_diff(diff, "b.rs");
        assert_ne!(a[0].diff_hunk_id, c[0].diff_hunk_id);
    }

    #[test]
    fn multi_file_diff_splits_by_file_and_skips_deletions() {
        let diff = "\
diff --git a/foo.rs b/foo.rs
--- a/foo.rs
+++ b/foo.rs
@@ -1,2 +1,3 @@
 context
+added
 context2
diff --git a/deleted.rs b/deleted.rs
--- a/deleted.rs
+++ /dev/null
@@ -1,2 +0,0 @@
-line1
-line2
diff --git a/bar.rs b/bar.rs
--- a/bar.rs
+++ b/bar.rs
@@ -5,2 +5,2 @@
-old line
+new line
 context";
        let files = parse_multi_file_diff(diff);
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].0, "foo.rs");
        assert_eq!(files[1].0, "bar.rs");
    }

    #[test]
    fn pure_addition_has_no_base_side() {
        let diff = "@@ -0,0 +1,2 @@\n+one\n+two";
        let hunks = parse_file_diff(diff, "new.rs");
        assert!(hunks[0].base_hunk.is_none());
        assert_eq!(hunks[0].current_hunk.as_ref().unwrap().lines.len(), 2);
    }
}
