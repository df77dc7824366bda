//! Serialized output formats for an [`AnalysisReport`](crate::AnalysisReport):
//! the JSON group map spec.md's callers consume directly, and a DOT
//! rendering of the diff-hunk graph for visual inspection.

use crate::engine::AnalysisReport;
use crate::links::{hard::HardLink, soft::SoftLink};
use crate::model::Group;
use std::collections::HashMap;
use std::fmt::Write as _;

/// Serialize a report as pretty-printed JSON, `camelCase`-keyed per the
/// `Group`/`DiffHunk` field renames in [`crate::model`].
pub fn to_json(report: &AnalysisReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

/// Render the diff-hunk graph as DOT: one cluster per group, one node
/// per hunk (`fileID:diffHunkID`), edges for every hard and soft link
/// (soft links labeled with their similarity score).
pub fn to_dot(groups: &HashMap<String, Group>, hard_links: &[HardLink], soft_links: &[SoftLink]) -> String {
    let mut out = String::new();
    out.push_str("digraph hunkgraph {\n");

    let mut sorted_groups: Vec<&Group> = groups.values().collect();
    sorted_groups.sort_by(|a, b| a.group_id.cmp(&b.group_id));

    for group in sorted_groups {
        let _ = writeln!(out, "  subgraph cluster_{} {{", sanitize(&group.group_id));
        let _ = writeln!(out, "    label = \"{}\";", escape(&group.group_id));
        for key in &group.diff_hunk_ids {
            let _ = writeln!(out, "    \"{}\";", escape(key));
        }
        out.push_str("  }\n");
    }

    for (a, b) in hard_links {
        let _ = writeln!(out, "  \"{}\" -- \"{}\" [style=bold];", escape(a), escape(b));
    }
    for (a, b, score) in soft_links {
        let _ = writeln!(out, "  \"{}\" -- \"{}\" [style=dashed, label=\"{score:.2}\"];", escape(a), escape(b));
    }

    out.push_str("}\n");
    out
}

fn sanitize(id: &str) -> String {
    id.chars().map(|c| if c.is_alphanumeric() { c } else { '_' }).collect()
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
