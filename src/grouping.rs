//! The Grouping Engine: partitions the working set's hunks into
//! [`Group`]s via connected components of the diff-hunk graph.
//!
//! Generalizes the teacher's `symbols/graph.rs` file-level clustering
//! (string-keyed union-find, multi-member clusters first ordered by
//! smallest contained key, singletons bucketed last) from file paths to
//! hunk `uniqueIndex`es, per spec.md §4.4's stable-numbering requirement.

use crate::links::hard::HardLink;
use crate::links::soft::SoftLink;
use crate::model::{composite_key, DiffFile, FileType, Group};
use crate::unionfind::UnionFind;
use std::collections::HashMap;

/// Build the final group map for a working set.
///
/// `diff_files` must already have `unique_index` assigned (see
/// [`crate::model::assign_unique_indices`]). Non-source hunks are
/// reserved as group 0 when `process_non_source_changes` is `true` and at
/// least one exists; every source hunk lands in exactly one of: a
/// multi-hunk group (connected component of size ≥ 2 in hard ∪ soft
/// links), or the trailing singleton bucket.
pub fn group(
    diff_files: &[DiffFile],
    hard_links: &[HardLink],
    soft_links: &[SoftLink],
    process_non_source_changes: bool,
) -> HashMap<String, Group> {
    let mut groups = HashMap::new();
    let mut next_group_num = 0usize;

    let mut non_source: Vec<((usize, usize), String)> = Vec::new();
    let mut source_hunks: Vec<(&str, (usize, usize), &crate::model::DiffHunk)> = Vec::new();

    for file in diff_files {
        for hunk in &file.hunks {
            let Some(index_pair) = hunk.index_pair() else {
                continue;
            };
            match file.file_type {
                FileType::NonSource => {
                    if process_non_source_changes {
                        non_source.push((index_pair, composite_key(&file.file_id, &hunk.diff_hunk_id)));
                    }
                }
                FileType::Source => {
                    source_hunks.push((&file.file_id, index_pair, hunk));
                }
            }
        }
    }

    if !non_source.is_empty() {
        non_source.sort_by_key(|(pair, _)| *pair);
        groups.insert(
            format!("group{next_group_num}"),
            make_group(next_group_num, non_source.into_iter().map(|(_, key)| key).collect()),
        );
        next_group_num += 1;
    }

    let unique_index_to_slot: HashMap<&str, usize> = source_hunks
        .iter()
        .enumerate()
        .map(|(i, (_, _, hunk))| (hunk.unique_index.as_str(), i))
        .collect();

    let mut uf = UnionFind::new(source_hunks.len());
    for (a, b) in hard_links {
        if let (Some(&ia), Some(&ib)) = (unique_index_to_slot.get(a.as_str()), unique_index_to_slot.get(b.as_str()))
        {
            uf.union(ia, ib);
        }
    }
    for (a, b, _) in soft_links {
        if let (Some(&ia), Some(&ib)) = (unique_index_to_slot.get(a.as_str()), unique_index_to_slot.get(b.as_str()))
        {
            uf.union(ia, ib);
        }
    }

    let mut components: HashMap<usize, Vec<usize>> = HashMap::new();
    for i in 0..source_hunks.len() {
        components.entry(uf.find(i)).or_default().push(i);
    }

    let mut multi_member: Vec<Vec<usize>> = Vec::new();
    let mut singletons: Vec<usize> = Vec::new();
    for members in components.into_values() {
        if members.len() >= 2 {
            multi_member.push(members);
        } else {
            singletons.push(members[0]);
        }
    }

    multi_member.sort_by_key(|members| members.iter().map(|&i| source_hunks[i].1).min().unwrap());

    for members in multi_member {
        let keys = ordered_keys(&source_hunks, &members);
        groups.insert(format!("group{next_group_num}"), make_group(next_group_num, keys));
        next_group_num += 1;
    }

    if !singletons.is_empty() {
        let keys = ordered_keys(&source_hunks, &singletons);
        groups.insert(format!("group{next_group_num}"), make_group(next_group_num, keys));
    }

    groups
}

fn ordered_keys(
    source_hunks: &[(&str, (usize, usize), &crate::model::DiffHunk)],
    members: &[usize],
) -> Vec<String> {
    let mut keyed: Vec<((usize, usize), String)> = members
        .iter()
        .map(|&i| {
            let (file_id, pair, hunk) = source_hunks[i];
            (pair, composite_key(file_id, &hunk.diff_hunk_id))
        })
        .collect();
    keyed.sort_by_key(|(pair, _)| *pair);
    keyed.into_iter().map(|(_, key)| key).collect()
}

fn make_group(num: usize, diff_hunk_ids: Vec<String>) -> Group {
    Group {
        repo_id: None,
        repo_name: None,
        group_id: format!("group{num}"),
        diff_hunk_ids,
        intent_label: None,
        commit_msg: None,
        recommended_commit_msgs: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{assign_unique_indices, DiffHunk, HunkSide};

    fn source_file(file_id: &str, hunk_ids: &[&str]) -> DiffFile {
        DiffFile {
            file_id: file_id.to_owned(),
            file_type: FileType::Source,
            relative_path: format!("{file_id}.rs"),
            base_content: None,
            current_content: None,
            hunks: hunk_ids
                .iter()
                .map(|id| DiffHunk {
                    diff_hunk_id: (*id).to_owned(),
                    unique_index: String::new(),
                    base_hunk: None,
                    current_hunk: Some(HunkSide {
                        start_line: 1,
                        end_line: 1,
                        lines: vec!["x".into()],
                        relative_file_path: format!("{file_id}.rs"),
                    }),
                    raw_diff: String::new(),
                })
                .collect(),
        }
    }

    #[test]
    fn partition_law_union_covers_every_hunk_and_groups_disjoint() {
        let mut files = vec![source_file("f0", &["h0", "h1"]), source_file("f1", &["h0"])];
        assign_unique_indices(&mut files);

        let groups = group(&files, &[], &[], true);

        let mut all_keys: Vec<&String> = groups.values().flat_map(|g| g.diff_hunk_ids.iter()).collect();
        all_keys.sort();
        let mut expected = vec![
            composite_key("f0", "h0"),
            composite_key("f0", "h1"),
            composite_key("f1", "h0"),
        ];
        expected.sort();
        assert_eq!(all_keys, expected.iter().collect::<Vec<_>>());

        let mut seen = std::collections::HashSet::new();
        for g in groups.values() {
            for key in &g.diff_hunk_ids {
                assert!(seen.insert(key.clone()), "key {key} appeared in more than one group");
            }
        }
    }

    #[test]
    fn linked_hunks_form_a_single_group() {
        let mut files = vec![source_file("f0", &["h0"]), source_file("f1", &["h0"])];
        assign_unique_indices(&mut files);
        let hard = vec![("0:0".to_owned(), "1:0".to_owned())];

        let groups = group(&files, &hard, &[], true);
        let multi_groups: Vec<_> = groups.values().filter(|g| g.diff_hunk_ids.len() > 1).collect();
        assert_eq!(multi_groups.len(), 1);
        assert_eq!(multi_groups[0].diff_hunk_ids.len(), 2);
    }

    #[test]
    fn unlinked_singleton_hunks_bucket_together() {
        let mut files = vec![source_file("f0", &["h0"]), source_file("f1", &["h0"])];
        assign_unique_indices(&mut files);

        let groups = group(&files, &[], &[], true);
        assert_eq!(groups.len(), 1);
        let singles = groups.values().next().unwrap();
        assert_eq!(singles.diff_hunk_ids.len(), 2);
    }

    #[test]
    fn non_source_hunks_become_group_zero() {
        let mut non_source = source_file("f0", &["h0"]);
        non_source.file_type = FileType::NonSource;
        let mut files = vec![non_source, source_file("f1", &["h0"])];
        assign_unique_indices(&mut files);

        let groups = group(&files, &[], &[], true);
        assert!(groups.contains_key("group0"));
        assert_eq!(groups["group0"].diff_hunk_ids, vec![composite_key("f0", "h0")]);
    }

    #[test]
    fn process_non_source_changes_false_drops_non_source_hunks() {
        let mut non_source = source_file("f0", &["h0"]);
        non_source.file_type = FileType::NonSource;
        let mut files = vec![non_source, source_file("f1", &["h0"])];
        assign_unique_indices(&mut files);

        let groups = group(&files, &[], &[], false);
        let all_keys: Vec<&String> = groups.values().flat_map(|g| g.diff_hunk_ids.iter()).collect();
        assert_eq!(all_keys, vec![&composite_key("f1", "h0")]);
    }
}
