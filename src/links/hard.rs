//! Hard-link derivation: two hunks are hard-linked if some node tagged
//! with one hunk's index is connected, by an undirected path, to a node
//! tagged with the other hunk's index — in *either* the base or the
//! current reference graph (a rename/move can sever the link on one side
//! while a structural edge still attests to it on the other).
//!
//! Per §9's Design Note, connectivity is computed with a single pass of a
//! `usize`-keyed union-find over each graph's node indices rather than
//! repeated pairwise reachability queries.

use crate::graph::ReferenceGraph;
use crate::unionfind::UnionFind;
use petgraph::stable_graph::NodeIndex;
use std::collections::{HashMap, HashSet};

/// An unordered candidate pair of hunk `uniqueIndex` strings.
pub type HardLink = (String, String);

/// Candidate hard links witnessed by a single reference graph: every
/// unordered pair of distinct, non-empty `diff_hunk_index` values whose
/// tagged nodes share a connected component.
fn hard_links_in_graph(graph: &ReferenceGraph) -> HashSet<HardLink> {
    let node_count = graph.node_bound();
    let mut uf = UnionFind::new(node_count);

    for edge in graph.edge_indices() {
        if let Some((a, b)) = graph.edge_endpoints(edge) {
            uf.union(index_of(a), index_of(b));
        }
    }

    let mut by_root: HashMap<usize, Vec<&str>> = HashMap::new();
    for idx in graph.node_indices() {
        let node = &graph[idx];
        if !node.is_in_diff_hunk {
            continue;
        }
        let root = uf.find(index_of(idx));
        by_root.entry(root).or_default().push(&node.diff_hunk_index);
    }

    let mut links = HashSet::new();
    for indices in by_root.values() {
        for i in 0..indices.len() {
            for j in (i + 1)..indices.len() {
                if indices[i] == indices[j] {
                    continue;
                }
                let (a, b) = sorted_pair(indices[i], indices[j]);
                links.insert((a, b));
            }
        }
    }
    links
}

fn index_of(idx: NodeIndex) -> usize {
    idx.index()
}

fn sorted_pair(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_owned(), b.to_owned())
    } else {
        (b.to_owned(), a.to_owned())
    }
}

/// The union of hard links witnessed by either version's reference graph.
pub fn derive(base_graph: &ReferenceGraph, current_graph: &ReferenceGraph) -> HashSet<HardLink> {
    let mut links = hard_links_in_graph(base_graph);
    links.extend(hard_links_in_graph(current_graph));
    links
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Edge, EdgeKind, Node, NodeKind};

    fn tagged_node(name: &str, hunk_index: &str) -> Node {
        Node {
            qualified_name: name.to_owned(),
            kind: NodeKind::Function,
            is_in_diff_hunk: !hunk_index.is_empty(),
            diff_hunk_index: hunk_index.to_owned(),
        }
    }

    #[test]
    fn links_hunks_connected_by_a_structural_path() {
        let mut graph = ReferenceGraph::default();
        let a = graph.add_node(tagged_node("a", "0:0"));
        let b = graph.add_node(tagged_node("b", ""));
        let c = graph.add_node(tagged_node("c", "0:1"));
        graph.add_edge(a, b, Edge { kind: EdgeKind::Calls });
        graph.add_edge(b, c, Edge { kind: EdgeKind::Calls });

        let links = hard_links_in_graph(&graph);
        assert!(links.contains(&("0:0".to_owned(), "0:1".to_owned())));
    }

    #[test]
    fn unconnected_hunks_produce_no_link() {
        let mut graph = ReferenceGraph::default();
        graph.add_node(tagged_node("a", "0:0"));
        graph.add_node(tagged_node("c", "0:1"));

        assert!(hard_links_in_graph(&graph).is_empty());
    }

    #[test]
    fn either_version_witnessing_a_path_suffices() {
        let mut base = ReferenceGraph::default();
        let a = base.add_node(tagged_node("a", "0:0"));
        let c = base.add_node(tagged_node("c", "0:1"));
        base.add_edge(a, c, Edge { kind: EdgeKind::Calls });

        let mut current = ReferenceGraph::default();
        current.add_node(tagged_node("a", "0:0"));
        current.add_node(tagged_node("c", "0:1"));

        let links = derive(&base, &current);
        assert!(links.contains(&("0:0".to_owned(), "0:1".to_owned())));
    }
}
