//! The Reference-Graph data model: a typed, directed, multi-edge graph of
//! program entities (functions, types, modules, …) and the relationships
//! between them, as built by one Reference-Graph Builder run.

pub mod extractor;

use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use serde::{Deserialize, Serialize};

/// What kind of program entity a [`Node`] represents. Mirrors the
/// teacher's `SymbolKind` (`symbols/mod.rs`) one-to-one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Function,
    Struct,
    Class,
    Trait,
    Impl,
    Method,
    Enum,
    Interface,
    Module,
    Type,
}

/// One program entity discovered by the Reference-Graph Builder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub qualified_name: String,
    pub kind: NodeKind,
    pub is_in_diff_hunk: bool,
    /// The hunk `uniqueIndex` that tagged this node, or empty if
    /// `is_in_diff_hunk` is `false`.
    pub diff_hunk_index: String,
}

/// The relationship a directed [`Edge`] expresses between two [`Node`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    Declares,
    Contains,
    Extends,
    Implements,
    Calls,
    Reads,
    Writes,
    ReferencesType,
    OverridesTarget,
}

impl EdgeKind {
    /// Structural edges express containment/declaration; everything else
    /// is a non-structural behavioral reference. See spec.md §3.
    pub fn is_structural(self) -> bool {
        matches!(
            self,
            EdgeKind::Declares | EdgeKind::Contains | EdgeKind::Extends | EdgeKind::Implements
        )
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Edge {
    pub kind: EdgeKind,
}

/// The Reference-Graph Builder's output: entities and their relationships
/// for a single version (pre- or post-change) of the working set.
pub type ReferenceGraph = StableDiGraph<Node, Edge>;

/// Stable, serializable id for a node — its `petgraph` index, which never
/// changes as long as nodes are never removed from the graph (they never
/// are, in this crate: a `ReferenceGraph` is built once and read-only
/// thereafter).
pub fn node_id(index: NodeIndex) -> usize {
    index.index()
}
