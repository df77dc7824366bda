//! Tree-sitter-backed Reference-Graph Builder.
//!
//! Adapts the teacher's `symbols/extractor.rs` AST walk two ways: every
//! extracted symbol becomes a graph [`Node`] with containment edges
//! (`Declares`/`Contains`) instead of a bare `Symbol` tree, and a second
//! pass — absent from the teacher, whose `SymbolReference`/
//! `symbol_references` field is declared but never populated — walks
//! identifier occurrences to produce non-structural reference edges
//! (`Calls`/`Reads`/`Writes`/`ReferencesType`/`OverridesTarget`).

use super::{Edge, EdgeKind, Node as GraphNode, NodeKind, ReferenceGraph};
use crate::error::EngineError;
use crate::model::{DiffFile, DiffHunk, HunkSide};
use petgraph::stable_graph::NodeIndex;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tree_sitter::{Language, Node, Parser};

/// Which side of a hunk's pre/post pair line ranges are checked against,
/// since a Reference-Graph Builder run covers exactly one version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    Base,
    Current,
}

impl Version {
    fn side(self, hunk: &DiffHunk) -> Option<&HunkSide> {
        match self {
            Version::Base => hunk.base_hunk.as_ref(),
            Version::Current => hunk.current_hunk.as_ref(),
        }
    }
}

/// The Reference-Graph Builder's result: the graph itself plus any
/// non-fatal diagnostics (one per file that could not be parsed).
pub struct BuildOutcome {
    pub graph: ReferenceGraph,
    pub diagnostics: Vec<EngineError>,
}

/// Get the tree-sitter language for a file based on its extension.
pub fn get_language_for_file(relative_path: &str) -> Option<Language> {
    let ext = relative_path.rsplit('.').next()?.to_lowercase();
    match ext.as_str() {
        #[cfg(feature = "symbols-rust-lang")]
        "rs" => Some(tree_sitter_rust::LANGUAGE.into()),
        #[cfg(feature = "symbols-typescript")]
        "js" | "jsx" | "mjs" | "cjs" => Some(tree_sitter_javascript::LANGUAGE.into()),
        #[cfg(feature = "symbols-typescript")]
        "ts" => Some(tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()),
        #[cfg(feature = "symbols-typescript")]
        "tsx" => Some(tree_sitter_typescript::LANGUAGE_TSX.into()),
        #[cfg(feature = "symbols-python")]
        "py" | "pyi" => Some(tree_sitter_python::LANGUAGE.into()),
        #[cfg(feature = "symbols-go")]
        "go" => Some(tree_sitter_go::LANGUAGE.into()),
        _ => None,
    }
}

/// A single extracted program entity, prior to graph insertion.
struct Symbol {
    name: String,
    kind: NodeKind,
    start_line: u32,
    end_line: u32,
    children: Vec<Symbol>,
    /// For a Rust `impl Trait for Type` or a JS/TS `class X extends Y`:
    /// the simple name of the trait/superclass this symbol should get an
    /// `Implements`/`Extends` edge to, if one is found in the working set.
    implements_name: Option<String>,
}

/// Run the Reference-Graph Builder over one version's materialized
/// snapshot directory.
///
/// Per spec.md §4.1, a file that cannot be parsed (no grammar, or a
/// tree-sitter failure) contributes a [`EngineError::ParseFailure`]
/// diagnostic and zero nodes rather than aborting the whole build.
pub fn build_reference_graph(dir: &Path, diff_files: &[DiffFile], version: Version) -> BuildOutcome {
    let mut graph = ReferenceGraph::default();
    let mut diagnostics = Vec::new();
    let mut name_index: HashMap<String, Vec<NodeIndex>> = HashMap::new();
    let mut container_methods: HashMap<NodeIndex, HashMap<String, NodeIndex>> = HashMap::new();
    let mut pending_implements: Vec<(NodeIndex, String)> = Vec::new();
    let mut span_index: Vec<(String, u32, u32, NodeIndex)> = Vec::new();
    let mut sources: Vec<(&DiffFile, String)> = Vec::new();

    for file in diff_files {
        if !matches!(file.file_type, crate::model::FileType::Source) {
            continue;
        }
        let path = dir.join(&file.relative_path);
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("failed to read {} for {version:?}: {e}", path.display());
                diagnostics.push(EngineError::parse_failure(&file.file_id, e.to_string()));
                continue;
            }
        };
        let Some(language) = get_language_for_file(&file.relative_path) else {
            log::debug!("no grammar available for {}, skipping", file.relative_path);
            diagnostics.push(EngineError::parse_failure(
                &file.file_id,
                "no grammar available for this file type",
            ));
            continue;
        };

        let mut parser = Parser::new();
        if parser.set_language(&language).is_err() {
            diagnostics.push(EngineError::parse_failure(&file.file_id, "unsupported grammar"));
            continue;
        }
        let Some(tree) = parser.parse(&content, None) else {
            diagnostics.push(EngineError::parse_failure(&file.file_id, "tree-sitter parse failed"));
            continue;
        };

        let ext = file
            .relative_path
            .rsplit('.')
            .next()
            .unwrap_or("")
            .to_lowercase();
        let symbols = extract_symbols_from_node(tree.root_node(), &content, &ext);

        insert_symbols(
            &mut graph,
            &symbols,
            &file.relative_path,
            "",
            None,
            false,
            file,
            version,
            &mut name_index,
            &mut container_methods,
            &mut pending_implements,
            &mut span_index,
        );

        sources.push((file, content));
    }

    apply_implements_and_overrides(&mut graph, &pending_implements, &name_index, &container_methods);
    insert_reference_edges(&mut graph, &sources, &name_index, &span_index);

    BuildOutcome { graph, diagnostics }
}

#[allow(clippy::too_many_arguments)]
fn insert_symbols(
    graph: &mut ReferenceGraph,
    symbols: &[Symbol],
    relative_path: &str,
    prefix: &str,
    parent: Option<NodeIndex>,
    parent_is_module: bool,
    file: &DiffFile,
    version: Version,
    name_index: &mut HashMap<String, Vec<NodeIndex>>,
    container_methods: &mut HashMap<NodeIndex, HashMap<String, NodeIndex>>,
    pending_implements: &mut Vec<(NodeIndex, String)>,
    span_index: &mut Vec<(String, u32, u32, NodeIndex)>,
) {
    for sym in symbols {
        let qualified_name = if prefix.is_empty() {
            format!("{relative_path}::{}", sym.name)
        } else {
            format!("{prefix}::{}", sym.name)
        };

        let diff_hunk_index = find_overlapping_hunk(file, sym.start_line, sym.end_line, version)
            .map(|h| h.unique_index.clone())
            .unwrap_or_default();

        let idx = graph.add_node(GraphNode {
            qualified_name: qualified_name.clone(),
            kind: sym.kind,
            is_in_diff_hunk: !diff_hunk_index.is_empty(),
            diff_hunk_index,
        });

        if let Some(parent_idx) = parent {
            let kind = if parent_is_module {
                EdgeKind::Contains
            } else {
                EdgeKind::Declares
            };
            graph.add_edge(parent_idx, idx, Edge { kind });
        }

        name_index.entry(sym.name.clone()).or_default().push(idx);
        span_index.push((relative_path.to_owned(), sym.start_line, sym.end_line, idx));

        if let Some(target) = &sym.implements_name {
            pending_implements.push((idx, target.clone()));
        }
        if sym.kind == NodeKind::Method {
            if let Some(parent_idx) = parent {
                container_methods
                    .entry(parent_idx)
                    .or_default()
                    .insert(sym.name.clone(), idx);
            }
        }

        insert_symbols(
            graph,
            &sym.children,
            relative_path,
            &qualified_name,
            Some(idx),
            sym.kind == NodeKind::Module,
            file,
            version,
            name_index,
            container_methods,
            pending_implements,
            span_index,
        );
    }
}

fn find_overlapping_hunk(
    file: &DiffFile,
    start_line: u32,
    end_line: u32,
    version: Version,
) -> Option<&DiffHunk> {
    file.hunks.iter().find(|hunk| {
        version
            .side(hunk)
            .is_some_and(|side| ranges_overlap(start_line, end_line, side.start_line, side.end_line))
    })
}

fn ranges_overlap(a_start: u32, a_end: u32, b_start: u32, b_end: u32) -> bool {
    a_start <= b_end && b_start <= a_end
}

fn apply_implements_and_overrides(
    graph: &mut ReferenceGraph,
    pending_implements: &[(NodeIndex, String)],
    name_index: &HashMap<String, Vec<NodeIndex>>,
    container_methods: &HashMap<NodeIndex, HashMap<String, NodeIndex>>,
) {
    let mut edges_to_add: Vec<(NodeIndex, NodeIndex, EdgeKind)> = Vec::new();

    for (node_idx, target_name) in pending_implements {
        let Some(candidates) = name_index.get(target_name) else {
            continue;
        };
        let Some(&target_idx) = candidates.first() else {
            continue;
        };
        if target_idx == *node_idx {
            continue;
        }
        edges_to_add.push((*node_idx, target_idx, EdgeKind::Implements));

        if let (Some(own_methods), Some(target_methods)) =
            (container_methods.get(node_idx), container_methods.get(&target_idx))
        {
            for (name, &method_idx) in own_methods {
                if let Some(&target_method_idx) = target_methods.get(name) {
                    edges_to_add.push((method_idx, target_method_idx, EdgeKind::OverridesTarget));
                }
            }
        }
    }

    for (from, to, kind) in edges_to_add {
        graph.add_edge(from, to, Edge { kind });
    }
}

fn insert_reference_edges(
    graph: &mut ReferenceGraph,
    sources: &[(&DiffFile, String)],
    name_index: &HashMap<String, Vec<NodeIndex>>,
    span_index: &[(String, u32, u32, NodeIndex)],
) {
    let mut seen: HashSet<(NodeIndex, NodeIndex, EdgeKind)> = HashSet::new();
    let mut edges_to_add: Vec<(NodeIndex, NodeIndex, EdgeKind)> = Vec::new();

    for (file, content) in sources {
        let Some(language) = get_language_for_file(&file.relative_path) else {
            continue;
        };
        let mut parser = Parser::new();
        if parser.set_language(&language).is_err() {
            continue;
        }
        let Some(tree) = parser.parse(content, None) else {
            continue;
        };

        let mut identifiers = Vec::new();
        collect_identifiers(tree.root_node(), &mut identifiers);

        for identifier in identifiers {
            let text = node_text(identifier, content);
            let Some(candidates) = name_index.get(text) else {
                continue;
            };
            let line = identifier.start_position().row as u32 + 1;
            let Some(enclosing_idx) = tightest_enclosing(span_index, &file.relative_path, line) else {
                continue;
            };

            let parent_kind = identifier.parent().map(|p| p.kind()).unwrap_or("");
            let edge_kind = if parent_kind.contains("call") {
                EdgeKind::Calls
            } else if parent_kind.contains("assignment") {
                EdgeKind::Writes
            } else if parent_kind.contains("type") || identifier.kind() == "type_identifier" {
                EdgeKind::ReferencesType
            } else {
                EdgeKind::Reads
            };

            for &target_idx in candidates {
                if target_idx == enclosing_idx {
                    continue;
                }
                let key = (enclosing_idx, target_idx, edge_kind);
                if seen.insert(key) {
                    edges_to_add.push(key);
                }
            }
        }
    }

    for (from, to, kind) in edges_to_add {
        graph.add_edge(from, to, Edge { kind });
    }
}

fn tightest_enclosing(
    span_index: &[(String, u32, u32, NodeIndex)],
    relative_path: &str,
    line: u32,
) -> Option<NodeIndex> {
    span_index
        .iter()
        .filter(|(path, start, end, _)| path == relative_path && *start <= line && line <= *end)
        .min_by_key(|(_, start, end, _)| end - start)
        .map(|(_, _, _, idx)| *idx)
}

fn collect_identifiers<'a>(node: Node<'a>, out: &mut Vec<Node<'a>>) {
    if matches!(node.kind(), "identifier" | "type_identifier" | "field_identifier") {
        out.push(node);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_identifiers(child, out);
    }
}

fn extract_symbols_from_node(node: Node, source: &str, ext: &str) -> Vec<Symbol> {
    let mut symbols = Vec::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(symbol) = node_to_symbol(child, source, ext) {
            symbols.push(symbol);
        }
    }
    symbols
}

fn node_to_symbol(node: Node, source: &str, ext: &str) -> Option<Symbol> {
    match ext {
        "rs" => rust_node_to_symbol(node, source, node.kind()),
        "js" | "jsx" | "mjs" | "cjs" | "ts" | "tsx" => js_ts_node_to_symbol(node, source, node.kind()),
        "py" | "pyi" => python_node_to_symbol(node, source, node.kind()),
        "go" => go_node_to_symbol(node, source, node.kind()),
        _ => None,
    }
}

fn line_range(node: Node) -> (u32, u32) {
    (
        node.start_position().row as u32 + 1,
        node.end_position().row as u32 + 1,
    )
}

fn rust_node_to_symbol(node: Node, source: &str, kind_str: &str) -> Option<Symbol> {
    let (start_line, end_line) = line_range(node);
    match kind_str {
        "function_item" => Some(Symbol {
            name: find_child_text(node, "name", source)?,
            kind: NodeKind::Function,
            start_line,
            end_line,
            children: vec![],
            implements_name: None,
        }),
        "struct_item" => Some(Symbol {
            name: find_child_text(node, "name", source)?,
            kind: NodeKind::Struct,
            start_line,
            end_line,
            children: vec![],
            implements_name: None,
        }),
        "enum_item" => Some(Symbol {
            name: find_child_text(node, "name", source)?,
            kind: NodeKind::Enum,
            start_line,
            end_line,
            children: vec![],
            implements_name: None,
        }),
        "trait_item" => Some(Symbol {
            name: find_child_text(node, "name", source)?,
            kind: NodeKind::Trait,
            start_line,
            end_line,
            children: extract_methods_from_body(node, source),
            implements_name: None,
        }),
        "impl_item" => {
            let type_name = node_text(node.child_by_field_name("type")?, source).to_owned();
            let trait_name = node
                .child_by_field_name("trait")
                .map(|t| node_text(t, source).to_owned());
            let name = match &trait_name {
                Some(t) => format!("{t} for {type_name}"),
                None => type_name,
            };
            Some(Symbol {
                name,
                kind: NodeKind::Impl,
                start_line,
                end_line,
                children: extract_methods_from_body(node, source),
                implements_name: trait_name,
            })
        }
        "type_item" => Some(Symbol {
            name: find_child_text(node, "name", source)?,
            kind: NodeKind::Type,
            start_line,
            end_line,
            children: vec![],
            implements_name: None,
        }),
        "mod_item" => {
            let name = find_child_text(node, "name", source)?;
            let body = node.child_by_field_name("body")?;
            Some(Symbol {
                name,
                kind: NodeKind::Module,
                start_line,
                end_line,
                children: extract_symbols_from_node(body, source, "rs"),
                implements_name: None,
            })
        }
        _ => None,
    }
}

fn js_ts_node_to_symbol(node: Node, source: &str, kind_str: &str) -> Option<Symbol> {
    let (start_line, end_line) = line_range(node);
    match kind_str {
        "function_declaration" | "generator_function_declaration" => Some(Symbol {
            name: find_child_text(node, "name", source)?,
            kind: NodeKind::Function,
            start_line,
            end_line,
            children: vec![],
            implements_name: None,
        }),
        "class_declaration" => {
            let implements_name = node
                .child_by_field_name("superclass")
                .map(|n| node_text(n, source).to_owned());
            Some(Symbol {
                name: find_child_text(node, "name", source)?,
                kind: NodeKind::Class,
                start_line,
                end_line,
                children: extract_class_methods_js(node, source),
                implements_name,
            })
        }
        "interface_declaration" => Some(Symbol {
            name: find_child_text(node, "name", source)?,
            kind: NodeKind::Interface,
            start_line,
            end_line,
            children: vec![],
            implements_name: None,
        }),
        "type_alias_declaration" => Some(Symbol {
            name: find_child_text(node, "name", source)?,
            kind: NodeKind::Type,
            start_line,
            end_line,
            children: vec![],
            implements_name: None,
        }),
        "enum_declaration" => Some(Symbol {
            name: find_child_text(node, "name", source)?,
            kind: NodeKind::Enum,
            start_line,
            end_line,
            children: vec![],
            implements_name: None,
        }),
        "export_statement" => {
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                if let Some(sym) = js_ts_node_to_symbol(child, source, child.kind()) {
                    return Some(sym);
                }
            }
            None
        }
        "lexical_declaration" | "variable_declaration" => extract_variable_function(node, source),
        _ => None,
    }
}

fn extract_variable_function(node: Node, source: &str) -> Option<Symbol> {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "variable_declarator" {
            let name = find_child_text(child, "name", source)?;
            let value = child.child_by_field_name("value")?;
            if matches!(value.kind(), "arrow_function" | "function_expression" | "function") {
                let (start_line, end_line) = line_range(node);
                return Some(Symbol {
                    name,
                    kind: NodeKind::Function,
                    start_line,
                    end_line,
                    children: vec![],
                    implements_name: None,
                });
            }
        }
    }
    None
}

fn extract_class_methods_js(class_node: Node, source: &str) -> Vec<Symbol> {
    let mut methods = Vec::new();
    let Some(body) = class_node.child_by_field_name("body") else {
        return methods;
    };
    let mut cursor = body.walk();
    for child in body.children(&mut cursor) {
        if matches!(child.kind(), "method_definition" | "public_field_definition") {
            if let Some(name) = find_child_text(child, "name", source) {
                let (start_line, end_line) = line_range(child);
                methods.push(Symbol {
                    name,
                    kind: NodeKind::Method,
                    start_line,
                    end_line,
                    children: vec![],
                    implements_name: None,
                });
            }
        }
    }
    methods
}

fn python_node_to_symbol(node: Node, source: &str, kind_str: &str) -> Option<Symbol> {
    let (start_line, end_line) = line_range(node);
    match kind_str {
        "function_definition" => Some(Symbol {
            name: find_child_text(node, "name", source)?,
            kind: NodeKind::Function,
            start_line,
            end_line,
            children: vec![],
            implements_name: None,
        }),
        "class_definition" => Some(Symbol {
            name: find_child_text(node, "name", source)?,
            kind: NodeKind::Class,
            start_line,
            end_line,
            children: extract_python_methods(node, source),
            implements_name: None,
        }),
        "decorated_definition" => {
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                if let Some(mut sym) = python_node_to_symbol(child, source, child.kind()) {
                    sym.start_line = start_line;
                    return Some(sym);
                }
            }
            None
        }
        _ => None,
    }
}

fn extract_python_methods(class_node: Node, source: &str) -> Vec<Symbol> {
    let mut methods = Vec::new();
    let Some(body) = class_node.child_by_field_name("body") else {
        return methods;
    };
    let mut cursor = body.walk();
    for child in body.children(&mut cursor) {
        match child.kind() {
            "function_definition" => {
                if let Some(name) = find_child_text(child, "name", source) {
                    let (start_line, end_line) = line_range(child);
                    methods.push(Symbol {
                        name,
                        kind: NodeKind::Method,
                        start_line,
                        end_line,
                        children: vec![],
                        implements_name: None,
                    });
                }
            }
            "decorated_definition" => {
                let mut inner_cursor = child.walk();
                for inner in child.children(&mut inner_cursor) {
                    if inner.kind() == "function_definition" {
                        if let Some(name) = find_child_text(inner, "name", source) {
                            let (start_line, end_line) = line_range(child);
                            methods.push(Symbol {
                                name,
                                kind: NodeKind::Method,
                                start_line,
                                end_line,
                                children: vec![],
                                implements_name: None,
                            });
                        }
                    }
                }
            }
            _ => {}
        }
    }
    methods
}

fn go_node_to_symbol(node: Node, source: &str, kind_str: &str) -> Option<Symbol> {
    let (start_line, end_line) = line_range(node);
    match kind_str {
        "function_declaration" => Some(Symbol {
            name: find_child_text(node, "name", source)?,
            kind: NodeKind::Function,
            start_line,
            end_line,
            children: vec![],
            implements_name: None,
        }),
        "method_declaration" => {
            let name = find_child_text(node, "name", source)?;
            let receiver = extract_go_receiver(node, source).unwrap_or_default();
            let full_name = if receiver.is_empty() {
                name
            } else {
                format!("({receiver}).{name}")
            };
            Some(Symbol {
                name: full_name,
                kind: NodeKind::Method,
                start_line,
                end_line,
                children: vec![],
                implements_name: None,
            })
        }
        "type_declaration" => {
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                if child.kind() == "type_spec" {
                    let name = find_child_text(child, "name", source)?;
                    let type_node = child.child_by_field_name("type")?;
                    let kind = match type_node.kind() {
                        "struct_type" => NodeKind::Struct,
                        "interface_type" => NodeKind::Interface,
                        _ => NodeKind::Type,
                    };
                    return Some(Symbol {
                        name,
                        kind,
                        start_line,
                        end_line,
                        children: vec![],
                        implements_name: None,
                    });
                }
            }
            None
        }
        _ => None,
    }
}

fn extract_go_receiver(node: Node, source: &str) -> Option<String> {
    let receiver = node.child_by_field_name("receiver")?;
    let mut cursor = receiver.walk();
    for child in receiver.children(&mut cursor) {
        if child.kind() == "parameter_declaration" {
            if let Some(type_node) = child.child_by_field_name("type") {
                return Some(node_text(type_node, source).trim_start_matches('*').to_owned());
            }
        }
    }
    None
}

fn extract_methods_from_body(parent: Node, source: &str) -> Vec<Symbol> {
    let mut methods = Vec::new();
    let Some(body) = parent.child_by_field_name("body") else {
        return methods;
    };
    let mut cursor = body.walk();
    for child in body.children(&mut cursor) {
        if child.kind() == "function_item" {
            if let Some(name) = find_child_text(child, "name", source) {
                let (start_line, end_line) = line_range(child);
                methods.push(Symbol {
                    name,
                    kind: NodeKind::Method,
                    start_line,
                    end_line,
                    children: vec![],
                    implements_name: None,
                });
            }
        }
    }
    methods
}

fn node_text<'a>(node: Node<'a>, source: &'a str) -> &'a str {
    &source[node.byte_range()]
}

fn find_child_text(node: Node, field: &str, source: &str) -> Option<String> {
    node.child_by_field_name(field).map(|n| node_text(n, source).to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DiffFile, DiffHunk, FileType};

    fn file_with_hunk(relative_path: &str, current_start: u32, current_end: u32) -> DiffFile {
        DiffFile {
            file_id: relative_path.to_owned(),
            file_type: FileType::Source,
            relative_path: relative_path.to_owned(),
            base_content: None,
            current_content: None,
            hunks: vec![DiffHunk {
                diff_hunk_id: "h0".into(),
                unique_index: "0:0".into(),
                base_hunk: None,
                current_hunk: Some(HunkSide {
                    start_line: current_start,
                    end_line: current_end,
                    lines: vec![],
                    relative_file_path: relative_path.to_owned(),
                }),
                raw_diff: String::new(),
            }],
        }
    }

    #[test]
    fn extracts_rust_function_and_struct() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("lib.rs"),
            "fn hello() {\n    println!(\"hi\");\n}\n\nstruct Foo {\n    x: i32,\n}\n",
        )
        .unwrap();
        let file = file_with_hunk("lib.rs", 1, 1);
        let outcome = build_reference_graph(dir.path(), &[file], Version::Current);
        assert!(outcome
            .graph
            .node_weights()
            .any(|n| n.qualified_name.ends_with("hello") && n.kind == NodeKind::Function));
        assert!(outcome
            .graph
            .node_weights()
            .any(|n| n.qualified_name.ends_with("Foo") && n.kind == NodeKind::Struct));
    }

    #[test]
    fn builds_graph_with_declares_edge_for_impl_methods() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("lib.rs"),
            "struct Foo;\n\nimpl Foo {\n    fn bar() {}\n}\n",
        )
        .unwrap();
        let file = file_with_hunk("lib.rs", 4, 4);
        let outcome = build_reference_graph(dir.path(), &[file], Version::Current);
        assert!(outcome.diagnostics.is_empty());
        let names: Vec<&str> = outcome
            .graph
            .node_weights()
            .map(|n| n.qualified_name.as_str())
            .collect();
        assert!(names.iter().any(|n| n.ends_with("Foo")));
        assert!(names.iter().any(|n| n.ends_with("bar")));

        let bar = outcome
            .graph
            .node_indices()
            .find(|&i| outcome.graph[i].qualified_name.ends_with("bar"))
            .unwrap();
        assert!(outcome.graph[bar].is_in_diff_hunk);
    }

    #[test]
    fn missing_grammar_is_a_diagnostic_not_a_panic() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("data.json"), "{}").unwrap();
        let file = DiffFile {
            file_id: "data.json".into(),
            file_type: FileType::Source,
            relative_path: "data.json".into(),
            base_content: None,
            current_content: None,
            hunks: vec![],
        };
        let outcome = build_reference_graph(dir.path(), &[file], Version::Current);
        assert_eq!(outcome.graph.node_count(), 0);
        assert_eq!(outcome.diagnostics.len(), 1);
    }

    #[test]
    fn detects_call_edge_between_functions() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("lib.rs"),
            "fn helper() {}\n\nfn caller() {\n    helper();\n}\n",
        )
        .unwrap();
        let file = file_with_hunk("lib.rs", 4, 4);
        let outcome = build_reference_graph(dir.path(), &[file], Version::Current);

        let helper = outcome
            .graph
            .node_indices()
            .find(|&i| outcome.graph[i].qualified_name.ends_with("helper"))
            .unwrap();
        let caller = outcome
            .graph
            .node_indices()
            .find(|&i| outcome.graph[i].qualified_name.ends_with("caller"))
            .unwrap();
        assert!(outcome
            .graph
            .edges_connecting(caller, helper)
            .any(|e| e.weight().kind == EdgeKind::Calls));
    }
}
