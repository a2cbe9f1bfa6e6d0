use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};

use weft_core::{Classification, RefKind, Reference};
use weft_extract::RawReference;
use weft_inventory::resolver::{self, Resolution};
use weft_inventory::walker::Inventory;

/// All raw references extracted from one source file.
///
/// # Examples
///
/// ```
/// use weft_core::RefKind;
/// use weft_extract::RawReference;
/// use weft_graph::graph::SourceExtract;
///
/// let extract = SourceExtract {
///     source: "index.html".into(),
///     raw: vec![RawReference::new(RefKind::StylesheetLink, "css/main.css")],
/// };
/// assert_eq!(extract.raw.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct SourceExtract {
    /// Canonical path of the file the references were extracted from.
    pub source: String,
    /// Raw references in extraction order.
    pub raw: Vec<RawReference>,
}

/// Directed multigraph of assets linked by declared references.
///
/// Nodes are the inventory's assets. Edges are the relative references whose
/// target exists; dangling targets never become nodes — they stay on the
/// reference list with `exists == false`, which is the authoritative
/// missing-reference record.
///
/// Building the graph is the single point where references are classified,
/// resolved, and stamped with existence. The merge is order-independent:
/// extracts are sorted by source before stamping, so the result is identical
/// regardless of extraction order or parallelism.
///
/// # Examples
///
/// ```
/// use weft_core::{Asset, AssetKind, RefKind};
/// use weft_extract::RawReference;
/// use weft_graph::graph::{ReferenceGraph, SourceExtract};
/// use weft_inventory::walker::Inventory;
///
/// let mut inventory = Inventory::new();
/// inventory.insert(Asset { path: "index.html".into(), kind: AssetKind::Html, size_bytes: 0 });
/// inventory.insert(Asset { path: "css/main.css".into(), kind: AssetKind::Stylesheet, size_bytes: 0 });
///
/// let graph = ReferenceGraph::build(&inventory, vec![SourceExtract {
///     source: "index.html".into(),
///     raw: vec![RawReference::new(RefKind::StylesheetLink, "css/main.css")],
/// }]);
/// assert_eq!(graph.edge_count(), 1);
/// assert!(graph.missing().is_empty());
/// ```
pub struct ReferenceGraph {
    graph: DiGraph<String, RefKind>,
    path_to_index: HashMap<String, NodeIndex>,
    references: Vec<Reference>,
}

impl ReferenceGraph {
    /// Assemble the graph from the inventory and all per-file extracts.
    pub fn build(inventory: &Inventory, mut extracts: Vec<SourceExtract>) -> Self {
        let mut graph = DiGraph::new();
        let mut path_to_index: HashMap<String, NodeIndex> = HashMap::new();

        // Deterministic node order regardless of walk order.
        let mut paths: Vec<&str> = inventory.assets().map(|a| a.path.as_str()).collect();
        paths.sort_unstable();
        for path in paths {
            let idx = graph.add_node(path.to_string());
            path_to_index.insert(path.to_string(), idx);
        }

        // Deterministic reference order regardless of extraction order.
        extracts.sort_by(|a, b| a.source.cmp(&b.source));

        let mut references = Vec::new();
        for extract in &extracts {
            for raw in &extract.raw {
                let reference = stamp(&extract.source, raw, inventory);

                if reference.exists {
                    if let Some(resolved) = &reference.resolved {
                        let from = path_to_index.get(&reference.source).copied();
                        let to = path_to_index.get(resolved).copied();
                        if let (Some(from), Some(to)) = (from, to) {
                            graph.add_edge(from, to, reference.kind);
                        }
                    }
                }

                references.push(reference);
            }
        }

        Self {
            graph,
            path_to_index,
            references,
        }
    }

    /// Every stamped reference, dangling ones included.
    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    /// The dangling references: relative, with no matching asset.
    pub fn missing(&self) -> Vec<&Reference> {
        self.references.iter().filter(|r| r.is_dangling()).collect()
    }

    /// Dangling references of one declaration kind.
    pub fn missing_of_kind(&self, kind: RefKind) -> Vec<&Reference> {
        self.references
            .iter()
            .filter(|r| r.is_dangling() && r.kind == kind)
            .collect()
    }

    /// All references declared by one source file.
    pub fn refs_from<'a>(&'a self, source: &str) -> Vec<&'a Reference> {
        self.references
            .iter()
            .filter(|r| r.source == source)
            .collect()
    }

    /// Sources that reference the given asset via an existing relative edge.
    pub fn referenced_by(&self, target: &str) -> Vec<&str> {
        let Some(&idx) = self.path_to_index.get(target) else {
            return Vec::new();
        };
        let mut sources: Vec<&str> = self
            .graph
            .neighbors_directed(idx, petgraph::Direction::Incoming)
            .map(|n| self.graph[n].as_str())
            .collect();
        sources.sort_unstable();
        sources.dedup();
        sources
    }

    /// Number of asset nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of existing reference edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

/// Classify, resolve, and stamp one raw reference. This is the only place
/// `classification`, `resolved`, and `exists` are ever written.
fn stamp(source: &str, raw: &RawReference, inventory: &Inventory) -> Reference {
    let resolution = match raw.kind {
        RefKind::JsImport | RefKind::JsRequire => {
            resolver::resolve_module(source, &raw.declared, inventory)
        }
        _ => resolver::resolve(source, &raw.declared),
    };

    match resolution {
        Resolution::External(classification) => Reference {
            source: source.to_string(),
            declared: raw.declared.clone(),
            kind: raw.kind,
            classification,
            resolved: None,
            exists: true,
        },
        Resolution::Resolved(path) => {
            let exists = inventory.contains(&path);
            Reference {
                source: source.to_string(),
                declared: raw.declared.clone(),
                kind: raw.kind,
                classification: Classification::Relative,
                resolved: Some(path),
                exists,
            }
        }
        // A `..` that escapes the tree root: unresolvable, carried through
        // with the declared string so the report can show what was written.
        Resolution::EscapesRoot => Reference {
            source: source.to_string(),
            declared: raw.declared.clone(),
            kind: raw.kind,
            classification: Classification::Relative,
            resolved: Some(raw.declared.clone()),
            exists: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_core::{Asset, AssetKind};

    fn inventory_with(paths: &[(&str, AssetKind)]) -> Inventory {
        let mut inventory = Inventory::new();
        for (path, kind) in paths {
            inventory.insert(Asset {
                path: (*path).into(),
                kind: *kind,
                size_bytes: 0,
            });
        }
        inventory
    }

    fn extract(source: &str, raw: Vec<RawReference>) -> SourceExtract {
        SourceExtract {
            source: source.into(),
            raw,
        }
    }

    #[test]
    fn existing_relative_reference_becomes_an_edge() {
        let inventory = inventory_with(&[
            ("index.html", AssetKind::Html),
            ("css/main.css", AssetKind::Stylesheet),
        ]);
        let graph = ReferenceGraph::build(
            &inventory,
            vec![extract(
                "index.html",
                vec![RawReference::new(RefKind::StylesheetLink, "css/main.css")],
            )],
        );

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.missing().is_empty());
        assert_eq!(graph.referenced_by("css/main.css"), vec!["index.html"]);
    }

    #[test]
    fn dangling_reference_is_recorded_not_noded() {
        let inventory = inventory_with(&[("index.html", AssetKind::Html)]);
        let graph = ReferenceGraph::build(
            &inventory,
            vec![extract(
                "index.html",
                vec![RawReference::new(RefKind::StylesheetLink, "css/missing.css")],
            )],
        );

        // The missing target never becomes a node.
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 0);

        let missing = graph.missing();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].resolved.as_deref(), Some("css/missing.css"));
        assert_eq!(missing[0].source, "index.html");
    }

    #[test]
    fn external_references_always_exist() {
        let inventory = inventory_with(&[("index.html", AssetKind::Html)]);
        let graph = ReferenceGraph::build(
            &inventory,
            vec![extract(
                "index.html",
                vec![
                    RawReference::new(RefKind::ScriptSrc, "https://cdn.test/lib.js"),
                    RawReference::new(RefKind::ScriptSrc, "//cdn.test/lib2.js"),
                    RawReference::new(RefKind::ImageSrc, "data:image/png;base64,AA"),
                ],
            )],
        );

        assert!(graph.missing().is_empty());
        for r in graph.references() {
            assert!(r.exists);
            assert!(r.resolved.is_none());
            assert!(r.classification.is_external());
        }
    }

    #[test]
    fn classification_partition_holds_for_every_reference() {
        let inventory = inventory_with(&[
            ("index.html", AssetKind::Html),
            ("js/app.js", AssetKind::Script),
        ]);
        let graph = ReferenceGraph::build(
            &inventory,
            vec![extract(
                "index.html",
                vec![
                    RawReference::new(RefKind::ScriptSrc, "js/app.js"),
                    RawReference::new(RefKind::ScriptSrc, "js/ghost.js"),
                    RawReference::new(RefKind::ScriptSrc, "https://cdn.test/x.js"),
                    RawReference::new(RefKind::ImageSrc, "../escape.png"),
                ],
            )],
        );

        for r in graph.references() {
            assert_eq!(
                r.classification == Classification::Relative,
                r.resolved.is_some(),
                "partition violated for {:?}",
                r.declared
            );
        }
    }

    #[test]
    fn escaping_reference_is_missing_with_declared_string() {
        let inventory = inventory_with(&[("index.html", AssetKind::Html)]);
        let graph = ReferenceGraph::build(
            &inventory,
            vec![extract(
                "index.html",
                vec![RawReference::new(RefKind::ImageSrc, "../shared/logo.png")],
            )],
        );
        let missing = graph.missing();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].resolved.as_deref(), Some("../shared/logo.png"));
    }

    #[test]
    fn module_fallback_applies_to_js_imports_only() {
        let inventory = inventory_with(&[
            ("js/app.js", AssetKind::Script),
            ("js/util.js", AssetKind::Script),
        ]);
        let graph = ReferenceGraph::build(
            &inventory,
            vec![extract(
                "js/app.js",
                vec![RawReference::new(RefKind::JsImport, "./util")],
            )],
        );

        let refs = graph.references();
        assert_eq!(refs[0].resolved.as_deref(), Some("js/util.js"));
        assert!(refs[0].exists);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn build_is_order_independent() {
        let inventory = inventory_with(&[
            ("a.html", AssetKind::Html),
            ("b.html", AssetKind::Html),
            ("css/x.css", AssetKind::Stylesheet),
        ]);
        let forward = vec![
            extract("a.html", vec![RawReference::new(RefKind::StylesheetLink, "css/x.css")]),
            extract("b.html", vec![RawReference::new(RefKind::StylesheetLink, "css/y.css")]),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();

        let g1 = ReferenceGraph::build(&inventory, forward);
        let g2 = ReferenceGraph::build(&inventory, reversed);

        let keys = |g: &ReferenceGraph| {
            g.references()
                .iter()
                .map(|r| (r.source.clone(), r.declared.clone(), r.exists))
                .collect::<Vec<_>>()
        };
        assert_eq!(keys(&g1), keys(&g2));
    }

    #[test]
    fn missing_partitions_by_kind() {
        let inventory = inventory_with(&[
            ("index.html", AssetKind::Html),
            ("css/main.css", AssetKind::Stylesheet),
        ]);
        let graph = ReferenceGraph::build(
            &inventory,
            vec![
                extract(
                    "index.html",
                    vec![
                        RawReference::new(RefKind::StylesheetLink, "css/gone.css"),
                        RawReference::new(RefKind::ScriptSrc, "js/gone.js"),
                    ],
                ),
                extract(
                    "css/main.css",
                    vec![RawReference::new(RefKind::CssImport, "partials/ghost.css")],
                ),
            ],
        );

        assert_eq!(graph.missing().len(), 3);
        assert_eq!(graph.missing_of_kind(RefKind::StylesheetLink).len(), 1);
        assert_eq!(graph.missing_of_kind(RefKind::ScriptSrc).len(), 1);
        assert_eq!(graph.missing_of_kind(RefKind::CssImport).len(), 1);
        assert_eq!(graph.missing_of_kind(RefKind::ImageSrc).len(), 0);
    }

    #[test]
    fn refs_from_filters_by_source() {
        let inventory = inventory_with(&[
            ("a.html", AssetKind::Html),
            ("b.html", AssetKind::Html),
        ]);
        let graph = ReferenceGraph::build(
            &inventory,
            vec![
                extract("a.html", vec![RawReference::new(RefKind::ImageSrc, "x.png")]),
                extract("b.html", vec![RawReference::new(RefKind::ImageSrc, "y.png")]),
            ],
        );
        assert_eq!(graph.refs_from("a.html").len(), 1);
        assert_eq!(graph.refs_from("a.html")[0].declared, "x.png");
    }
}
