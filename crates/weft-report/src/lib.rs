//! Scan orchestration and report aggregation.
//!
//! [`run_scan`] drives the whole pipeline: build the inventory, fan file
//! extraction out across worker threads, fold the results into the reference
//! graph, and reduce everything into one immutable [`Report`]. Rendering
//! lives in [`render`]; the heuristics live in [`recommend`].

pub mod aggregate;
pub mod recommend;
pub mod render;

use std::path::Path;

use chrono::Utc;
use rayon::prelude::*;

use weft_core::{AssetKind, ModuleKind, WeftConfig, WeftError};
use weft_extract::tokens::{self, DesignSystemData, TokenUsage};
use weft_extract::{css, html, js, RawReference};
use weft_graph::{check_bundles, css_entry_exists, ReferenceGraph, SourceExtract};
use weft_inventory::walker::{build_inventory, Inventory};

pub use aggregate::{aggregate, ModuleMeta, PageMeta, Report, ScanData};
pub use recommend::Recommendation;

/// Per-file extraction result, merged order-independently after the fan-out.
enum Extracted {
    Page {
        path: String,
        title: Option<String>,
        module_scripts: usize,
        raw: Vec<RawReference>,
    },
    Sheet {
        path: String,
        raw: Vec<RawReference>,
        usages: Vec<String>,
        definitions: Vec<String>,
        patterns: Vec<String>,
    },
    Module {
        path: String,
        kind: ModuleKind,
        import_count: usize,
        export_count: usize,
        raw: Vec<RawReference>,
    },
    Failed {
        path: String,
        error: String,
    },
}

/// Run the full analysis over the site tree at `root`.
///
/// Extraction is embarrassingly parallel — each pass reads only its own
/// file's text and the read-only inventory — so per-file work fans out over
/// rayon. The merge into the graph is a sorted, order-independent fold, so
/// two runs over an unchanged tree produce identical reports (modulo the
/// timestamp).
///
/// # Errors
///
/// Only the fatal class aborts: [`WeftError::RootNotFound`] when `root`
/// cannot be enumerated, or [`WeftError::Pattern`] for an invalid exclude
/// glob. Unreadable individual files degrade to report warnings.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use weft_core::WeftConfig;
/// use weft_report::run_scan;
///
/// let report = run_scan(Path::new("site"), &WeftConfig::default()).unwrap();
/// println!("{report}");
/// ```
pub fn run_scan(root: &Path, config: &WeftConfig) -> Result<Report, WeftError> {
    let inventory = build_inventory(root, config)?;
    let mut warnings = inventory.warnings().to_vec();

    let work = extraction_sources(&inventory);
    let results: Vec<Extracted> = work
        .par_iter()
        .map(|(path, kind)| extract_one(root, path, *kind, config))
        .collect();

    let mut extracts: Vec<SourceExtract> = Vec::new();
    let mut pages: Vec<PageMeta> = Vec::new();
    let mut modules: Vec<ModuleMeta> = Vec::new();
    let mut design = DesignSystemData::default();

    for result in results {
        match result {
            Extracted::Page {
                path,
                title,
                module_scripts,
                raw,
            } => {
                pages.push(PageMeta {
                    path: path.clone(),
                    title,
                    module_scripts,
                });
                extracts.push(SourceExtract { source: path, raw });
            }
            Extracted::Sheet {
                path,
                raw,
                usages,
                definitions,
                patterns,
            } => {
                design.usages.extend(usages.into_iter().map(|token| TokenUsage {
                    token,
                    file: path.clone(),
                }));
                design.definitions.extend(definitions);
                design.patterns.extend(patterns);
                extracts.push(SourceExtract { source: path, raw });
            }
            Extracted::Module {
                path,
                kind,
                import_count,
                export_count,
                raw,
            } => {
                modules.push(ModuleMeta {
                    path: path.clone(),
                    kind,
                    import_count,
                    export_count,
                });
                extracts.push(SourceExtract { source: path, raw });
            }
            Extracted::Failed { path, error } => {
                warnings.push(format!("skipped {path}: {error}"));
            }
        }
    }

    // Token usages arrive in work-list order already, but sort anyway so the
    // merge never depends on who finished first.
    design
        .usages
        .sort_by(|a, b| a.file.cmp(&b.file).then_with(|| a.token.cmp(&b.token)));
    pages.sort_by(|a, b| a.path.cmp(&b.path));
    modules.sort_by(|a, b| a.path.cmp(&b.path));

    if let Some(theme_warning) = collect_theme(root, config, &mut design) {
        warnings.push(theme_warning);
    }

    let graph = ReferenceGraph::build(&inventory, extracts);
    let bundles = check_bundles(&inventory, config);
    let entry_exists = css_entry_exists(&inventory, config);

    let data = ScanData {
        graph,
        bundles,
        css_entry: config.bundles.css_entry.clone(),
        css_entry_exists: entry_exists,
        pages,
        modules,
        design,
        warnings,
        inventory,
    };

    Ok(aggregate(data, &config.report, Utc::now()))
}

/// The files worth extracting from: pages, stylesheets (token definitions
/// included), and scripts. Minified scripts stay in the inventory as assets
/// but are never extraction sources. Bundles are generated artifacts, not
/// sources.
fn extraction_sources(inventory: &Inventory) -> Vec<(String, AssetKind)> {
    let mut work: Vec<(String, AssetKind)> = Vec::new();
    for kind in [
        AssetKind::Html,
        AssetKind::Stylesheet,
        AssetKind::TokenDefinition,
        AssetKind::Script,
    ] {
        for asset in inventory.of_kind(kind) {
            if kind == AssetKind::Script && asset.path.ends_with(".min.js") {
                continue;
            }
            work.push((asset.path.clone(), kind));
        }
    }
    work
}

fn extract_one(root: &Path, path: &str, kind: AssetKind, config: &WeftConfig) -> Extracted {
    let text = match std::fs::read_to_string(root.join(path)) {
        Ok(t) => t,
        Err(e) => {
            return Extracted::Failed {
                path: path.to_string(),
                error: e.to_string(),
            }
        }
    };

    match kind {
        AssetKind::Html => {
            let doc = html::extract_html(&text);
            Extracted::Page {
                path: path.to_string(),
                title: doc.title,
                module_scripts: doc.module_scripts,
                raw: doc.references,
            }
        }
        AssetKind::Stylesheet | AssetKind::TokenDefinition => {
            let definitions = if path == config.design_system.tokens_file {
                tokens::collect_definitions(&text)
            } else {
                Vec::new()
            };
            let patterns = if path == config.design_system.patterns_file {
                tokens::collect_patterns(&text, &config.design_system.pattern_prefix)
            } else {
                Vec::new()
            };
            Extracted::Sheet {
                path: path.to_string(),
                raw: css::extract_css(&text),
                usages: css::token_usages(&text),
                definitions,
                patterns,
            }
        }
        _ => {
            let module = js::extract_js(&text);
            Extracted::Module {
                path: path.to_string(),
                kind: module.kind,
                import_count: module.references.len(),
                export_count: module.exports.len(),
                raw: module.references,
            }
        }
    }
}

/// Read and parse the theme JSON, if the site has one. A parse failure is a
/// degraded finding returned as the warning string; an absent file is
/// nothing at all.
fn collect_theme(root: &Path, config: &WeftConfig, design: &mut DesignSystemData) -> Option<String> {
    let theme_path = root.join(&config.design_system.theme_file);
    if !theme_path.is_file() {
        return None;
    }
    let text = match std::fs::read_to_string(&theme_path) {
        Ok(t) => t,
        Err(e) => {
            return Some(format!(
                "skipped {}: {e}",
                config.design_system.theme_file
            ))
        }
    };
    match tokens::parse_theme(&text) {
        Ok(count) => {
            design.theme_token_count = Some(count);
            None
        }
        Err(message) => Some(format!("{}: {message}", config.design_system.theme_file)),
    }
}
