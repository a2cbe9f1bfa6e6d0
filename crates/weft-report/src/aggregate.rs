//! Report aggregation: one pure fold from the reference graph and collector
//! output into the immutable [`Report`] value. Every number the renderers
//! show is computed here exactly once.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use weft_core::{
    Asset, AssetKind, Issue, ModuleKind, RefKind, Reference, ReportConfig, Severity,
};
use weft_extract::tokens::DesignSystemData;
use weft_graph::{BundleStatus, ReferenceGraph};
use weft_inventory::walker::Inventory;

use crate::recommend::{build_recommendations, Recommendation};

/// Per-page metadata carried from extraction into the report.
#[derive(Debug, Clone)]
pub struct PageMeta {
    /// Canonical page path.
    pub path: String,
    /// `<title>` text, when declared.
    pub title: Option<String>,
    /// Count of `type="module"` script tags.
    pub module_scripts: usize,
}

/// Per-module metadata carried from extraction into the report.
#[derive(Debug, Clone)]
pub struct ModuleMeta {
    /// Canonical script path.
    pub path: String,
    /// Detected module system.
    pub kind: ModuleKind,
    /// Number of import/require declarations.
    pub import_count: usize,
    /// Number of declared exports.
    pub export_count: usize,
}

/// Everything a scan produced, handed to [`aggregate`] in one piece.
pub struct ScanData {
    /// The tree snapshot.
    pub inventory: Inventory,
    /// The assembled reference graph.
    pub graph: ReferenceGraph,
    /// Bundle artifact statuses.
    pub bundles: Vec<BundleStatus>,
    /// Configured stylesheet entry point.
    pub css_entry: String,
    /// Whether the entry point exists in the inventory.
    pub css_entry_exists: bool,
    /// HTML pages analyzed, sorted by path.
    pub pages: Vec<PageMeta>,
    /// Script modules analyzed, sorted by path.
    pub modules: Vec<ModuleMeta>,
    /// Design-token collector output.
    pub design: DesignSystemData,
    /// Degraded-scan warnings accumulated along the way.
    pub warnings: Vec<String>,
}

/// Immutable snapshot produced once at the end of a run.
///
/// Serialized to the structured data document and rendered to the human
/// documents from this one value; nothing is re-derived downstream.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// When the report was produced.
    pub generated_at: DateTime<Utc>,
    /// Scalar summary counts.
    pub summary: Summary,
    /// Full per-area breakdown.
    pub analysis: Analysis,
    /// Findings recurring identically across two or more files, ranked.
    pub common_issues: Vec<Issue>,
    /// Heuristic recommendations derived from the analysis.
    pub recommendations: Vec<Recommendation>,
    /// Degraded-scan warnings (unreadable files, unparseable theme).
    pub warnings: Vec<String>,
}

/// Scalar summary counts, one sub-struct per analysis area.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub css: CssSummary,
    pub html: HtmlSummary,
    pub js: JsSummary,
    pub resources: ResourceSummary,
    pub design_system: DesignSystemSummary,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CssSummary {
    pub total_imports: usize,
    pub missing_files: usize,
    pub bundle_files: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HtmlSummary {
    pub total_pages: usize,
    pub total_css_links: usize,
    pub total_js_references: usize,
    pub missing_references: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsSummary {
    pub total_modules: usize,
    pub total_imports: usize,
    pub missing_files: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSummary {
    pub total_images: usize,
    pub total_fonts: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignSystemSummary {
    pub total_tokens: usize,
    pub total_patterns: usize,
    pub total_themes: usize,
}

/// Full per-area breakdown backing the summary counts.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub css: CssAnalysis,
    pub html: HtmlAnalysis,
    pub js: JsAnalysis,
    pub resources: ResourceAnalysis,
    pub design_system: DesignSystemAnalysis,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CssAnalysis {
    /// Configured stylesheet entry point.
    pub entry: String,
    pub entry_exists: bool,
    pub bundles: Vec<BundleStatus>,
    /// Every `@import` reference, existing and dangling.
    pub imports: Vec<Reference>,
    /// The dangling `@import`s.
    pub missing_files: Vec<Reference>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HtmlAnalysis {
    pub pages: Vec<PageAnalysis>,
    pub missing_references: Vec<MissingReference>,
}

/// Reference counts for one HTML page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageAnalysis {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub css_links: usize,
    pub js_references: usize,
    pub image_references: usize,
    pub font_references: usize,
    pub module_scripts: usize,
}

/// A dangling reference declared in an HTML page, in report shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingReference {
    /// Short group label: `css`, `js`, `image`, or `font`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Page declaring the reference.
    pub file: String,
    /// The declared string as written.
    pub reference: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsAnalysis {
    pub modules: Vec<ModuleAnalysis>,
    /// The dangling import/require references.
    pub missing_files: Vec<Reference>,
}

/// Import/export counts for one script module.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleAnalysis {
    pub path: String,
    pub kind: ModuleKind,
    pub imports: usize,
    pub exports: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceAnalysis {
    pub images: Vec<ImageAnalysis>,
    pub fonts: Vec<Asset>,
}

/// An image asset with its incoming references.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAnalysis {
    pub path: String,
    pub size_bytes: u64,
    /// Pages and stylesheets whose references resolve to this image.
    pub referenced_by: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignSystemAnalysis {
    /// Distinct tokens in use, with occurrence counts, most-used first.
    pub tokens_in_use: Vec<TokenTally>,
    /// Token names defined by the tokens stylesheet.
    pub definitions: Vec<String>,
    /// Utility-pattern class names.
    pub patterns: Vec<String>,
    /// Top-level token count of the theme JSON, when present and parseable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme_token_count: Option<usize>,
}

/// Usage count for one design token.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenTally {
    pub token: String,
    pub uses: usize,
}

/// Reduce a finished scan into the immutable [`Report`].
pub fn aggregate(data: ScanData, config: &ReportConfig, generated_at: DateTime<Utc>) -> Report {
    let ScanData {
        inventory,
        graph,
        bundles,
        css_entry,
        css_entry_exists,
        pages,
        modules,
        design,
        warnings,
    } = data;

    // CSS area.
    let imports: Vec<Reference> = graph
        .references()
        .iter()
        .filter(|r| r.kind == RefKind::CssImport)
        .cloned()
        .collect();
    let css_missing: Vec<Reference> = graph
        .missing_of_kind(RefKind::CssImport)
        .into_iter()
        .cloned()
        .collect();

    // HTML area.
    let page_analyses: Vec<PageAnalysis> = pages
        .iter()
        .map(|page| {
            let refs = graph.refs_from(&page.path);
            let count = |kind: RefKind| refs.iter().filter(|r| r.kind == kind).count();
            PageAnalysis {
                path: page.path.clone(),
                title: page.title.clone(),
                css_links: count(RefKind::StylesheetLink),
                js_references: count(RefKind::ScriptSrc),
                image_references: count(RefKind::ImageSrc),
                font_references: count(RefKind::FontPreload),
                module_scripts: page.module_scripts,
            }
        })
        .collect();

    let html_missing: Vec<MissingReference> = graph
        .missing()
        .iter()
        .filter(|r| r.kind.is_html_declared())
        .map(|r| MissingReference {
            kind: r.kind.short_label().to_string(),
            file: r.source.clone(),
            reference: r.declared.clone(),
        })
        .collect();

    // JS area.
    let js_missing: Vec<Reference> = graph
        .missing()
        .iter()
        .filter(|r| matches!(r.kind, RefKind::JsImport | RefKind::JsRequire))
        .map(|r| (*r).clone())
        .collect();
    let module_analyses: Vec<ModuleAnalysis> = modules
        .iter()
        .map(|m| ModuleAnalysis {
            path: m.path.clone(),
            kind: m.kind,
            imports: m.import_count,
            exports: m.export_count,
        })
        .collect();
    let total_js_imports: usize = modules.iter().map(|m| m.import_count).sum();

    // Resources.
    let images: Vec<ImageAnalysis> = inventory
        .of_kind(AssetKind::Image)
        .into_iter()
        .map(|a| ImageAnalysis {
            path: a.path.clone(),
            size_bytes: a.size_bytes,
            referenced_by: graph
                .referenced_by(&a.path)
                .into_iter()
                .map(String::from)
                .collect(),
        })
        .collect();
    let fonts: Vec<Asset> = inventory
        .of_kind(AssetKind::Font)
        .into_iter()
        .cloned()
        .collect();

    // Design system.
    let mut tally: BTreeMap<&str, usize> = BTreeMap::new();
    for usage in &design.usages {
        *tally.entry(usage.token.as_str()).or_default() += 1;
    }
    let mut tokens_in_use: Vec<TokenTally> = tally
        .into_iter()
        .map(|(token, uses)| TokenTally {
            token: token.to_string(),
            uses,
        })
        .collect();
    tokens_in_use.sort_by(|a, b| b.uses.cmp(&a.uses).then_with(|| a.token.cmp(&b.token)));

    let analysis = Analysis {
        css: CssAnalysis {
            entry: css_entry,
            entry_exists: css_entry_exists,
            bundles,
            imports,
            missing_files: css_missing,
        },
        html: HtmlAnalysis {
            pages: page_analyses,
            missing_references: html_missing,
        },
        js: JsAnalysis {
            modules: module_analyses,
            missing_files: js_missing,
        },
        resources: ResourceAnalysis { images, fonts },
        design_system: DesignSystemAnalysis {
            tokens_in_use,
            definitions: design.definitions.clone(),
            patterns: design.patterns.clone(),
            theme_token_count: design.theme_token_count,
        },
    };

    let summary = Summary {
        css: CssSummary {
            total_imports: analysis.css.imports.len(),
            missing_files: analysis.css.missing_files.len(),
            bundle_files: analysis.css.bundles.len(),
        },
        html: HtmlSummary {
            total_pages: analysis.html.pages.len(),
            total_css_links: analysis.html.pages.iter().map(|p| p.css_links).sum(),
            total_js_references: analysis.html.pages.iter().map(|p| p.js_references).sum(),
            missing_references: analysis.html.missing_references.len(),
        },
        js: JsSummary {
            total_modules: analysis.js.modules.len(),
            total_imports: total_js_imports,
            missing_files: analysis.js.missing_files.len(),
        },
        resources: ResourceSummary {
            total_images: analysis.resources.images.len(),
            total_fonts: analysis.resources.fonts.len(),
        },
        design_system: DesignSystemSummary {
            total_tokens: design.usages.len() + design.definitions.len(),
            total_patterns: analysis.design_system.patterns.len(),
            total_themes: usize::from(analysis.design_system.theme_token_count.is_some()),
        },
    };

    let common_issues = common_issues(&graph, &design, config.max_common_issues);
    let recommendations =
        build_recommendations(&analysis, config.image_size_threshold_kb);

    Report {
        generated_at,
        summary,
        analysis,
        common_issues,
        recommendations,
        warnings,
    }
}

/// Build the ranked common-issues list: every distinct `(category, message)`
/// finding appearing in two or more distinct source files, sorted by
/// descending occurrence count then message, capped to `max`.
fn common_issues(graph: &ReferenceGraph, design: &DesignSystemData, max: usize) -> Vec<Issue> {
    let mut grouped: BTreeMap<(String, String), (Severity, Vec<String>)> = BTreeMap::new();

    for r in graph.missing() {
        let target = r.resolved.as_deref().unwrap_or(&r.declared);
        let category = format!("missing-{}", r.kind.short_label());
        let message = format!("{target} is referenced but does not exist");
        grouped
            .entry((category, message))
            .or_insert_with(|| (Severity::Error, Vec::new()))
            .1
            .push(r.source.clone());
    }

    // Tokens used somewhere but defined nowhere. Only meaningful when the
    // site actually has a token definition file.
    if !design.definitions.is_empty() {
        for usage in &design.usages {
            if !design.definitions.contains(&usage.token) {
                let category = "undefined-token".to_string();
                let message = format!("{} is used but never defined", usage.token);
                grouped
                    .entry((category, message))
                    .or_insert_with(|| (Severity::Warning, Vec::new()))
                    .1
                    .push(usage.file.clone());
            }
        }
    }

    let mut issues: Vec<Issue> = grouped
        .into_iter()
        .filter_map(|((category, message), (severity, mut occurrences))| {
            occurrences.sort_unstable();
            occurrences.dedup();
            (occurrences.len() >= 2).then_some(Issue {
                category,
                message,
                severity,
                occurrences,
            })
        })
        .collect();

    issues.sort_by(|a, b| {
        b.occurrences
            .len()
            .cmp(&a.occurrences.len())
            .then_with(|| a.message.cmp(&b.message))
    });
    issues.truncate(max);
    issues
}
