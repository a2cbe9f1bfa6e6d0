//! Recommendation heuristics.
//!
//! Fixed rules evaluated against already-computed analysis fields only —
//! never a rescan. Each rule either fires with a severity, a category, and
//! an optional file list, or stays silent.

use serde::Serialize;

use weft_core::Severity;

use crate::aggregate::Analysis;

/// One actionable recommendation.
///
/// # Examples
///
/// ```
/// use weft_core::Severity;
/// use weft_report::recommend::Recommendation;
///
/// let rec = Recommendation {
///     severity: Severity::Critical,
///     category: "css-bundling".into(),
///     title: "No bundle artifact exists".into(),
///     description: "Run the stylesheet build to generate the bundles.".into(),
///     action: Some("npm run build:css".into()),
///     files: Vec::new(),
/// };
/// assert_eq!(rec.severity, Severity::Critical);
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// How urgent it is.
    pub severity: Severity,
    /// Stable category slug for downstream gating.
    pub category: String,
    /// One-line headline.
    pub title: String,
    /// What to do about it.
    pub description: String,
    /// A command hint, when one applies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// Affected files, when the rule has a concrete list.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,
}

/// Evaluate every heuristic against the analysis.
///
/// Rules fire in a fixed order, so the output is deterministic for a given
/// analysis value.
pub fn build_recommendations(analysis: &Analysis, image_threshold_kb: u64) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    if analysis.css.bundles.iter().all(|b| !b.exists) {
        recommendations.push(Recommendation {
            severity: Severity::Critical,
            category: "css-bundling".into(),
            title: "No bundle artifact exists".into(),
            description: format!(
                "None of the {} expected bundle outputs were found. \
                 Run the stylesheet build to generate them.",
                analysis.css.bundles.len()
            ),
            action: Some("npm run build:css".into()),
            files: Vec::new(),
        });
    }

    if !analysis.css.missing_files.is_empty() {
        recommendations.push(Recommendation {
            severity: Severity::Error,
            category: "missing-css".into(),
            title: format!(
                "{} imported stylesheet(s) are missing",
                analysis.css.missing_files.len()
            ),
            description: "Create the missing files or fix the @import paths.".into(),
            action: None,
            files: analysis
                .css
                .missing_files
                .iter()
                .filter_map(|r| r.resolved.clone())
                .collect(),
        });
    }

    if !analysis.js.missing_files.is_empty() {
        recommendations.push(Recommendation {
            severity: Severity::Error,
            category: "missing-js".into(),
            title: format!(
                "{} imported script(s) are missing",
                analysis.js.missing_files.len()
            ),
            description: "Create the missing modules or fix the import paths.".into(),
            action: None,
            files: analysis
                .js
                .missing_files
                .iter()
                .filter_map(|r| r.resolved.clone())
                .collect(),
        });
    }

    if !analysis.html.missing_references.is_empty() {
        recommendations.push(Recommendation {
            severity: Severity::Warning,
            category: "missing-resources".into(),
            title: format!(
                "{} page reference(s) point at nothing",
                analysis.html.missing_references.len()
            ),
            description: "Pages reference files that do not exist in the tree.".into(),
            action: None,
            files: analysis
                .html
                .missing_references
                .iter()
                .map(|m| format!("{}: {}", m.file, m.reference))
                .collect(),
        });
    }

    let threshold_bytes = image_threshold_kb * 1024;
    let oversized: Vec<String> = analysis
        .resources
        .images
        .iter()
        .filter(|img| img.size_bytes > threshold_bytes)
        .map(|img| format!("{} ({} KiB)", img.path, img.size_bytes / 1024))
        .collect();
    if !oversized.is_empty() {
        recommendations.push(Recommendation {
            severity: Severity::Optimization,
            category: "image-optimization".into(),
            title: format!("{} image(s) exceed {image_threshold_kb} KiB", oversized.len()),
            description: "Compress or convert these images to improve load performance.".into(),
            action: None,
            files: oversized,
        });
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{
        CssAnalysis, DesignSystemAnalysis, HtmlAnalysis, ImageAnalysis, JsAnalysis,
        MissingReference, ResourceAnalysis,
    };
    use weft_core::{Classification, RefKind, Reference};
    use weft_graph::BundleStatus;

    fn empty_analysis() -> Analysis {
        Analysis {
            css: CssAnalysis {
                entry: "css/main.css".into(),
                entry_exists: true,
                bundles: vec![BundleStatus {
                    path: "dist/styles.css".into(),
                    exists: true,
                    size_bytes: 100,
                }],
                imports: Vec::new(),
                missing_files: Vec::new(),
            },
            html: HtmlAnalysis {
                pages: Vec::new(),
                missing_references: Vec::new(),
            },
            js: JsAnalysis {
                modules: Vec::new(),
                missing_files: Vec::new(),
            },
            resources: ResourceAnalysis {
                images: Vec::new(),
                fonts: Vec::new(),
            },
            design_system: DesignSystemAnalysis {
                tokens_in_use: Vec::new(),
                definitions: Vec::new(),
                patterns: Vec::new(),
                theme_token_count: None,
            },
        }
    }

    fn dangling(source: &str, kind: RefKind, target: &str) -> Reference {
        Reference {
            source: source.into(),
            declared: target.into(),
            kind,
            classification: Classification::Relative,
            resolved: Some(target.into()),
            exists: false,
        }
    }

    #[test]
    fn clean_analysis_yields_no_recommendations() {
        assert!(build_recommendations(&empty_analysis(), 500).is_empty());
    }

    #[test]
    fn zero_existing_bundles_is_critical_regardless_of_pages() {
        let mut analysis = empty_analysis();
        analysis.css.bundles = vec![
            BundleStatus {
                path: "dist/styles.css".into(),
                exists: false,
                size_bytes: 0,
            },
            BundleStatus {
                path: "dist/styles.min.css".into(),
                exists: false,
                size_bytes: 0,
            },
        ];

        let recs = build_recommendations(&analysis, 500);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].severity, Severity::Critical);
        assert_eq!(recs[0].category, "css-bundling");
    }

    #[test]
    fn one_existing_bundle_silences_the_bundling_rule() {
        let mut analysis = empty_analysis();
        analysis.css.bundles.push(BundleStatus {
            path: "dist/styles.min.css".into(),
            exists: false,
            size_bytes: 0,
        });
        assert!(build_recommendations(&analysis, 500).is_empty());
    }

    #[test]
    fn missing_css_carries_the_resolved_file_list() {
        let mut analysis = empty_analysis();
        analysis.css.missing_files = vec![dangling(
            "css/main.css",
            RefKind::CssImport,
            "css/partials/ghost.css",
        )];

        let recs = build_recommendations(&analysis, 500);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].category, "missing-css");
        assert_eq!(recs[0].severity, Severity::Error);
        assert_eq!(recs[0].files, vec!["css/partials/ghost.css"]);
    }

    #[test]
    fn missing_page_references_are_warnings() {
        let mut analysis = empty_analysis();
        analysis.html.missing_references = vec![MissingReference {
            kind: "image".into(),
            file: "index.html".into(),
            reference: "images/gone.png".into(),
        }];

        let recs = build_recommendations(&analysis, 500);
        assert_eq!(recs[0].severity, Severity::Warning);
        assert_eq!(recs[0].category, "missing-resources");
        assert_eq!(recs[0].files, vec!["index.html: images/gone.png"]);
    }

    #[test]
    fn oversized_images_trigger_optimization() {
        let mut analysis = empty_analysis();
        analysis.resources.images = vec![
            ImageAnalysis {
                path: "images/hero.png".into(),
                size_bytes: 800 * 1024,
                referenced_by: Vec::new(),
            },
            ImageAnalysis {
                path: "images/icon.svg".into(),
                size_bytes: 2 * 1024,
                referenced_by: Vec::new(),
            },
        ];

        let recs = build_recommendations(&analysis, 500);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].severity, Severity::Optimization);
        assert_eq!(recs[0].files.len(), 1);
        assert!(recs[0].files[0].contains("images/hero.png"));
    }

    #[test]
    fn threshold_is_configurable() {
        let mut analysis = empty_analysis();
        analysis.resources.images = vec![ImageAnalysis {
            path: "images/photo.jpg".into(),
            size_bytes: 300 * 1024,
            referenced_by: Vec::new(),
        }];

        assert!(build_recommendations(&analysis, 500).is_empty());
        assert_eq!(build_recommendations(&analysis, 100).len(), 1);
    }
}
