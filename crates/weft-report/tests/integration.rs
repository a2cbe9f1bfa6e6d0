//! Integration tests: build a site in a tempdir, run the full scan, and
//! check the report end to end.

use std::fs;
use std::path::Path;

use weft_core::{WeftConfig, WeftError};
use weft_report::run_scan;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn clean_site() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(
        root,
        "index.html",
        r#"<!DOCTYPE html>
<html><head>
<title>Home</title>
<link rel="stylesheet" href="css/main.css">
</head><body>
<script type="module" src="js/app.js"></script>
</body></html>"#,
    );
    write(root, "css/main.css", "body { margin: 0; }");
    write(root, "js/app.js", "import { x } from \"./util.js\";\nx();");
    write(root, "js/util.js", "export const x = () => {};");
    dir
}

#[test]
fn clean_site_has_no_missing_references() {
    let dir = clean_site();
    let report = run_scan(dir.path(), &WeftConfig::default()).unwrap();

    assert_eq!(report.summary.html.total_pages, 1);
    assert_eq!(report.summary.js.total_modules, 2);
    assert_eq!(report.summary.js.total_imports, 1);
    assert_eq!(report.summary.html.missing_references, 0);
    assert!(report.analysis.css.missing_files.is_empty());
    assert!(report.analysis.js.missing_files.is_empty());
    assert!(report.analysis.html.missing_references.is_empty());
}

#[test]
fn dangling_stylesheet_is_reported_with_type_file_and_reference() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(
        root,
        "index.html",
        r#"<link rel="stylesheet" href="css/missing.css">"#,
    );

    let report = run_scan(root, &WeftConfig::default()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

    let missing = json["analysis"]["html"]["missingReferences"]
        .as_array()
        .unwrap();
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0]["type"], "css");
    assert_eq!(missing[0]["file"], "index.html");
    assert_eq!(missing[0]["reference"], "css/missing.css");
}

#[test]
fn nested_broken_import_blames_the_stylesheet_not_the_page() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(
        root,
        "index.html",
        r#"<link rel="stylesheet" href="css/main.css">"#,
    );
    write(root, "css/main.css", "@import \"partials/ghost.css\";");

    let report = run_scan(root, &WeftConfig::default()).unwrap();

    // The page's own link is fine.
    assert!(report.analysis.html.missing_references.is_empty());

    // The stylesheet's import is the dangling edge.
    assert_eq!(report.analysis.css.missing_files.len(), 1);
    let missing = &report.analysis.css.missing_files[0];
    assert_eq!(missing.source, "css/main.css");
    assert_eq!(missing.resolved.as_deref(), Some("css/partials/ghost.css"));
    assert!(!missing.exists);
}

#[test]
fn absent_bundles_yield_exactly_one_critical_recommendation() {
    let dir = clean_site();
    let report = run_scan(dir.path(), &WeftConfig::default()).unwrap();

    let bundling: Vec<_> = report
        .recommendations
        .iter()
        .filter(|r| r.category == "css-bundling")
        .collect();
    assert_eq!(bundling.len(), 1);
    assert_eq!(bundling[0].severity, weft_core::Severity::Critical);
}

#[test]
fn existing_bundle_silences_the_critical_recommendation() {
    let dir = clean_site();
    write(dir.path(), "dist/styles.css", "/* built */ body{margin:0}");

    let report = run_scan(dir.path(), &WeftConfig::default()).unwrap();
    assert!(report
        .recommendations
        .iter()
        .all(|r| r.category != "css-bundling"));

    let bundle = &report.analysis.css.bundles[0];
    assert!(bundle.exists);
    assert!(bundle.size_bytes > 0);
}

#[test]
fn scan_is_deterministic_modulo_timestamp() {
    let dir = clean_site();
    let config = WeftConfig::default();

    let strip_timestamp = |report: weft_report::Report| {
        let mut value: serde_json::Value =
            serde_json::from_str(&report.to_json().unwrap()).unwrap();
        value.as_object_mut().unwrap().remove("generatedAt");
        value
    };

    let first = strip_timestamp(run_scan(dir.path(), &config).unwrap());
    let second = strip_timestamp(run_scan(dir.path(), &config).unwrap());
    assert_eq!(first, second);
}

#[test]
fn removing_a_referenced_file_flips_exists_to_false() {
    let dir = clean_site();
    let config = WeftConfig::default();

    let before = run_scan(dir.path(), &config).unwrap();
    assert!(before.analysis.js.missing_files.is_empty());

    fs::remove_file(dir.path().join("js/util.js")).unwrap();

    let after = run_scan(dir.path(), &config).unwrap();
    assert_eq!(after.analysis.js.missing_files.len(), 1);
    assert_eq!(
        after.analysis.js.missing_files[0].resolved.as_deref(),
        Some("js/util.js")
    );
}

#[test]
fn identical_finding_across_k_files_is_one_issue_with_k_occurrences() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    for page in ["a.html", "b.html", "c.html", "d.html"] {
        write(
            root,
            page,
            r#"<link rel="stylesheet" href="css/shared-missing.css">"#,
        );
    }

    let report = run_scan(root, &WeftConfig::default()).unwrap();
    let matching: Vec<_> = report
        .common_issues
        .iter()
        .filter(|i| i.message.contains("css/shared-missing.css"))
        .collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0].occurrences.len(), 4);
}

#[test]
fn missing_root_is_fatal_and_produces_no_report() {
    let err = run_scan(Path::new("/no/such/site"), &WeftConfig::default()).unwrap_err();
    assert!(matches!(err, WeftError::RootNotFound(_)));
}

#[test]
fn unreadable_file_degrades_to_a_warning() {
    let dir = clean_site();
    // Invalid UTF-8 in a stylesheet: inventoried fine, unreadable as text.
    fs::write(dir.path().join("css/broken.css"), [0xff, 0xfe, 0x00, 0x80]).unwrap();

    let report = run_scan(dir.path(), &WeftConfig::default()).unwrap();
    assert!(report
        .warnings
        .iter()
        .any(|w| w.contains("css/broken.css")));
    // The run still completes and renders.
    assert_eq!(report.summary.html.total_pages, 1);
    assert!(report.to_html().contains("Reference Map Report"));
}

#[test]
fn design_system_files_are_collected() {
    let dir = clean_site();
    let root = dir.path();
    write(
        root,
        "css/design-system/tokens.css",
        ":root { --color-primary: #5e6ad2; --space-2: 8px; }",
    );
    write(
        root,
        "css/design-system/highlighter-patterns.css",
        ".highlight-yellow { } .highlight-pink { }",
    );
    write(
        root,
        "design-system/linear-theme.json",
        r#"{"colors": {}, "spacing": {}, "typography": {}}"#,
    );
    // A stylesheet actually using a token.
    write(root, "css/buttons.css", ".btn { color: var(--color-primary); }");

    let report = run_scan(root, &WeftConfig::default()).unwrap();
    let ds = &report.analysis.design_system;
    assert_eq!(ds.definitions, vec!["--color-primary", "--space-2"]);
    assert_eq!(ds.patterns.len(), 2);
    assert_eq!(ds.theme_token_count, Some(3));
    assert_eq!(ds.tokens_in_use[0].token, "--color-primary");
    // usages (1) + definitions (2)
    assert_eq!(report.summary.design_system.total_tokens, 3);
}

#[test]
fn malformed_theme_is_a_warning_not_an_error() {
    let dir = clean_site();
    write(dir.path(), "design-system/linear-theme.json", "{ not json");

    let report = run_scan(dir.path(), &WeftConfig::default()).unwrap();
    assert!(report
        .warnings
        .iter()
        .any(|w| w.contains("linear-theme.json")));
    assert!(report.analysis.design_system.theme_token_count.is_none());
}

#[test]
fn minified_scripts_are_assets_but_not_extraction_sources() {
    let dir = clean_site();
    write(
        dir.path(),
        "js/vendor.min.js",
        "import x from\"./nowhere.js\";",
    );

    let report = run_scan(dir.path(), &WeftConfig::default()).unwrap();
    // Not analyzed as a module, and its broken import is not reported.
    assert_eq!(report.summary.js.total_modules, 2);
    assert!(report.analysis.js.missing_files.is_empty());
}

#[test]
fn external_references_never_count_as_missing() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(
        root,
        "index.html",
        r#"<link rel="stylesheet" href="https://fonts.googleapis.com/css2?family=Inter">
<script src="//cdn.example.com/lib.js"></script>
<img src="data:image/gif;base64,R0lGOD">"#,
    );

    let report = run_scan(root, &WeftConfig::default()).unwrap();
    assert_eq!(report.summary.html.missing_references, 0);
    assert_eq!(report.analysis.html.pages[0].css_links, 1);
    assert_eq!(report.analysis.html.pages[0].js_references, 1);
    assert_eq!(report.analysis.html.pages[0].image_references, 1);
}
