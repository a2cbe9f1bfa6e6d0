//! Reference extraction from HTML pages.
//!
//! Pattern-matches the four declaration forms that pull other files into a
//! page: stylesheet links, script tags, image tags, and font preloads.
//! Inline `<style>` and `<script>` bodies carry no cross-file declarations
//! and are ignored.

use std::sync::LazyLock;

use regex::Regex;
use weft_core::RefKind;

use crate::RawReference;

/// Everything extracted from one HTML page.
///
/// # Examples
///
/// ```
/// use weft_extract::html::extract_html;
///
/// let doc = extract_html(r#"<title>Home</title>
///     <link rel="stylesheet" href="css/main.css">
///     <script type="module" src="js/app.js"></script>"#);
/// assert_eq!(doc.title.as_deref(), Some("Home"));
/// assert_eq!(doc.references.len(), 2);
/// assert_eq!(doc.module_scripts, 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct HtmlDocument {
    /// The `<title>` text, if the page declares one.
    pub title: Option<String>,
    /// Raw references, grouped by declaration form (links, scripts, images).
    pub references: Vec<RawReference>,
    /// How many `<script>` tags carry `type="module"`.
    pub module_scripts: usize,
}

/// Extract all declared references (and the page title) from HTML text.
pub fn extract_html(text: &str) -> HtmlDocument {
    static LINK_TAG: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r#"(?i)<link[^>]*>"#).unwrap());
    static SCRIPT_TAG: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r#"(?i)<script[^>]*\bsrc\s*=\s*["'][^"']+["'][^>]*>"#).unwrap());
    static IMG_TAG: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r#"(?i)<img[^>]*\bsrc\s*=\s*["'][^"']+["'][^>]*>"#).unwrap());

    let mut doc = HtmlDocument {
        title: extract_title(text),
        ..HtmlDocument::default()
    };

    for tag in LINK_TAG.find_iter(text) {
        let tag = tag.as_str();
        let Some(href) = attr(tag, "href") else {
            continue;
        };
        if has_attr_value(tag, "rel", "stylesheet") {
            doc.references
                .push(RawReference::new(RefKind::StylesheetLink, href));
        } else if has_attr_value(tag, "rel", "preload") && has_attr_value(tag, "as", "font") {
            doc.references
                .push(RawReference::new(RefKind::FontPreload, href));
        }
    }

    for tag in SCRIPT_TAG.find_iter(text) {
        let tag = tag.as_str();
        let Some(src) = attr(tag, "src") else {
            continue;
        };
        if has_attr_value(tag, "type", "module") {
            doc.module_scripts += 1;
        }
        doc.references.push(RawReference::new(RefKind::ScriptSrc, src));
    }

    for tag in IMG_TAG.find_iter(text) {
        let Some(src) = attr(tag.as_str(), "src") else {
            continue;
        };
        doc.references.push(RawReference::new(RefKind::ImageSrc, src));
    }

    doc
}

/// The text of the page's `<title>` element, if present.
pub fn extract_title(text: &str) -> Option<String> {
    static TITLE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>([^<]+)</title>").unwrap());
    TITLE
        .captures(text)
        .map(|c| c[1].trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Pull a single attribute value out of a tag's text.
fn attr(tag: &str, name: &str) -> Option<String> {
    // Attribute grammar is narrow enough for a dynamic pattern per name.
    let re = Regex::new(&format!(
        r#"(?i)\b{}\s*=\s*["']([^"']+)["']"#,
        regex::escape(name)
    ))
    .ok()?;
    re.captures(tag).map(|c| c[1].to_string())
}

fn has_attr_value(tag: &str, name: &str, value: &str) -> bool {
    attr(tag, name).is_some_and(|v| v.eq_ignore_ascii_case(value))
}
