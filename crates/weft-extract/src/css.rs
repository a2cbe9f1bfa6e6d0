//! Reference extraction from stylesheets.
//!
//! Two independent passes: `@import` declarations become raw references, and
//! `var(--token)` occurrences feed the design-token tally. Both run uniformly
//! over every stylesheet in the inventory — imported partials included — not
//! only entry bundles.

use std::sync::LazyLock;

use regex::Regex;
use weft_core::RefKind;

use crate::RawReference;

/// Extract `@import` declarations from stylesheet text.
///
/// # Examples
///
/// ```
/// use weft_extract::css::extract_css;
///
/// let refs = extract_css(r#"@import "core/reset.css"; @import 'core/type.css';"#);
/// assert_eq!(refs.len(), 2);
/// assert_eq!(refs[0].declared, "core/reset.css");
/// ```
pub fn extract_css(text: &str) -> Vec<RawReference> {
    static IMPORT: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r#"@import\s+["']([^"']+)["']"#).unwrap());

    IMPORT
        .captures_iter(text)
        .map(|c| RawReference::new(RefKind::CssImport, &c[1]))
        .collect()
}

/// Collect every custom-property usage (`var(--name)`) in stylesheet text.
///
/// Returns token names including the `--` prefix, one entry per occurrence.
///
/// # Examples
///
/// ```
/// use weft_extract::css::token_usages;
///
/// let used = token_usages(".btn { color: var(--color-primary); margin: var( --space-2 ); }");
/// assert_eq!(used, vec!["--color-primary", "--space-2"]);
/// ```
pub fn token_usages(text: &str) -> Vec<String> {
    static VAR_USE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"var\(\s*(--[\w-]+)").unwrap());

    VAR_USE
        .captures_iter(text)
        .map(|c| c[1].to_string())
        .collect()
}
