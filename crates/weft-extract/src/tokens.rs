//! Design-token collection.
//!
//! Auxiliary extractor feeding the aggregation stage: custom-property usages
//! harvested per stylesheet, token definitions from the configured tokens
//! file, the theme JSON's token count, and utility-pattern class names. Not
//! part of the reference graph.

use std::sync::LazyLock;

use regex::Regex;

/// One `var(--token)` occurrence, keyed by token name and originating file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenUsage {
    /// Token name including the `--` prefix.
    pub token: String,
    /// Canonical path of the stylesheet using it.
    pub file: String,
}

/// Everything the design-token collector gathered in one run.
///
/// # Examples
///
/// ```
/// use weft_extract::tokens::DesignSystemData;
///
/// let data = DesignSystemData::default();
/// assert_eq!(data.usages.len(), 0);
/// assert!(data.theme_token_count.is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct DesignSystemData {
    /// Custom-property usages across all stylesheets.
    pub usages: Vec<TokenUsage>,
    /// Token names defined in the configured tokens stylesheet.
    pub definitions: Vec<String>,
    /// Top-level token count from the theme JSON, when it parsed.
    pub theme_token_count: Option<usize>,
    /// Utility-pattern class names from the configured patterns stylesheet.
    pub patterns: Vec<String>,
}

/// Collect token *definitions* (`--name: value`) from tokens-file text.
///
/// # Examples
///
/// ```
/// use weft_extract::tokens::collect_definitions;
///
/// let defs = collect_definitions(":root { --color-primary: #5e6ad2; --space-2: 8px; }");
/// assert_eq!(defs, vec!["--color-primary", "--space-2"]);
/// ```
pub fn collect_definitions(text: &str) -> Vec<String> {
    static DEFINITION: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(--[\w-]+)\s*:[^;]+").unwrap());

    DEFINITION
        .captures_iter(text)
        .map(|c| c[1].to_string())
        .collect()
}

/// Count the top-level tokens in a theme JSON document.
///
/// A parse failure is a degraded finding, surfaced as the error string so
/// the caller can record it as a run warning.
///
/// # Examples
///
/// ```
/// use weft_extract::tokens::parse_theme;
///
/// assert_eq!(parse_theme(r#"{"color": {}, "spacing": {}}"#), Ok(2));
/// assert!(parse_theme("not json").is_err());
/// ```
pub fn parse_theme(text: &str) -> Result<usize, String> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| format!("theme file is not valid JSON: {e}"))?;
    match value.as_object() {
        Some(map) => Ok(map.len()),
        None => Err("theme file is valid JSON but not an object".into()),
    }
}

/// Collect utility-pattern class names (`.{prefix}…`) from a stylesheet.
///
/// The prefix comes from configuration, so the pattern is compiled per call.
///
/// # Examples
///
/// ```
/// use weft_extract::tokens::collect_patterns;
///
/// let found = collect_patterns(".highlight-yellow { } .highlight-underline { }", "highlight-");
/// assert_eq!(found, vec![".highlight-yellow", ".highlight-underline"]);
/// ```
pub fn collect_patterns(text: &str, prefix: &str) -> Vec<String> {
    let Ok(re) = Regex::new(&format!(r"\.({}[\w-]+)", regex::escape(prefix))) else {
        return Vec::new();
    };
    re.captures_iter(text)
        .map(|c| format!(".{}", &c[1]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn definitions_capture_name_only() {
        let css = r#"
:root {
  --color-primary: #5e6ad2;
  --font-sans: "Inter", sans-serif;
}
"#;
        assert_eq!(
            collect_definitions(css),
            vec!["--color-primary", "--font-sans"]
        );
    }

    #[test]
    fn definitions_ignore_plain_properties() {
        assert!(collect_definitions("body { color: red; margin: 0; }").is_empty());
    }

    #[test]
    fn theme_counts_top_level_keys() {
        let theme = r##"{"colors": {"bg": "#fff"}, "radius": "4px", "shadows": []}"##;
        assert_eq!(parse_theme(theme), Ok(3));
    }

    #[test]
    fn theme_parse_failure_is_a_message_not_a_panic() {
        let err = parse_theme("{ broken").unwrap_err();
        assert!(err.contains("not valid JSON"));

        let err = parse_theme("[1, 2, 3]").unwrap_err();
        assert!(err.contains("not an object"));
    }

    #[test]
    fn patterns_match_configured_prefix_only() {
        let css = ".highlight-pink { } .badge-red { } .highlight-wavy:hover { }";
        assert_eq!(
            collect_patterns(css, "highlight-"),
            vec![".highlight-pink", ".highlight-wavy"]
        );
        assert_eq!(collect_patterns(css, "badge-"), vec![".badge-red"]);
    }

    #[test]
    fn pattern_prefix_is_escaped() {
        // A prefix with regex metacharacters must not blow up the matcher.
        assert!(collect_patterns(".a { }", "h(").is_empty());
    }
}
