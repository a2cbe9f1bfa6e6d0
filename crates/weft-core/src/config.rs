use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::WeftError;

/// Top-level configuration loaded from `.weft.toml`.
///
/// Every section has defaults matching a conventional static-site layout, so
/// a bare `weft scan` works without any configuration file.
///
/// # Examples
///
/// ```
/// use weft_core::WeftConfig;
///
/// let config = WeftConfig::default();
/// assert_eq!(config.bundles.paths.len(), 2);
/// assert_eq!(config.report.max_common_issues, 10);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeftConfig {
    /// Tree-walking behavior.
    #[serde(default)]
    pub scan: ScanConfig,
    /// Stylesheet entry point and expected bundle outputs.
    #[serde(default)]
    pub bundles: BundleConfig,
    /// Design-system token, theme, and pattern file locations.
    #[serde(default)]
    pub design_system: DesignSystemConfig,
    /// Report shaping knobs.
    #[serde(default)]
    pub report: ReportConfig,
}

impl WeftConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`WeftError::Io`] if the file cannot be read, or
    /// [`WeftError::Toml`] if the content is not valid TOML.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use weft_core::WeftConfig;
    /// use std::path::Path;
    ///
    /// let config = WeftConfig::from_file(Path::new(".weft.toml")).unwrap();
    /// ```
    pub fn from_file(path: &Path) -> Result<Self, WeftError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`WeftError::Toml`] if parsing fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use weft_core::WeftConfig;
    ///
    /// let toml = r#"
    /// [report]
    /// max_common_issues = 5
    /// "#;
    /// let config = WeftConfig::from_toml(toml).unwrap();
    /// assert_eq!(config.report.max_common_issues, 5);
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, WeftError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }
}

/// Tree-walking configuration.
///
/// # Examples
///
/// ```
/// use weft_core::ScanConfig;
///
/// let config = ScanConfig::default();
/// assert!(config.exclude.iter().any(|p| p.contains("node_modules")));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Glob patterns for directories and files to skip, in addition to
    /// hidden directories and VCS metadata (always skipped).
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,
}

fn default_exclude() -> Vec<String> {
    vec!["node_modules/**".into(), "vendor/**".into()]
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            exclude: default_exclude(),
        }
    }
}

/// Stylesheet entry point and bundle output expectations.
///
/// # Examples
///
/// ```
/// use weft_core::BundleConfig;
///
/// let config = BundleConfig::default();
/// assert_eq!(config.css_entry, "css/main.css");
/// assert_eq!(config.paths[0], "dist/styles.css");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleConfig {
    /// The primary stylesheet entry point the build concatenates from.
    #[serde(default = "default_css_entry")]
    pub css_entry: String,
    /// Expected bundle artifacts; a site with none of these is flagged.
    #[serde(default = "default_bundle_paths")]
    pub paths: Vec<String>,
}

fn default_css_entry() -> String {
    "css/main.css".into()
}

fn default_bundle_paths() -> Vec<String> {
    vec!["dist/styles.css".into(), "dist/styles.min.css".into()]
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            css_entry: default_css_entry(),
            paths: default_bundle_paths(),
        }
    }
}

/// Locations of design-system definition files.
///
/// # Examples
///
/// ```
/// use weft_core::DesignSystemConfig;
///
/// let config = DesignSystemConfig::default();
/// assert_eq!(config.pattern_prefix, "highlight-");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesignSystemConfig {
    /// Stylesheet defining the custom-property tokens.
    #[serde(default = "default_tokens_file")]
    pub tokens_file: String,
    /// JSON theme definition; a parse failure is a degraded warning.
    #[serde(default = "default_theme_file")]
    pub theme_file: String,
    /// Stylesheet carrying utility pattern classes.
    #[serde(default = "default_patterns_file")]
    pub patterns_file: String,
    /// Class-name prefix identifying a pattern selector.
    #[serde(default = "default_pattern_prefix")]
    pub pattern_prefix: String,
}

fn default_tokens_file() -> String {
    "css/design-system/tokens.css".into()
}

fn default_theme_file() -> String {
    "design-system/linear-theme.json".into()
}

fn default_patterns_file() -> String {
    "css/design-system/highlighter-patterns.css".into()
}

fn default_pattern_prefix() -> String {
    "highlight-".into()
}

impl Default for DesignSystemConfig {
    fn default() -> Self {
        Self {
            tokens_file: default_tokens_file(),
            theme_file: default_theme_file(),
            patterns_file: default_patterns_file(),
            pattern_prefix: default_pattern_prefix(),
        }
    }
}

/// Report shaping configuration.
///
/// # Examples
///
/// ```
/// use weft_core::ReportConfig;
///
/// let config = ReportConfig::default();
/// assert_eq!(config.image_size_threshold_kb, 500);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Cap on the ranked common-issues list (default: 10).
    #[serde(default = "default_max_common_issues")]
    pub max_common_issues: usize,
    /// Images larger than this (KiB) get an optimization recommendation
    /// (default: 500).
    #[serde(default = "default_image_size_threshold_kb")]
    pub image_size_threshold_kb: u64,
}

fn default_max_common_issues() -> usize {
    10
}

fn default_image_size_threshold_kb() -> u64 {
    500
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            max_common_issues: default_max_common_issues(),
            image_size_threshold_kb: default_image_size_threshold_kb(),
        }
    }
}
