use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A file known to exist in the scanned tree.
///
/// The path is canonical: tree-relative, forward-slash-normalized, with no
/// `.` or `..` segments. Exactly one `Asset` exists per canonical path.
///
/// # Examples
///
/// ```
/// use weft_core::{Asset, AssetKind};
///
/// let asset = Asset {
///     path: "css/main.css".into(),
///     kind: AssetKind::Stylesheet,
///     size_bytes: 2048,
/// };
/// assert_eq!(asset.kind, AssetKind::Stylesheet);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    /// Canonical tree-relative path; unique key.
    pub path: String,
    /// Classification by extension (and configured bundle paths).
    pub kind: AssetKind,
    /// File size in bytes.
    pub size_bytes: u64,
}

/// Classification of an asset by what role it plays in the site.
///
/// # Examples
///
/// ```
/// use weft_core::AssetKind;
///
/// assert_eq!(AssetKind::from_extension("html"), AssetKind::Html);
/// assert_eq!(AssetKind::from_extension("css"), AssetKind::Stylesheet);
/// assert_eq!(AssetKind::from_extension("mjs"), AssetKind::Script);
/// assert_eq!(AssetKind::from_extension("webp"), AssetKind::Image);
/// assert_eq!(AssetKind::from_extension("woff2"), AssetKind::Font);
/// assert_eq!(AssetKind::from_extension("pdf"), AssetKind::Other);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssetKind {
    Html,
    Stylesheet,
    Script,
    Image,
    Font,
    /// A stylesheet that defines design tokens (custom properties).
    TokenDefinition,
    /// A generated, concatenated stylesheet artifact at a configured path.
    Bundle,
    Other,
}

impl AssetKind {
    /// Classify a file from its extension (without the dot, case-insensitive).
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "html" | "htm" => AssetKind::Html,
            "css" => AssetKind::Stylesheet,
            "js" | "mjs" | "cjs" => AssetKind::Script,
            "png" | "jpg" | "jpeg" | "gif" | "svg" | "webp" | "avif" | "ico" => AssetKind::Image,
            "woff" | "woff2" | "ttf" | "otf" | "eot" => AssetKind::Font,
            _ => AssetKind::Other,
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetKind::Html => write!(f, "html"),
            AssetKind::Stylesheet => write!(f, "stylesheet"),
            AssetKind::Script => write!(f, "script"),
            AssetKind::Image => write!(f, "image"),
            AssetKind::Font => write!(f, "font"),
            AssetKind::TokenDefinition => write!(f, "token-definition"),
            AssetKind::Bundle => write!(f, "bundle"),
            AssetKind::Other => write!(f, "other"),
        }
    }
}

/// What kind of declaration produced a reference.
///
/// # Examples
///
/// ```
/// use weft_core::RefKind;
///
/// let kind: RefKind = serde_json::from_str("\"css-import\"").unwrap();
/// assert_eq!(kind, RefKind::CssImport);
/// assert_eq!(RefKind::StylesheetLink.short_label(), "css");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RefKind {
    /// `<link rel="stylesheet" href=...>`
    StylesheetLink,
    /// `<script src=...>`
    ScriptSrc,
    /// `<img src=...>`
    ImageSrc,
    /// `<link rel="preload" as="font" href=...>`
    FontPreload,
    /// `@import "...";` inside a stylesheet
    CssImport,
    /// ES `import ... from "..."`
    JsImport,
    /// CommonJS `require("...")`
    JsRequire,
}

impl RefKind {
    /// Short label used when grouping missing references in reports
    /// (`css`, `js`, `image`, `font`).
    pub fn short_label(self) -> &'static str {
        match self {
            RefKind::StylesheetLink | RefKind::CssImport => "css",
            RefKind::ScriptSrc | RefKind::JsImport | RefKind::JsRequire => "js",
            RefKind::ImageSrc => "image",
            RefKind::FontPreload => "font",
        }
    }

    /// Returns `true` for the kinds declared inside HTML pages.
    pub fn is_html_declared(self) -> bool {
        matches!(
            self,
            RefKind::StylesheetLink | RefKind::ScriptSrc | RefKind::ImageSrc | RefKind::FontPreload
        )
    }
}

impl fmt::Display for RefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefKind::StylesheetLink => write!(f, "stylesheet-link"),
            RefKind::ScriptSrc => write!(f, "script-src"),
            RefKind::ImageSrc => write!(f, "image-src"),
            RefKind::FontPreload => write!(f, "font-preload"),
            RefKind::CssImport => write!(f, "css-import"),
            RefKind::JsImport => write!(f, "js-import"),
            RefKind::JsRequire => write!(f, "js-require"),
        }
    }
}

/// Where a declared reference string points, before any resolution.
///
/// Only `Relative` references are resolved against the tree; the other three
/// classes are never verified locally and always count as existing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Classification {
    /// A path resolved against the declaring file's directory.
    Relative,
    /// `http://` or `https://` URL.
    AbsoluteExternal,
    /// `//host/path` URL inheriting the page scheme.
    ProtocolRelative,
    /// Inline `data:` URI.
    DataUri,
}

impl Classification {
    /// Returns `true` when no local file lookup applies.
    pub fn is_external(self) -> bool {
        !matches!(self, Classification::Relative)
    }
}

/// A declared cross-file relationship extracted from a source file.
///
/// Invariant: `resolved` is `Some` iff `classification == Relative`.
/// `exists` is always `true` for external classifications.
///
/// # Examples
///
/// ```
/// use weft_core::{Classification, RefKind, Reference};
///
/// let r = Reference {
///     source: "index.html".into(),
///     declared: "css/main.css".into(),
///     kind: RefKind::StylesheetLink,
///     classification: Classification::Relative,
///     resolved: Some("css/main.css".into()),
///     exists: true,
/// };
/// assert!(!r.is_dangling());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    /// Canonical path of the file containing the declaration.
    pub source: String,
    /// The literal string as written.
    pub declared: String,
    /// What kind of declaration produced it.
    pub kind: RefKind,
    /// External/relative classification.
    pub classification: Classification,
    /// Canonical target path; present only for relative references.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved: Option<String>,
    /// Whether the target is a known asset (always `true` when external).
    pub exists: bool,
}

impl Reference {
    /// A relative reference whose target is not a known asset.
    pub fn is_dangling(&self) -> bool {
        self.classification == Classification::Relative && !self.exists
    }
}

/// Module system detected in a script file.
///
/// # Examples
///
/// ```
/// use weft_core::ModuleKind;
///
/// let kind: ModuleKind = serde_json::from_str("\"es-module\"").unwrap();
/// assert_eq!(kind, ModuleKind::EsModule);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModuleKind {
    /// Any `import` or `export` present.
    EsModule,
    /// `require(...)` or `module.exports` present.
    CommonJs,
    /// Plain script, no module syntax.
    Script,
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleKind::EsModule => write!(f, "es-module"),
            ModuleKind::CommonJs => write!(f, "commonjs"),
            ModuleKind::Script => write!(f, "script"),
        }
    }
}

/// Severity level for report findings and recommendations.
///
/// # Examples
///
/// ```
/// use weft_core::Severity;
///
/// let s: Severity = serde_json::from_str("\"critical\"").unwrap();
/// assert_eq!(s, Severity::Critical);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The site is broken in a way every page shares.
    Critical,
    /// A referenced file is missing.
    Error,
    /// A resource is at risk but pages still render.
    Warning,
    /// A performance improvement, nothing is broken.
    Optimization,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Critical => write!(f, "critical"),
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Optimization => write!(f, "optimization"),
        }
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "critical" => Ok(Severity::Critical),
            "error" => Ok(Severity::Error),
            "warning" => Ok(Severity::Warning),
            "optimization" => Ok(Severity::Optimization),
            other => Err(format!("unknown severity: {other}")),
        }
    }
}

impl Severity {
    /// Returns `true` if `self` is at least as severe as `threshold`.
    ///
    /// Severity order: Critical > Error > Warning > Optimization.
    ///
    /// # Examples
    ///
    /// ```
    /// use weft_core::Severity;
    ///
    /// assert!(Severity::Critical.meets_threshold(Severity::Error));
    /// assert!(Severity::Error.meets_threshold(Severity::Error));
    /// assert!(!Severity::Optimization.meets_threshold(Severity::Warning));
    /// ```
    pub fn meets_threshold(self, threshold: Severity) -> bool {
        self.rank() <= threshold.rank()
    }

    fn rank(self) -> u8 {
        match self {
            Severity::Critical => 0,
            Severity::Error => 1,
            Severity::Warning => 2,
            Severity::Optimization => 3,
        }
    }
}

/// A derived, deduplicated finding.
///
/// Two findings are the same issue iff `category` and `message` are equal;
/// `occurrences` accumulates every source file exhibiting it. Issues are
/// rebuilt from scratch on every run, never persisted.
///
/// # Examples
///
/// ```
/// use weft_core::{Issue, Severity};
///
/// let issue = Issue {
///     category: "missing-css".into(),
///     message: "css/missing.css not found".into(),
///     severity: Severity::Error,
///     occurrences: vec!["index.html".into(), "about.html".into()],
/// };
/// assert_eq!(issue.occurrences.len(), 2);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// Structural category (e.g. `missing-css`, `missing-js`).
    pub category: String,
    /// Human-readable message; part of the issue identity.
    pub message: String,
    /// How bad it is.
    pub severity: Severity,
    /// Every source file exhibiting this exact finding.
    pub occurrences: Vec<String>,
}

/// Output format for CLI subcommands.
///
/// Implements [`FromStr`] so it can be used directly with `clap` argument parsing.
///
/// # Examples
///
/// ```
/// use weft_core::OutputFormat;
///
/// let fmt: OutputFormat = "json".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Json);
///
/// let fmt: OutputFormat = "md".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Markdown);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable tables and summaries.
    #[default]
    Text,
    /// Machine-readable JSON with camelCase keys.
    Json,
    /// Markdown-formatted output.
    Markdown,
    /// Standalone HTML document for manual review.
    Html,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Html => write!(f, "html"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "html" => Ok(OutputFormat::Html),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}
