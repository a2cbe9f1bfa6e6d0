//! Pure path algebra: classify a declared reference string and, for relative
//! references, map it onto a canonical in-tree path. No filesystem access —
//! existence is the inventory's business, never the resolver's.

use weft_core::Classification;

use crate::walker::Inventory;

/// Outcome of resolving a declared reference against its source file.
///
/// # Examples
///
/// ```
/// use weft_inventory::resolver::{resolve, Resolution};
///
/// match resolve("pages/about.html", "../css/main.css") {
///     Resolution::Resolved(path) => assert_eq!(path, "css/main.css"),
///     _ => panic!("expected an in-tree resolution"),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Not a local path; carries the external classification.
    External(Classification),
    /// Canonical in-tree target path.
    Resolved(String),
    /// A `..` segment walked above the tree root; treated as unresolved.
    EscapesRoot,
}

/// Classify a declared reference string without resolving it.
///
/// # Examples
///
/// ```
/// use weft_core::Classification;
/// use weft_inventory::resolver::classify;
///
/// assert_eq!(classify("https://cdn.example.com/a.js"), Classification::AbsoluteExternal);
/// assert_eq!(classify("//fonts.gstatic.com/f.woff2"), Classification::ProtocolRelative);
/// assert_eq!(classify("data:image/png;base64,AAAA"), Classification::DataUri);
/// assert_eq!(classify("css/main.css"), Classification::Relative);
/// ```
pub fn classify(declared: &str) -> Classification {
    if declared.starts_with("http://") || declared.starts_with("https://") {
        Classification::AbsoluteExternal
    } else if declared.starts_with("//") {
        Classification::ProtocolRelative
    } else if declared.starts_with("data:") {
        Classification::DataUri
    } else {
        Classification::Relative
    }
}

/// Resolve `declared` against the directory of `source`.
///
/// External references short-circuit to [`Resolution::External`]. Relative
/// references are joined onto the source file's directory and normalized:
/// backslashes become forward slashes, `.` segments collapse, and each `..`
/// consumes its immediate parent. A `..` with no parent left escapes the
/// tree root and yields [`Resolution::EscapesRoot`].
///
/// Resolution is idempotent: feeding a canonical in-tree path back through
/// (with a root-level source) returns it unchanged.
pub fn resolve(source: &str, declared: &str) -> Resolution {
    let classification = classify(declared);
    if classification.is_external() {
        return Resolution::External(classification);
    }

    let dir = parent_dir(source);
    let joined = if dir.is_empty() {
        declared.to_string()
    } else {
        format!("{dir}/{declared}")
    };

    match normalize(&joined) {
        Some(path) => Resolution::Resolved(path),
        None => Resolution::EscapesRoot,
    }
}

/// Resolve a module specifier, applying the single extensionless fallback:
/// a specifier with no extension targets `<specifier>.js` if, and only if,
/// that exact candidate is a known asset; otherwise it is reported as-is.
///
/// # Examples
///
/// ```
/// use weft_core::{Asset, AssetKind};
/// use weft_inventory::resolver::{resolve_module, Resolution};
/// use weft_inventory::walker::Inventory;
///
/// let mut inventory = Inventory::new();
/// inventory.insert(Asset {
///     path: "js/util.js".into(),
///     kind: AssetKind::Script,
///     size_bytes: 0,
/// });
///
/// assert_eq!(
///     resolve_module("js/app.js", "./util", &inventory),
///     Resolution::Resolved("js/util.js".into())
/// );
/// // No candidate on disk: the extensionless path is reported missing as-is.
/// assert_eq!(
///     resolve_module("js/app.js", "./ghost", &inventory),
///     Resolution::Resolved("js/ghost".into())
/// );
/// ```
pub fn resolve_module(source: &str, declared: &str, inventory: &Inventory) -> Resolution {
    match resolve(source, declared) {
        Resolution::Resolved(path) => {
            if has_extension(&path) {
                return Resolution::Resolved(path);
            }
            let candidate = format!("{path}.js");
            if inventory.contains(&candidate) {
                Resolution::Resolved(candidate)
            } else {
                Resolution::Resolved(path)
            }
        }
        other => other,
    }
}

/// Collapse a slash-joined path into canonical form.
///
/// Returns `None` when a `..` segment would escape the tree root.
pub fn normalize(path: &str) -> Option<String> {
    let cleaned = path.replace('\\', "/");
    let mut segments: Vec<&str> = Vec::new();

    for segment in cleaned.split('/') {
        match segment {
            "" | "." => continue,
            ".." => {
                segments.pop()?;
            }
            other => segments.push(other),
        }
    }

    Some(segments.join("/"))
}

/// The directory portion of a canonical path (`""` for root-level files).
pub fn parent_dir(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    }
}

fn has_extension(path: &str) -> bool {
    let last = path.rsplit('/').next().unwrap_or(path);
    // A leading dot alone (".env") is a name, not an extension.
    last.rfind('.').is_some_and(|idx| idx > 0)
}
