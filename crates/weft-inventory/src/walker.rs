use std::collections::HashMap;
use std::path::Path;

use weft_core::{Asset, AssetKind, WeftConfig, WeftError};

/// Snapshot of every file in the scanned tree, keyed by canonical path.
///
/// The inventory owns the authoritative existence facts: extractors and the
/// graph builder only ever read it. Degraded entries (unreadable metadata,
/// broken symlinks) are skipped and recorded as warnings rather than
/// aborting the walk.
///
/// # Examples
///
/// ```
/// use weft_core::{Asset, AssetKind};
/// use weft_inventory::walker::Inventory;
///
/// let mut inventory = Inventory::new();
/// inventory.insert(Asset {
///     path: "css/main.css".into(),
///     kind: AssetKind::Stylesheet,
///     size_bytes: 10,
/// });
/// assert!(inventory.contains("css/main.css"));
/// assert!(!inventory.contains("css/other.css"));
/// ```
#[derive(Debug, Default)]
pub struct Inventory {
    assets: HashMap<String, Asset>,
    warnings: Vec<String>,
}

impl Inventory {
    /// Create an empty inventory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an asset. Later inserts for the same canonical path win.
    pub fn insert(&mut self, asset: Asset) {
        self.assets.insert(asset.path.clone(), asset);
    }

    /// Whether a canonical path is a known asset.
    pub fn contains(&self, path: &str) -> bool {
        self.assets.contains_key(path)
    }

    /// Look up an asset by canonical path.
    pub fn get(&self, path: &str) -> Option<&Asset> {
        self.assets.get(path)
    }

    /// Number of known assets.
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Whether the inventory holds no assets.
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Iterate over all assets in unspecified order.
    pub fn assets(&self) -> impl Iterator<Item = &Asset> {
        self.assets.values()
    }

    /// All assets of one kind, sorted by path for deterministic output.
    pub fn of_kind(&self, kind: AssetKind) -> Vec<&Asset> {
        let mut matched: Vec<&Asset> = self.assets.values().filter(|a| a.kind == kind).collect();
        matched.sort_by(|a, b| a.path.cmp(&b.path));
        matched
    }

    /// Warnings recorded while building the inventory.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Record a degraded-scan warning.
    pub fn push_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }
}

/// Convert a path relative to the scan root into canonical form:
/// forward slashes, no leading `./`.
pub fn canonical_path(relative: &Path) -> String {
    let mut out = String::new();
    for component in relative.components() {
        if !out.is_empty() {
            out.push('/');
        }
        out.push_str(&component.as_os_str().to_string_lossy());
    }
    out
}

/// Walk the site tree at `root` and snapshot every file into an [`Inventory`].
///
/// Hidden directories and VCS metadata are always skipped; additional glob
/// patterns come from `config.scan.exclude`. Files at a configured bundle
/// path are classified [`AssetKind::Bundle`]; the configured token stylesheet
/// is classified [`AssetKind::TokenDefinition`]; everything else is
/// classified by extension.
///
/// # Errors
///
/// Returns [`WeftError::RootNotFound`] if `root` is not an enumerable
/// directory, and [`WeftError::Pattern`] for an invalid exclude glob. An
/// unreadable individual entry never fails the walk; it is recorded as a
/// warning on the inventory.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use weft_core::WeftConfig;
/// use weft_inventory::walker::build_inventory;
///
/// let inventory = build_inventory(Path::new("site"), &WeftConfig::default()).unwrap();
/// println!("{} assets", inventory.len());
/// ```
pub fn build_inventory(root: &Path, config: &WeftConfig) -> Result<Inventory, WeftError> {
    if !root.is_dir() {
        return Err(WeftError::RootNotFound(root.to_path_buf()));
    }
    // A directory we cannot enumerate at all is fatal, not degraded.
    std::fs::read_dir(root).map_err(|_| WeftError::RootNotFound(root.to_path_buf()))?;

    let excludes: Vec<glob::Pattern> = config
        .scan
        .exclude
        .iter()
        .map(|p| glob::Pattern::new(p).map_err(|e| WeftError::Pattern(format!("{p}: {e}"))))
        .collect::<Result<_, _>>()?;

    let mut inventory = Inventory::new();
    let walker = ignore::WalkBuilder::new(root).build();

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                inventory.push_warning(format!("skipped unreadable entry: {e}"));
                continue;
            }
        };

        let Some(file_type) = entry.file_type() else {
            continue;
        };
        if !file_type.is_file() {
            continue;
        }

        let path = entry.path();
        let relative = match path.strip_prefix(root) {
            Ok(r) => r,
            Err(_) => path,
        };
        let canonical = canonical_path(relative);

        if excludes.iter().any(|p| p.matches(&canonical)) {
            continue;
        }

        let size_bytes = match std::fs::metadata(path) {
            Ok(m) => m.len(),
            Err(e) => {
                inventory.push_warning(format!("skipped {canonical}: {e}"));
                continue;
            }
        };

        let kind = classify(&canonical, config);
        inventory.insert(Asset {
            path: canonical,
            kind,
            size_bytes,
        });
    }

    Ok(inventory)
}

fn classify(canonical: &str, config: &WeftConfig) -> AssetKind {
    if config.bundles.paths.iter().any(|b| b == canonical) {
        return AssetKind::Bundle;
    }
    if config.design_system.tokens_file == canonical {
        return AssetKind::TokenDefinition;
    }
    let ext = canonical.rsplit('.').next().unwrap_or("");
    if ext == canonical {
        return AssetKind::Other; // no extension at all
    }
    AssetKind::from_extension(ext)
}
