//! Bundle output validation.
//!
//! A fixed set of expected bundle artifacts is checked by direct existence
//! and size lookup, independent of any reference edge — a site with zero
//! existing bundles is flagged even when no page links one.

use serde::Serialize;

use weft_core::WeftConfig;
use weft_inventory::walker::Inventory;

/// Existence and size of one expected bundle artifact.
///
/// # Examples
///
/// ```
/// use weft_graph::bundles::BundleStatus;
///
/// let status = BundleStatus {
///     path: "dist/styles.css".into(),
///     exists: false,
///     size_bytes: 0,
/// };
/// assert!(!status.exists);
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleStatus {
    /// Configured bundle path.
    pub path: String,
    /// Whether the artifact is in the inventory.
    pub exists: bool,
    /// Size in bytes; zero when missing.
    pub size_bytes: u64,
}

/// Check every configured bundle path against the inventory.
pub fn check_bundles(inventory: &Inventory, config: &WeftConfig) -> Vec<BundleStatus> {
    config
        .bundles
        .paths
        .iter()
        .map(|path| match inventory.get(path) {
            Some(asset) => BundleStatus {
                path: path.clone(),
                exists: true,
                size_bytes: asset.size_bytes,
            },
            None => BundleStatus {
                path: path.clone(),
                exists: false,
                size_bytes: 0,
            },
        })
        .collect()
}

/// Whether the configured stylesheet entry point exists.
pub fn css_entry_exists(inventory: &Inventory, config: &WeftConfig) -> bool {
    inventory.contains(&config.bundles.css_entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_core::{Asset, AssetKind};

    #[test]
    fn reports_existing_bundle_with_size() {
        let mut inventory = Inventory::new();
        inventory.insert(Asset {
            path: "dist/styles.css".into(),
            kind: AssetKind::Bundle,
            size_bytes: 4096,
        });

        let statuses = check_bundles(&inventory, &WeftConfig::default());
        assert_eq!(statuses.len(), 2);
        assert!(statuses[0].exists);
        assert_eq!(statuses[0].size_bytes, 4096);
        assert!(!statuses[1].exists);
        assert_eq!(statuses[1].size_bytes, 0);
    }

    #[test]
    fn empty_inventory_means_no_bundles() {
        let statuses = check_bundles(&Inventory::new(), &WeftConfig::default());
        assert!(statuses.iter().all(|s| !s.exists));
    }

    #[test]
    fn entry_point_lookup() {
        let mut inventory = Inventory::new();
        assert!(!css_entry_exists(&inventory, &WeftConfig::default()));

        inventory.insert(Asset {
            path: "css/main.css".into(),
            kind: AssetKind::Stylesheet,
            size_bytes: 1,
        });
        assert!(css_entry_exists(&inventory, &WeftConfig::default()));
    }
}
