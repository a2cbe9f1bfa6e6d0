//! Site tree inventory and reference path resolution.
//!
//! Snapshots the scanned tree into a flat set of assets keyed by canonical
//! path (the [`walker`] module, built on the `ignore` crate), and provides
//! the pure path algebra that maps declared reference strings onto canonical
//! targets (the [`resolver`] module). Everything downstream keys by the
//! canonical paths produced here.

pub mod resolver;
pub mod walker;

pub use resolver::{classify, resolve, resolve_module, Resolution};
pub use walker::{build_inventory, Inventory};
