//! Core types, configuration, and error handling for the weft analyzer.
//!
//! This crate provides the shared foundation used by all other weft crates:
//! - [`WeftError`] — unified error type using `thiserror`
//! - [`WeftConfig`] — configuration loaded from `.weft.toml`
//! - Shared types: [`Asset`], [`Reference`], [`Issue`], [`Severity`],
//!   [`OutputFormat`]

mod config;
mod error;
mod types;

pub use config::{BundleConfig, DesignSystemConfig, ReportConfig, ScanConfig, WeftConfig};
pub use error::WeftError;
pub use types::{
    Asset, AssetKind, Classification, Issue, ModuleKind, OutputFormat, RefKind, Reference, Severity,
};

/// A convenience `Result` type for weft operations.
pub type Result<T> = std::result::Result<T, WeftError>;
