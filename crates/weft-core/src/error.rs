use std::path::PathBuf;

/// Errors that can occur across the weft analyzer.
///
/// Each variant wraps a specific error domain. Library crates use this type
/// directly; the binary crate converts to `miette` diagnostics at the boundary.
///
/// # Examples
///
/// ```
/// use weft_core::WeftError;
///
/// let err = WeftError::Config("unknown bundle path".into());
/// assert!(err.to_string().contains("unknown bundle path"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum WeftError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// An exclusion pattern failed to compile.
    #[error("invalid exclude pattern: {0}")]
    Pattern(String),

    /// JSON serialization / deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The scan root does not exist or cannot be enumerated.
    #[error("scan root not found or unreadable: {}", .0.display())]
    RootNotFound(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: WeftError = io_err.into();
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn config_error_displays_message() {
        let err = WeftError::Config("bad value".into());
        assert_eq!(err.to_string(), "configuration error: bad value");
    }

    #[test]
    fn root_not_found_shows_path() {
        let err = WeftError::RootNotFound(PathBuf::from("/tmp/missing-site"));
        assert!(err.to_string().contains("/tmp/missing-site"));
    }
}
