//! Error types for mask expansion and record loading.

use std::path::PathBuf;

/// Errors raised while resolving a single placeholder.
///
/// Malformed placeholder syntax is never an error; the scanner leaves it in
/// the output as literal text. Everything here belongs to a placeholder that
/// was recognised but could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MaskError {
    /// A modifier chain named something that is not a known modifier
    #[error("unknown modifier: {0}")]
    UnknownModifier(String),
    /// A `Pattern(...)` segment has no unescaped `>`
    #[error("invalid pattern format in '{0}', expected 'from>to'")]
    InvalidPatternSyntax(String),
    /// A `Pattern(...)` rule whose `from` side is empty after unescaping
    #[error("'from' pattern cannot be empty in '{0}'")]
    EmptyFromPattern(String),
    /// A date/season keyword that the mapper does not know
    #[error("unsupported date format: {0}")]
    UnsupportedFormat(String),
    /// The raw timestamp attribute is empty or not an integer
    #[error("invalid timestamp '{0}'")]
    InvalidTimestamp(String),
}

/// Result type for mask operations
pub type MaskResult<T> = Result<T, MaskError>;

/// Errors raised by record sources and the cache file.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse cache '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize cache: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("cache was built for {cached}, not {requested}")]
    StaleCache { cached: String, requested: String },
}

/// Errors raised while expanding a batch of records.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("record '{dn}': {source}")]
    Mask {
        dn: String,
        #[source]
        source: MaskError,
    },
    #[error("expansion worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_error_messages() {
        assert_eq!(
            MaskError::UnknownModifier("Frobnicate".to_string()).to_string(),
            "unknown modifier: Frobnicate"
        );
        assert_eq!(
            MaskError::InvalidPatternSyntax("abc".to_string()).to_string(),
            "invalid pattern format in 'abc', expected 'from>to'"
        );
        assert_eq!(
            MaskError::InvalidTimestamp(String::new()).to_string(),
            "invalid timestamp ''"
        );
    }

    #[test]
    fn test_stale_cache_message() {
        let err = SourceError::StaleCache {
            cached: "dc01:389".to_string(),
            requested: "dc02:636".to_string(),
        };
        assert_eq!(err.to_string(), "cache was built for dc01:389, not dc02:636");
    }
}
