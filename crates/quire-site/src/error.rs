//! Error types for page tree construction.

use std::path::PathBuf;

/// Error returned when building a page tree fails.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// An image asset's header could not be decoded.
    #[error("Failed to read image dimensions of {}: {message}", .path.display())]
    AssetDecode {
        /// Path of the image file.
        path: PathBuf,
        /// Decoder message.
        message: String,
    },
    /// A directory listing pattern was rejected.
    #[error("Invalid listing pattern {pattern}: {source}")]
    Pattern {
        /// Pattern that failed to compile.
        pattern: String,
        /// Underlying pattern error.
        #[source]
        source: glob::PatternError,
    },
}
