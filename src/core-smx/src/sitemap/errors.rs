//! Error types for the sitemap generation library.

use thiserror::Error;

/// Main error type for sitemap generation operations.
///
/// Reaching a count or file-size cap is *not* an error; it is signaled
/// structurally by the entries left in the pending stack.
#[derive(Debug, Error)]
pub enum SiteMapError {
    /// Entry URL is empty, relative, or otherwise malformed
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Priority lies outside the permitted range
    #[error("priority {0} is outside the range 0.0..=1.0")]
    PriorityOutOfRange(f64),

    /// XML emission or parsing failed
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// The underlying byte sink failed
    #[error("sink I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Document content could not be interpreted as a sitemap
    #[error("sitemap parsing failed: {0}")]
    Parse(String),
}

/// Type alias for Result with SiteMapError
pub type Result<T> = std::result::Result<T, SiteMapError>;
