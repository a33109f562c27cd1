//! Compliance caps for generated sitemap documents.

/// Largest file size, in bytes, the sitemaps.org protocol permits per document.
pub const MAX_COMPLIANT_FILE_SIZE: usize = 50_000_000;

/// Largest number of `<url>` entries the protocol permits per document.
pub const MAX_COMPLIANT_URL_COUNT: usize = 50_000;

/// Caps applied while draining entries into a single sitemap document.
///
/// A zero in either field disables that cap. The default is the compliant
/// pair (50 MB, 50,000 URLs).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiteMapConfig {
    /// Maximum serialized size in bytes; 0 means unlimited.
    pub max_file_size: usize,
    /// Maximum number of `<url>` entries; 0 means unlimited.
    pub max_url_count: usize,
}

impl Default for SiteMapConfig {
    fn default() -> Self {
        Self {
            max_file_size: MAX_COMPLIANT_FILE_SIZE,
            max_url_count: MAX_COMPLIANT_URL_COUNT,
        }
    }
}

impl SiteMapConfig {
    /// A configuration with both caps disabled.
    pub fn uncapped() -> Self {
        Self {
            max_file_size: 0,
            max_url_count: 0,
        }
    }
}
