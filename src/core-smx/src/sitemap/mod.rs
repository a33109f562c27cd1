//! # Sitemap Generation Library
//!
//! Size-bounded, streaming generation of sitemap XML documents from a pending
//! stack of page entries, plus aggregation of produced sitemaps into a
//! sitemap index.
//!
//! The writer drains entries last-in-first-out, tracks a running byte-size
//! estimate without pre-rendering, and stops exactly at the protocol's
//! compliance boundaries (50 MB / 50,000 URLs per file). Entries that do not
//! fit stay in the stack so the caller can redirect them into the next file.
//!
//! ## Features
//!
//! - Incremental byte-cost accounting (no DOM, no pre-rendering)
//! - Count and file-size caps, individually relaxable
//! - Structural remainder signaling (a cap hit is not an error)
//! - Sitemap index generation over produced documents
//! - Pull-parsing of existing sitemap and index documents
//!
//! ## Examples
//!
//! ```
//! use core_smx::sitemap::{ChangeFrequency, Entry, SiteMap};
//! use url::Url;
//!
//! # fn main() -> core_smx::sitemap::Result<()> {
//! let mut pending = vec![
//!     Entry::new("https://example.com/about", ChangeFrequency::Monthly)?,
//!     Entry::new("https://example.com/news", ChangeFrequency::Daily)?,
//! ];
//!
//! let sitemap = SiteMap::compliant(Url::parse("https://example.com/sitemap1.xml").unwrap());
//! let document = sitemap.render(&mut pending)?;
//! assert!(pending.is_empty());
//! assert!(!document.get_ref().is_empty());
//! # Ok(())
//! # }
//! ```

// Module declarations
mod budget;
mod config;
mod entry;
mod errors;
mod index;
mod reader;
mod writer;

// Public API re-exports
pub use budget::SizeBudget;
pub use config::{MAX_COMPLIANT_FILE_SIZE, MAX_COMPLIANT_URL_COUNT, SiteMapConfig};
pub use entry::{ChangeFrequency, Entry};
pub use errors::{Result, SiteMapError};
pub use index::{SiteMapIndex, SiteMapRef};
pub use reader::{ParsedSiteMapRef, ParsedUrl, parse_sitemap, parse_sitemap_index};
pub use writer::{SiteMap, WriteSummary};

/// XML namespace shared by sitemap and sitemap index documents.
pub const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Wire format for `lastmod` dates (`yyyy-MM-dd`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";
