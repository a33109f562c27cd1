//! Functional core for sitemap generation.
//!
//! Turns an in-memory stack of page entries into compliant sitemap XML,
//! splitting across documents at the protocol's size boundaries, and
//! aggregates produced sitemaps into a sitemap index. All operations work on
//! in-memory data and a caller-supplied byte sink; nothing here touches the
//! network or storage.

pub mod common;
pub mod sitemap;
