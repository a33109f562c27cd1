//! Sitemap index writer.

use std::io::{Cursor, Write};

use chrono::NaiveDate;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use tracing::debug;
use url::Url;

use crate::sitemap::errors::Result;
use crate::sitemap::{DATE_FORMAT, SITEMAP_NS};

/// Reference to one produced sitemap document: where it lives and when it
/// was last modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteMapRef {
    /// URL the sitemap document is served from.
    pub location: Url,
    /// Last-modified date, emitted as `lastmod` when present.
    pub last_modified: Option<NaiveDate>,
}

/// A sitemap index: the top-level document pointing search engines at each
/// individual sitemap of a site.
///
/// References serialize in insertion order. No size or count cap is applied
/// here; an index that would exceed the protocol limits is the caller's
/// responsibility to split.
#[derive(Debug, Clone)]
pub struct SiteMapIndex {
    location: Url,
    sitemaps: Vec<SiteMapRef>,
}

impl SiteMapIndex {
    /// An empty index at `location`.
    pub fn new(location: Url) -> Self {
        Self {
            location,
            sitemaps: Vec::new(),
        }
    }

    /// Appends a sitemap reference to the index.
    pub fn add(&mut self, sitemap: SiteMapRef) {
        self.sitemaps.push(sitemap);
    }

    /// The URL this index will be served from.
    pub fn location(&self) -> &Url {
        &self.location
    }

    /// The referenced sitemaps, in insertion order.
    pub fn sitemaps(&self) -> &[SiteMapRef] {
        &self.sitemaps
    }

    /// Serializes the index into an in-memory document, cursor rewound to
    /// the start.
    pub fn render(&self) -> Result<Cursor<Vec<u8>>> {
        let mut cursor = Cursor::new(Vec::new());
        self.write_into(&mut cursor)?;
        cursor.set_position(0);
        Ok(cursor)
    }

    /// Serializes the index into `sink` as one complete XML document: a
    /// namespaced `sitemapindex` root holding one `sitemap` element per
    /// reference, `loc` always and `lastmod` only when a date is present.
    ///
    /// # Errors
    ///
    /// Propagates sink I/O and XML serialization failures.
    pub fn write_into<W: Write>(&self, sink: W) -> Result<()> {
        let mut writer = Writer::new(sink);

        debug!(location = %self.location, sitemaps = self.sitemaps.len(), "writing sitemap index");

        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        let mut root = BytesStart::new("sitemapindex");
        root.push_attribute(("xmlns", SITEMAP_NS));
        writer.write_event(Event::Start(root))?;

        for sitemap in &self.sitemaps {
            writer.write_event(Event::Start(BytesStart::new("sitemap")))?;
            writer
                .create_element("loc")
                .write_text_content(BytesText::new(sitemap.location.as_str()))?;
            if let Some(date) = sitemap.last_modified {
                let lastmod = date.format(DATE_FORMAT).to_string();
                writer
                    .create_element("lastmod")
                    .write_text_content(BytesText::new(&lastmod))?;
            }
            writer.write_event(Event::End(BytesEnd::new("sitemap")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("sitemapindex")))?;
        Ok(())
    }
}
