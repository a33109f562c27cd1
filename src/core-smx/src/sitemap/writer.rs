//! Size-bounded sitemap document writer.

use std::io::{Cursor, Write};

use chrono::NaiveDate;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use tracing::debug;
use url::Url;

use crate::sitemap::budget::SizeBudget;
use crate::sitemap::config::SiteMapConfig;
use crate::sitemap::entry::Entry;
use crate::sitemap::errors::Result;
use crate::sitemap::index::SiteMapRef;
use crate::sitemap::{DATE_FORMAT, SITEMAP_NS};

/// Counters describing one completed drain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteSummary {
    /// Number of `<url>` elements emitted.
    pub url_count: usize,
    /// The size budget's running total for the document. A slight
    /// overestimate of the bytes actually emitted.
    pub estimated_bytes: usize,
}

/// One sitemap document being built: its own location, optional
/// last-modified date, and the caps to respect while draining entries.
///
/// Draining consumes entries from the back of the supplied vec (LIFO) and
/// stops when the stack empties, the URL-count cap is reached, or the size
/// budget's forward check reports no more headroom. Whatever was not
/// consumed stays in the vec, in its original relative order, for the caller
/// to direct into the next document. Hitting a cap is an expected outcome,
/// not an error.
///
/// A single pending vec must not be drained by two writers concurrently;
/// exclusive access is the caller's responsibility.
#[derive(Debug, Clone)]
pub struct SiteMap {
    location: Url,
    last_modified: Option<NaiveDate>,
    config: SiteMapConfig,
}

impl SiteMap {
    /// A sitemap at `location` with no size or count caps.
    pub fn new(location: Url) -> Self {
        Self::with_config(location, SiteMapConfig::uncapped())
    }

    /// A sitemap at `location` constrained to the protocol caps
    /// (50 MB, 50,000 URLs).
    pub fn compliant(location: Url) -> Self {
        Self::with_config(location, SiteMapConfig::default())
    }

    /// A sitemap at `location` with caller-chosen caps.
    pub fn with_config(location: Url, config: SiteMapConfig) -> Self {
        Self {
            location,
            last_modified: None,
            config,
        }
    }

    /// The URL this document will be served from.
    pub fn location(&self) -> &Url {
        &self.location
    }

    /// The date recorded when this document is referenced from an index.
    pub fn last_modified(&self) -> Option<NaiveDate> {
        self.last_modified
    }

    /// Sets the date recorded when this document is referenced from an index.
    pub fn set_last_modified(&mut self, date: NaiveDate) {
        self.last_modified = Some(date);
    }

    /// The location/last-modified pair a [`crate::sitemap::SiteMapIndex`]
    /// needs to reference this document.
    pub fn reference(&self) -> SiteMapRef {
        SiteMapRef {
            location: self.location.clone(),
            last_modified: self.last_modified,
        }
    }

    /// Drains `entries` into an in-memory document.
    ///
    /// The returned cursor is rewound to the start, ready to be read or
    /// copied. Entries that did not fit remain in `entries`.
    ///
    /// # Errors
    ///
    /// Only sink/serialization failures; cap exhaustion is signaled by a
    /// non-empty `entries` on return.
    pub fn render(&self, entries: &mut Vec<Entry>) -> Result<Cursor<Vec<u8>>> {
        let mut cursor = Cursor::new(Vec::new());
        self.write_into(entries, &mut cursor)?;
        cursor.set_position(0);
        Ok(cursor)
    }

    /// Drains `entries` into `sink` as one complete XML document.
    ///
    /// Pops entries from the back of the vec (most recently pushed first)
    /// and serializes each as a `<url>` element: `loc` always, `lastmod`
    /// only when the entry carries a date, `changefreq` always, `priority`
    /// only when present and greater than zero. Stop conditions are
    /// evaluated after each entry, in order: stack exhausted, URL-count cap
    /// reached, size headroom gone.
    ///
    /// # Errors
    ///
    /// Propagates sink I/O and XML serialization failures. On failure the
    /// sink holds a partial document the caller must discard.
    pub fn write_into<W: Write>(&self, entries: &mut Vec<Entry>, sink: W) -> Result<WriteSummary> {
        let mut writer = Writer::new(sink);
        let mut budget = SizeBudget::new();
        let mut url_count = 0usize;

        debug!(location = %self.location, pending = entries.len(), "draining entries into sitemap");

        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        let mut root = BytesStart::new("urlset");
        root.push_attribute(("xmlns", SITEMAP_NS));
        writer.write_event(Event::Start(root))?;

        while let Some(entry) = entries.pop() {
            let cost = SizeBudget::entry_cost(&entry);
            write_entry(&mut writer, &entry)?;
            url_count += 1;
            budget.record(cost);

            // The popped entry is already on the wire; decide whether the
            // next one is allowed to follow it.
            if self.config.max_url_count > 0 && url_count >= self.config.max_url_count {
                debug!(url_count, remaining = entries.len(), "stopping at URL count cap");
                break;
            }
            if !budget.has_headroom(self.config.max_file_size) {
                debug!(
                    estimated_bytes = budget.total(),
                    remaining = entries.len(),
                    "stopping at file size cap"
                );
                break;
            }
        }

        writer.write_event(Event::End(BytesEnd::new("urlset")))?;

        debug!(url_count, estimated_bytes = budget.total(), "sitemap complete");
        Ok(WriteSummary {
            url_count,
            estimated_bytes: budget.total(),
        })
    }
}

fn write_entry<W: Write>(writer: &mut Writer<W>, entry: &Entry) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("url")))?;

    writer
        .create_element("loc")
        .write_text_content(BytesText::new(entry.url().as_str()))?;

    if let Some(date) = entry.lastmod() {
        let lastmod = date.format(DATE_FORMAT).to_string();
        writer
            .create_element("lastmod")
            .write_text_content(BytesText::new(&lastmod))?;
    }

    writer
        .create_element("changefreq")
        .write_text_content(BytesText::new(entry.changefreq().as_str()))?;

    if let Some(priority) = entry.effective_priority() {
        let priority = format_priority(priority);
        writer
            .create_element("priority")
            .write_text_content(BytesText::new(&priority))?;
    }

    writer.write_event(Event::End(BytesEnd::new("url")))?;
    Ok(())
}

/// Renders a priority with at most one fractional digit and `.` as the
/// decimal separator regardless of host locale. Integral values drop the
/// fractional part entirely ("1", not "1.0").
fn format_priority(priority: f64) -> String {
    let rounded = (priority * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{}", rounded as u32)
    } else {
        format!("{rounded:.1}")
    }
}
