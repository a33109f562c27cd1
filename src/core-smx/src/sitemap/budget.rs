//! Incremental byte-cost accounting for the compact XML serialization.

use quick_xml::escape::escape;

use crate::sitemap::entry::Entry;

// Fixed serialization overheads, in bytes. The per-element constants cover
// the open and close tags around the element's text; `lastmod` and `priority`
// are flat because their values are fixed-width (a 10-character date, up to
// three characters of priority). The root close tag is charged up front with
// the rest of the document overhead so the running total is always an upper
// bound on the finished document's size.
const XML_DECL_COST: usize = 39;
const URLSET_OPEN_COST: usize = 61;
const URLSET_CLOSE_COST: usize = 9;
const URL_OPEN_COST: usize = 5;
const URL_CLOSE_COST: usize = 6;
const LOC_TAGS_COST: usize = 11;
const LASTMOD_COST: usize = 29;
const CHANGEFREQ_TAGS_COST: usize = 25;
const PRIORITY_COST: usize = 24;

/// Running estimate of the bytes a sitemap document will occupy once
/// serialized, maintained without rendering anything first.
///
/// Besides the cumulative total, the budget remembers the single largest
/// per-entry cost seen so far. [`SizeBudget::has_headroom`] uses it as a
/// forward check: if an entry at least as large as the largest one seen
/// would still fit, the next entry is safe to emit. This keeps the fit
/// decision O(1) per entry at the price of stopping slightly before the
/// exact byte boundary.
#[derive(Debug)]
pub struct SizeBudget {
    total: usize,
    longest_entry: usize,
}

impl SizeBudget {
    /// A budget primed with the document-level overhead: XML declaration and
    /// the namespaced `urlset` open and close tags.
    pub fn new() -> Self {
        Self {
            total: XML_DECL_COST + URLSET_OPEN_COST + URLSET_CLOSE_COST,
            longest_entry: 0,
        }
    }

    /// The byte cost serializing `entry` adds to a document.
    ///
    /// The URL contribution is measured on the XML-escaped text, so URLs
    /// containing `&` and friends are charged what they actually emit.
    pub fn entry_cost(entry: &Entry) -> usize {
        let mut cost = URL_OPEN_COST + URL_CLOSE_COST;
        cost += LOC_TAGS_COST + escape(entry.url().as_str()).len();
        if entry.lastmod().is_some() {
            cost += LASTMOD_COST;
        }
        cost += CHANGEFREQ_TAGS_COST + entry.changefreq().as_str().len();
        if entry.effective_priority().is_some() {
            cost += PRIORITY_COST;
        }
        cost
    }

    /// Adds an emitted entry's cost to the running total.
    pub fn record(&mut self, cost: usize) {
        self.total += cost;
        if cost > self.longest_entry {
            self.longest_entry = cost;
        }
    }

    /// Estimated document size so far, in bytes.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Largest single entry cost recorded so far.
    pub fn longest_entry(&self) -> usize {
        self.longest_entry
    }

    /// Forward check: true when one more entry, as large as the largest seen
    /// so far, would still fit under `max_file_size`. Always true when the
    /// cap is zero (uncapped).
    pub fn has_headroom(&self, max_file_size: usize) -> bool {
        max_file_size == 0 || self.total + self.longest_entry <= max_file_size
    }
}

impl Default for SizeBudget {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::sitemap::entry::ChangeFrequency;

    fn full_entry() -> Entry {
        Entry::new("https://example.com/news/today", ChangeFrequency::Daily)
            .unwrap()
            .with_lastmod(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
            .with_priority(0.5)
            .unwrap()
    }

    #[test]
    fn test_entry_cost_full_entry() {
        // <url><loc>…</loc><lastmod>2024-01-15</lastmod><changefreq>daily</changefreq><priority>0.5</priority></url>
        let entry = full_entry();
        let url_len = entry.url().as_str().len();
        assert_eq!(
            SizeBudget::entry_cost(&entry),
            5 + 6 + 11 + url_len + 29 + 25 + "daily".len() + 24
        );
    }

    #[test]
    fn test_entry_cost_minimal_entry() {
        let entry = Entry::new("https://example.com/a", ChangeFrequency::Never).unwrap();
        let url_len = entry.url().as_str().len();
        assert_eq!(
            SizeBudget::entry_cost(&entry),
            5 + 6 + 11 + url_len + 25 + "never".len()
        );
    }

    #[test]
    fn test_entry_cost_charges_escaped_url_text() {
        let entry = Entry::new(
            "https://example.com/search?q=a&lang=en",
            ChangeFrequency::Weekly,
        )
        .unwrap();
        let plain = Entry::new(
            "https://example.com/search?q=a-lang=en",
            ChangeFrequency::Weekly,
        )
        .unwrap();
        // '&' escapes to '&amp;', four extra bytes over the unescaped form.
        assert_eq!(
            SizeBudget::entry_cost(&entry),
            SizeBudget::entry_cost(&plain) + 4
        );
    }

    #[test]
    fn test_new_covers_full_document_overhead() {
        // 38 bytes of declaration + 61 of root open + 9 of root close.
        assert!(SizeBudget::new().total() >= 108);
    }

    #[test]
    fn test_record_tracks_longest_entry() {
        let mut budget = SizeBudget::new();
        let base = budget.total();
        budget.record(100);
        budget.record(250);
        budget.record(80);
        assert_eq!(budget.total(), base + 430);
        assert_eq!(budget.longest_entry(), 250);
    }

    #[test]
    fn test_has_headroom() {
        let mut budget = SizeBudget::new();
        budget.record(100);
        let total = budget.total();
        assert!(budget.has_headroom(0));
        assert!(budget.has_headroom(total + 100));
        assert!(!budget.has_headroom(total + 99));
    }
}
