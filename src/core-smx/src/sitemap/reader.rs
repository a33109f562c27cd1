//! Pull-parsing of sitemap and sitemap index documents.
//!
//! The parsers are lenient: the namespace declaration is not required,
//! unknown elements are skipped, and malformed optional fields (`lastmod`,
//! `changefreq`, `priority`) degrade to `None` rather than failing the
//! whole document. Only structurally broken XML is an error.

use std::str::FromStr;

use chrono::NaiveDate;
use quick_xml::Reader;
use quick_xml::events::Event;

use crate::sitemap::DATE_FORMAT;
use crate::sitemap::entry::ChangeFrequency;
use crate::sitemap::errors::{Result, SiteMapError};

/// A `<url>` element read back from a sitemap document.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedUrl {
    /// The page URL.
    pub loc: String,
    /// Last-modified date, when present and well-formed.
    pub lastmod: Option<NaiveDate>,
    /// Change frequency, when present and one of the seven tokens.
    pub changefreq: Option<ChangeFrequency>,
    /// Priority, when present and numeric.
    pub priority: Option<f64>,
}

/// A `<sitemap>` element read back from a sitemap index document.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSiteMapRef {
    /// URL of the referenced sitemap document.
    pub loc: String,
    /// Last-modified date, when present and well-formed.
    pub lastmod: Option<NaiveDate>,
}

/// Parses sitemap XML into its `<url>` entries.
///
/// An empty `urlset` is valid and yields an empty vec.
///
/// # Errors
///
/// Returns an error if the XML is malformed.
pub fn parse_sitemap(xml: &str) -> Result<Vec<ParsedUrl>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut urls = Vec::new();
    let mut loc: Option<String> = None;
    let mut lastmod: Option<NaiveDate> = None;
    let mut changefreq: Option<ChangeFrequency> = None;
    let mut priority: Option<f64> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => match e.name().as_ref() {
                b"url" => {
                    loc = None;
                    lastmod = None;
                    changefreq = None;
                    priority = None;
                }
                b"loc" => loc = element_text(&mut reader, &mut buf, b"loc")?,
                b"lastmod" => {
                    lastmod = element_text(&mut reader, &mut buf, b"lastmod")?
                        .and_then(|s| NaiveDate::parse_from_str(&s, DATE_FORMAT).ok());
                }
                b"changefreq" => {
                    changefreq = element_text(&mut reader, &mut buf, b"changefreq")?
                        .and_then(|s| ChangeFrequency::from_str(&s).ok());
                }
                b"priority" => {
                    priority = element_text(&mut reader, &mut buf, b"priority")?
                        .and_then(|s| s.parse::<f64>().ok());
                }
                _ => {}
            },
            // A self-closing element carries no text; there is nothing to read.
            Event::Empty(ref e) => {
                if e.name().as_ref() == b"url" {
                    loc = None;
                    lastmod = None;
                    changefreq = None;
                    priority = None;
                }
            }
            Event::End(ref e) => {
                if e.name().as_ref() == b"url" {
                    if let Some(loc) = loc.take() {
                        urls.push(ParsedUrl {
                            loc,
                            lastmod: lastmod.take(),
                            changefreq: changefreq.take(),
                            priority: priority.take(),
                        });
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(urls)
}

/// Parses sitemap index XML into its `<sitemap>` references.
///
/// # Errors
///
/// Returns an error if the XML is malformed.
pub fn parse_sitemap_index(xml: &str) -> Result<Vec<ParsedSiteMapRef>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut sitemaps = Vec::new();
    let mut loc: Option<String> = None;
    let mut lastmod: Option<NaiveDate> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => match e.name().as_ref() {
                b"sitemap" => {
                    loc = None;
                    lastmod = None;
                }
                b"loc" => loc = element_text(&mut reader, &mut buf, b"loc")?,
                b"lastmod" => {
                    lastmod = element_text(&mut reader, &mut buf, b"lastmod")?
                        .and_then(|s| NaiveDate::parse_from_str(&s, DATE_FORMAT).ok());
                }
                _ => {}
            },
            Event::Empty(ref e) => {
                if e.name().as_ref() == b"sitemap" {
                    loc = None;
                    lastmod = None;
                }
            }
            Event::End(ref e) => {
                if e.name().as_ref() == b"sitemap" {
                    if let Some(loc) = loc.take() {
                        sitemaps.push(ParsedSiteMapRef {
                            loc,
                            lastmod: lastmod.take(),
                        });
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(sitemaps)
}

/// Reads the text content of the element whose start tag was just consumed,
/// up to and including its matching end tag. Returns `None` for an element
/// with no text (`<loc></loc>`); never consumes events past the end tag.
fn element_text(
    reader: &mut Reader<&[u8]>,
    buf: &mut Vec<u8>,
    end: &[u8],
) -> Result<Option<String>> {
    let mut text = None;
    loop {
        match reader.read_event_into(buf)? {
            Event::Text(t) => text = Some(t.unescape()?.into_owned()),
            Event::End(ref e) if e.name().as_ref() == end => break,
            Event::Eof => {
                return Err(SiteMapError::Parse(format!(
                    "unexpected end of document inside <{}>",
                    String::from_utf8_lossy(end)
                )));
            }
            _ => {}
        }
        buf.clear();
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sitemap() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url>
    <loc>https://example.com/page1</loc>
    <lastmod>2024-01-01</lastmod>
    <changefreq>daily</changefreq>
    <priority>0.5</priority>
  </url>
  <url>
    <loc>https://example.com/page2</loc>
    <changefreq>never</changefreq>
  </url>
</urlset>"#;

        let urls = parse_sitemap(xml).unwrap();
        assert_eq!(urls.len(), 2);
        assert_eq!(urls[0].loc, "https://example.com/page1");
        assert_eq!(urls[0].lastmod, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(urls[0].changefreq, Some(ChangeFrequency::Daily));
        assert_eq!(urls[0].priority, Some(0.5));
        assert_eq!(urls[1].loc, "https://example.com/page2");
        assert_eq!(urls[1].lastmod, None);
        assert_eq!(urls[1].changefreq, Some(ChangeFrequency::Never));
        assert_eq!(urls[1].priority, None);
    }

    #[test]
    fn test_parse_sitemap_empty_urlset_is_valid() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
</urlset>"#;
        assert!(parse_sitemap(xml).unwrap().is_empty());
    }

    #[test]
    fn test_parse_sitemap_unescapes_text() {
        let xml = "<urlset><url><loc>https://example.com/?a=1&amp;b=2</loc>\
                   <changefreq>weekly</changefreq></url></urlset>";
        let urls = parse_sitemap(xml).unwrap();
        assert_eq!(urls[0].loc, "https://example.com/?a=1&b=2");
    }

    #[test]
    fn test_parse_sitemap_tolerates_bad_optional_fields() {
        let xml = "<urlset><url><loc>https://example.com/x</loc>\
                   <lastmod>not-a-date</lastmod><changefreq>sometimes</changefreq>\
                   <priority>high</priority></url></urlset>";
        let urls = parse_sitemap(xml).unwrap();
        assert_eq!(urls.len(), 1);
        assert_eq!(urls[0].lastmod, None);
        assert_eq!(urls[0].changefreq, None);
        assert_eq!(urls[0].priority, None);
    }

    #[test]
    fn test_parse_sitemap_empty_loc_does_not_swallow_siblings() {
        // A self-closing <loc/> must not consume the following element, and
        // an entry without a usable loc is dropped while its neighbors
        // survive.
        let xml = "<urlset>\
                   <url><loc/><changefreq>daily</changefreq></url>\
                   <url><loc>https://example.com/b</loc><changefreq>weekly</changefreq></url>\
                   </urlset>";
        let urls = parse_sitemap(xml).unwrap();
        assert_eq!(urls.len(), 1);
        assert_eq!(urls[0].loc, "https://example.com/b");
        assert_eq!(urls[0].changefreq, Some(ChangeFrequency::Weekly));
    }

    #[test]
    fn test_parse_sitemap_empty_element_with_end_tag() {
        let xml = "<urlset><url><loc></loc><changefreq>daily</changefreq></url>\
                   <url><loc>https://example.com/x</loc></url></urlset>";
        let urls = parse_sitemap(xml).unwrap();
        assert_eq!(urls.len(), 1);
        assert_eq!(urls[0].loc, "https://example.com/x");
    }

    #[test]
    fn test_parse_sitemap_index_empty_loc_does_not_swallow_siblings() {
        let xml = "<sitemapindex>\
                   <sitemap><loc/></sitemap>\
                   <sitemap><loc>https://example.com/sitemap2.xml</loc></sitemap>\
                   </sitemapindex>";
        let sitemaps = parse_sitemap_index(xml).unwrap();
        assert_eq!(sitemaps.len(), 1);
        assert_eq!(sitemaps[0].loc, "https://example.com/sitemap2.xml");
    }

    #[test]
    fn test_parse_sitemap_rejects_malformed_xml() {
        assert!(parse_sitemap("<urlset><url></urlset>").is_err());
    }

    #[test]
    fn test_parse_sitemap_index() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <sitemap>
    <loc>https://example.com/sitemap1.xml</loc>
    <lastmod>2024-02-10</lastmod>
  </sitemap>
  <sitemap>
    <loc>https://example.com/sitemap2.xml</loc>
  </sitemap>
</sitemapindex>"#;

        let sitemaps = parse_sitemap_index(xml).unwrap();
        assert_eq!(sitemaps.len(), 2);
        assert_eq!(sitemaps[0].loc, "https://example.com/sitemap1.xml");
        assert_eq!(sitemaps[0].lastmod, NaiveDate::from_ymd_opt(2024, 2, 10));
        assert_eq!(sitemaps[1].lastmod, None);
    }
}
