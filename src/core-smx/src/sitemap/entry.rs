//! Page entries destined for a sitemap.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use url::Url;

use crate::sitemap::errors::{Result, SiteMapError};

/// How frequently a page is expected to change.
///
/// Serialized as one of the seven lowercase tokens the sitemap schema
/// permits. Search engines treat these as hints, not guarantees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFrequency {
    /// The page changes every time it is accessed.
    Always,
    /// The page changes hourly.
    Hourly,
    /// The page changes daily.
    Daily,
    /// The page changes weekly.
    Weekly,
    /// The page changes monthly.
    Monthly,
    /// The page changes yearly.
    Yearly,
    /// The page is archived and will not change.
    Never,
}

impl ChangeFrequency {
    /// The lowercase wire token for this frequency.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Never => "never",
        }
    }
}

impl fmt::Display for ChangeFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeFrequency {
    type Err = SiteMapError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "always" => Ok(Self::Always),
            "hourly" => Ok(Self::Hourly),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            "never" => Ok(Self::Never),
            _ => Err(SiteMapError::Parse(format!("invalid changefreq value: {s}"))),
        }
    }
}

/// One page reference destined for a sitemap. Immutable once constructed.
///
/// The URL is validated to be an absolute URI at construction, before any
/// bytes are written. `lastmod` and `priority` are omitted from output when
/// unset; a priority of zero is also omitted.
///
/// A pending collection of entries is a plain `Vec<Entry>` used as a stack:
/// the writer pops from the back, so the most recently pushed entry
/// serializes first. Callers that need document order to match their input
/// order must reverse before handing the vec over.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    url: Url,
    lastmod: Option<NaiveDate>,
    changefreq: ChangeFrequency,
    priority: Option<f64>,
}

impl Entry {
    /// Creates an entry for `url`, which must parse as an absolute URI.
    ///
    /// # Errors
    ///
    /// Returns [`SiteMapError::InvalidUrl`] when `url` is empty, relative,
    /// or otherwise malformed.
    pub fn new(url: &str, changefreq: ChangeFrequency) -> Result<Self> {
        let url = Url::parse(url)?;
        Ok(Self {
            url,
            lastmod: None,
            changefreq,
            priority: None,
        })
    }

    /// Sets the last-modified date emitted for this entry.
    pub fn with_lastmod(mut self, date: NaiveDate) -> Self {
        self.lastmod = Some(date);
        self
    }

    /// Sets the relative priority of this page.
    ///
    /// # Errors
    ///
    /// Returns [`SiteMapError::PriorityOutOfRange`] unless
    /// `0.0 <= priority <= 1.0`.
    pub fn with_priority(mut self, priority: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&priority) {
            return Err(SiteMapError::PriorityOutOfRange(priority));
        }
        self.priority = Some(priority);
        Ok(self)
    }

    /// The page URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Last-modified date, if one was supplied.
    pub fn lastmod(&self) -> Option<NaiveDate> {
        self.lastmod
    }

    /// Change frequency hint.
    pub fn changefreq(&self) -> ChangeFrequency {
        self.changefreq
    }

    /// Priority, if one was supplied.
    pub fn priority(&self) -> Option<f64> {
        self.priority
    }

    /// Priority as it will be emitted: values of zero are suppressed.
    pub(crate) fn effective_priority(&self) -> Option<f64> {
        self.priority.filter(|p| *p > 0.0)
    }
}
