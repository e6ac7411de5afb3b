// GNU Affero General Public License v3.0 or later (see LICENSE or https://www.gnu.org/licenses/agpl.txt)
//! Release catalog of known PHP versions
//!
//! Boundary searches for inequality requirements need the list of versions
//! that were actually released. This module defines the [`ReleaseCatalog`]
//! trait the resolver consumes and [`ReleaseList`], the default
//! implementation, which is loaded from bundled data or a JSON file.
//!
//! Two file formats are understood: the native format written by
//! [`ReleaseList::save`], and a dump of the php.net release index keyed by
//! version string.

use std::fs;
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::version::Version;

const BUILTIN_RELEASES: &str = include_str!("../data/releases.json");

/// Date format used by the php.net release index ("30 Jun 2009")
const PHP_NET_DATE_FORMAT: &str = "%d %b %Y";

/// A released version together with its release date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Release {
    /// Released version (e.g. "5.3.0")
    pub version: Version,
    /// Date of the release
    pub date: NaiveDate,
}

/// Ascending collection of known releases
///
/// Implementations must return releases sorted by version with no
/// duplicates, the boundary search relies on it.
pub trait ReleaseCatalog {
    fn releases(&self) -> &[Release];

    /// Whether `version` is itself a known release
    fn contains(&self, version: &Version) -> bool {
        self.releases()
            .binary_search_by(|release| release.version.cmp(version))
            .is_ok()
    }

    /// Most recent known release
    fn latest(&self) -> Option<&Release> {
        self.releases().last()
    }
}

impl<T: ReleaseCatalog + ?Sized> ReleaseCatalog for &T {
    fn releases(&self) -> &[Release] {
        (**self).releases()
    }
}

/// On-disk layout of a native catalog file
#[derive(Serialize, Deserialize)]
struct CatalogFile {
    releases: Vec<Release>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated: Option<DateTime<Utc>>,
}

/// Sorted, de-duplicated list of releases
#[derive(Debug, Clone, Default)]
pub struct ReleaseList {
    releases: Vec<Release>,
    updated: Option<DateTime<Utc>>,
}

impl ReleaseList {
    /// Build a catalog from releases in any order
    ///
    /// Releases are sorted by version. When two entries share a version the
    /// first one wins.
    #[must_use]
    pub fn new(mut releases: Vec<Release>) -> Self {
        releases.sort_by(|a, b| a.version.cmp(&b.version));
        releases.dedup_by(|later, earlier| later.version == earlier.version);
        Self {
            releases,
            updated: None,
        }
    }

    /// Bundled catalog of PHP minor releases
    ///
    /// # Errors
    /// Returns error if the bundled data fails to decode
    pub fn builtin() -> Result<Self> {
        Self::from_json_str(BUILTIN_RELEASES)
    }

    /// Decode a catalog from JSON in either supported format
    ///
    /// # Errors
    /// Returns [`Error::Json`] when the content is not valid JSON or an entry
    /// of the native format is malformed, and [`Error::InvalidArgument`] when
    /// the document matches neither format. Release index entries without a
    /// usable version or date are skipped with a warning.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let document: Value = serde_json::from_str(content)?;

        if document.get("releases").is_some() {
            let file: CatalogFile = serde_json::from_value(document)?;
            let mut list = Self::new(file.releases);
            list.updated = file.updated;
            return Ok(list);
        }

        // php.net release index, keyed by version; only the date is used
        let Value::Object(index) = document else {
            return Err(Error::InvalidArgument(
                "release catalog must be a JSON object".to_string(),
            ));
        };

        let mut releases = Vec::with_capacity(index.len());
        for (key, entry) in &index {
            let version = match Version::parse(key, false) {
                Ok(version) => version,
                Err(e) => {
                    warn!("skipping release {key}: {e}");
                    continue;
                }
            };
            let Some(date_text) = entry.get("date").and_then(Value::as_str) else {
                warn!("skipping release {key}: no release date");
                continue;
            };
            match NaiveDate::parse_from_str(date_text.trim(), PHP_NET_DATE_FORMAT) {
                Ok(date) => releases.push(Release { version, date }),
                Err(e) => warn!("skipping release {key}: bad date \"{date_text}\": {e}"),
            }
        }
        debug!("decoded {} releases from php.net index", releases.len());
        Ok(Self::new(releases))
    }

    /// Load a catalog file from disk
    ///
    /// # Errors
    /// Returns error if the file cannot be read or decoded
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Write the catalog in the native format, stamped with the current time
    ///
    /// # Errors
    /// Returns error if the file cannot be written
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = CatalogFile {
            releases: self.releases.clone(),
            updated: Some(Utc::now()),
        };
        let content = serde_json::to_string_pretty(&file)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Time the catalog file was last written, if recorded
    #[must_use]
    pub fn updated(&self) -> Option<&DateTime<Utc>> {
        self.updated.as_ref()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.releases.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.releases.is_empty()
    }
}

impl ReleaseCatalog for ReleaseList {
    fn releases(&self) -> &[Release] {
        &self.releases
    }
}

/// Format catalog age in human-readable format
///
/// # Returns
/// Human-readable age (e.g. "2h ago" or "30m ago")
#[must_use]
pub fn format_catalog_age(timestamp: &DateTime<Utc>) -> String {
    let now = Utc::now();
    let age = now.signed_duration_since(*timestamp);

    if age.num_days() > 0 {
        format!("{}d ago", age.num_days())
    } else if age.num_hours() > 0 {
        format!("{}h ago", age.num_hours())
    } else if age.num_minutes() > 0 {
        format!("{}m ago", age.num_minutes())
    } else {
        format!("{}s ago", age.num_seconds().max(0))
    }
}
