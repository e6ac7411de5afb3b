// GNU Affero General Public License v3.0 or later (see LICENSE or https://www.gnu.org/licenses/agpl.txt)
//! Version parsing, validation and ordering
//!
//! This module provides the [`Version`] value type used for both target PHP
//! versions and requirement milestones. Versions follow the
//! `major.minor.patch[-prerelease][+build]` layout. Ordering only looks at
//! the three numeric components; pre-release and build labels are kept for
//! display. Requirement checks use [`Version::cmp_precedence`], which also
//! ranks a pre-release below its release.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An immutable `major.minor.patch[-prerelease][+build]` version
///
/// Equality, hashing and ordering use `(major, minor, patch)` only, so
/// `5.3.0-beta` and `5.3.0+20160101` compare equal to `5.3.0`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
    major: u64,
    minor: u64,
    patch: u64,
    pre_release: String,
    build: String,
}

/// Loosely typed input accepted by [`Version::from_input`]
///
/// Absent input means `0.0.0`, numbers are coerced to their decimal form and
/// everything then goes through the single strict parse path.
#[derive(Debug, Clone)]
pub enum VersionInput {
    Absent,
    Number(i64),
    Text(String),
    Version(Version),
}

impl Version {
    /// Create a release version with no pre-release or build label
    #[must_use]
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            pre_release: String::new(),
            build: String::new(),
        }
    }

    /// Parse and validate a version string
    ///
    /// With `partial` set, a missing minor or patch component defaults to
    /// `0`. Without it, both must be present.
    ///
    /// # Arguments
    /// * `text` - Version string, surrounding whitespace is ignored
    /// * `partial` - Whether to accept `5` or `5.3` as shorthand
    ///
    /// # Errors
    /// Returns [`Error::InvalidVersion`] when the string does not match the
    /// version layout, or when a component is missing in non-partial mode
    ///
    /// # Examples
    /// ```
    /// use phpfeature::Version;
    ///
    /// let version = Version::parse("5.3", true).unwrap();
    /// assert_eq!(version.to_string(), "5.3.0");
    /// assert!(Version::parse("5.3", false).is_err());
    /// assert!(Version::parse("1.2.3.4", true).is_err());
    /// ```
    pub fn parse(text: &str, partial: bool) -> Result<Self> {
        let text = text.trim();

        let (rest, build) = text.split_once('+').unwrap_or((text, ""));
        let (core, pre_release) = rest.split_once('-').unwrap_or((rest, ""));
        check_label(text, pre_release, "pre-release")?;
        check_label(text, build, "build metadata")?;

        let parts: Vec<&str> = core.split('.').collect();
        if parts.len() > 3 {
            return Err(Error::invalid_version(
                text,
                "expected at most three numeric components",
            ));
        }

        let mut numbers = parts
            .iter()
            .map(|part| parse_component(text, part))
            .collect::<Result<Vec<u64>>>()?;

        if !partial && numbers.len() < 3 {
            return Err(Error::invalid_version(
                text,
                "could not accept partial version, requested full versions only",
            ));
        }
        numbers.resize(3, 0);

        Ok(Self {
            major: numbers[0],
            minor: numbers[1],
            patch: numbers[2],
            pre_release: pre_release.to_string(),
            build: build.to_string(),
        })
    }

    /// Build a version from a string, number, existing version or nothing
    ///
    /// # Errors
    /// Returns [`Error::InvalidVersion`] when the normalized text fails to parse
    ///
    /// # Examples
    /// ```
    /// use phpfeature::Version;
    ///
    /// assert_eq!(Version::from_input(None::<&str>, false).unwrap().to_string(), "0.0.0");
    /// assert_eq!(Version::from_input(7, true).unwrap().to_string(), "7.0.0");
    /// ```
    pub fn from_input(input: impl Into<VersionInput>, partial: bool) -> Result<Self> {
        match input.into() {
            VersionInput::Absent => Ok(Self::default()),
            VersionInput::Number(number) => Self::parse(&number.to_string(), partial),
            VersionInput::Text(text) => Self::parse(&text, partial),
            VersionInput::Version(version) => Ok(version),
        }
    }

    #[must_use]
    pub fn major(&self) -> u64 {
        self.major
    }

    #[must_use]
    pub fn minor(&self) -> u64 {
        self.minor
    }

    #[must_use]
    pub fn patch(&self) -> u64 {
        self.patch
    }

    /// Pre-release label, empty when absent
    #[must_use]
    pub fn pre_release(&self) -> &str {
        &self.pre_release
    }

    /// Build metadata, empty when absent
    #[must_use]
    pub fn build(&self) -> &str {
        &self.build
    }

    /// Whether all three numeric components are zero
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.major == 0 && self.minor == 0 && self.patch == 0
    }

    /// Ordering used when checking a version against a requirement
    ///
    /// Like [`Ord`], except that a pre-release ranks below the release with
    /// the same numbers. Build metadata is ignored and two pre-releases of
    /// the same numbers compare equal.
    ///
    /// # Examples
    /// ```
    /// use std::cmp::Ordering;
    /// use phpfeature::Version;
    ///
    /// let beta = Version::parse("5.3.0-beta", false).unwrap();
    /// let release = Version::new(5, 3, 0);
    /// assert_eq!(beta.cmp(&release), Ordering::Equal);
    /// assert_eq!(beta.cmp_precedence(&release), Ordering::Less);
    /// ```
    #[must_use]
    pub fn cmp_precedence(&self, other: &Self) -> Ordering {
        self.cmp(other).then_with(|| {
            match (self.pre_release.is_empty(), other.pre_release.is_empty()) {
                (false, true) => Ordering::Less,
                (true, false) => Ordering::Greater,
                _ => Ordering::Equal,
            }
        })
    }

    fn key(&self) -> (u64, u64, u64) {
        (self.major, self.minor, self.patch)
    }
}

fn parse_component(text: &str, part: &str) -> Result<u64> {
    if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::invalid_version(
            text,
            format!("\"{part}\" is not a numeric component"),
        ));
    }
    part.parse::<u64>()
        .map_err(|e| Error::invalid_version(text, format!("component \"{part}\": {e}")))
}

fn check_label(text: &str, label: &str, what: &str) -> Result<()> {
    if label
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        Ok(())
    } else {
        Err(Error::invalid_version(
            text,
            format!("{what} \"{label}\" may only contain [0-9A-Za-z-]"),
        ))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if !self.pre_release.is_empty() {
            write!(f, "-{}", self.pre_release)?;
        }
        if !self.build.is_empty() {
            write!(f, "+{}", self.build)?;
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s, false)
    }
}

impl TryFrom<String> for Version {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value, false)
    }
}

impl From<Version> for String {
    fn from(version: Version) -> Self {
        version.to_string()
    }
}

impl From<&str> for VersionInput {
    fn from(text: &str) -> Self {
        VersionInput::Text(text.to_string())
    }
}

impl From<String> for VersionInput {
    fn from(text: String) -> Self {
        VersionInput::Text(text)
    }
}

impl From<i32> for VersionInput {
    fn from(number: i32) -> Self {
        VersionInput::Number(i64::from(number))
    }
}

impl From<i64> for VersionInput {
    fn from(number: i64) -> Self {
        VersionInput::Number(number)
    }
}

impl From<u32> for VersionInput {
    fn from(number: u32) -> Self {
        VersionInput::Number(i64::from(number))
    }
}

impl From<Version> for VersionInput {
    fn from(version: Version) -> Self {
        VersionInput::Version(version)
    }
}

impl<T: Into<VersionInput>> From<Option<T>> for VersionInput {
    fn from(input: Option<T>) -> Self {
        input.map_or(VersionInput::Absent, Into::into)
    }
}

/// Extract the leading version number from command output
///
/// Returns the first run of digits and dots, which strips distribution
/// suffixes such as `-1ubuntu2.14` from interpreter output.
///
/// # Examples
/// ```
/// use phpfeature::version::extract_version_number;
/// assert_eq!(extract_version_number("8.1.2"), "8.1.2");
/// assert_eq!(extract_version_number("8.1.2-1ubuntu2.14"), "8.1.2");
/// assert_eq!(extract_version_number("7.4.33\n"), "7.4.33");
/// ```
#[must_use]
pub fn extract_version_number(version_output: &str) -> &str {
    let trimmed = version_output.trim();
    trimmed
        .split(|c: char| !c.is_ascii_digit() && c != '.')
        .next()
        .unwrap_or(trimmed)
}
