// GNU Affero General Public License v3.0 or later (see LICENSE or https://www.gnu.org/licenses/agpl.txt)
//! Selection of the feature registry and release catalog in use
//!
//! Each data source is picked from, in order: an explicit path (command-line
//! flag), an environment variable, the per-user data directory (catalog only)
//! and finally the data bundled with the binary.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::catalog::ReleaseList;
use crate::error::{Error, Result};
use crate::registry::FeatureMap;

/// Environment variable pointing at a feature registry file
pub const FEATURES_ENV: &str = "PHPFEATURE_FEATURES";

/// Environment variable pointing at a release catalog file
pub const CATALOG_ENV: &str = "PHPFEATURE_CATALOG";

/// File name of the imported catalog inside the data directory
pub const CATALOG_FILE_NAME: &str = "releases.json";

/// Where a registry or catalog was loaded from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Path given on the command line
    Flag(PathBuf),
    /// Path taken from an environment variable
    Env(PathBuf),
    /// Catalog previously imported into the data directory
    DataDir(PathBuf),
    /// Data compiled into the binary
    Builtin,
}

impl Source {
    /// File to read, `None` for bundled data
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Source::Flag(path) | Source::Env(path) | Source::DataDir(path) => Some(path),
            Source::Builtin => None,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Flag(path) => write!(f, "{} (command line)", path.display()),
            Source::Env(path) => write!(f, "{} (environment)", path.display()),
            Source::DataDir(path) => write!(f, "{} (imported)", path.display()),
            Source::Builtin => f.write_str("built-in"),
        }
    }
}

/// Get the phpfeature data directory
///
/// Uses `$XDG_DATA_HOME` if set, otherwise falls back to `~/.local/share`.
/// The directory is not created.
///
/// # Errors
/// Returns error if neither `XDG_DATA_HOME` nor a home directory is available
pub fn get_data_dir() -> Result<PathBuf> {
    let data_base = match std::env::var("XDG_DATA_HOME") {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => home::home_dir()
            .ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "could not determine home directory",
                )
            })?
            .join(".local/share"),
    };
    Ok(data_base.join("phpfeature"))
}

/// Path of the imported catalog file, whether or not it exists
///
/// # Errors
/// Returns error if the data directory cannot be determined
pub fn get_catalog_file_path() -> Result<PathBuf> {
    Ok(get_data_dir()?.join(CATALOG_FILE_NAME))
}

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var_os(name)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Decide which registry to use
#[must_use]
pub fn features_source(flag: Option<&Path>) -> Source {
    if let Some(path) = flag {
        return Source::Flag(path.to_path_buf());
    }
    env_path(FEATURES_ENV).map_or(Source::Builtin, Source::Env)
}

/// Decide which release catalog to use
#[must_use]
pub fn catalog_source(flag: Option<&Path>) -> Source {
    if let Some(path) = flag {
        return Source::Flag(path.to_path_buf());
    }
    if let Some(path) = env_path(CATALOG_ENV) {
        return Source::Env(path);
    }
    match get_catalog_file_path() {
        Ok(path) if path.is_file() => Source::DataDir(path),
        _ => Source::Builtin,
    }
}

/// Load the feature registry from the selected source
///
/// # Errors
/// Returns error if the selected file cannot be read or decoded
pub fn load_features(flag: Option<&Path>) -> Result<(FeatureMap, Source)> {
    let source = features_source(flag);
    let features = match source.path() {
        Some(path) => FeatureMap::load(path)?,
        None => FeatureMap::builtin()?,
    };
    debug!("loaded {} features from {source}", features.len());
    Ok((features, source))
}

/// Load the release catalog from the selected source
///
/// # Errors
/// Returns error if the selected file cannot be read or decoded
pub fn load_catalog(flag: Option<&Path>) -> Result<(ReleaseList, Source)> {
    let source = catalog_source(flag);
    let catalog = match source.path() {
        Some(path) => ReleaseList::load(path)?,
        None => ReleaseList::builtin()?,
    };
    debug!("loaded {} releases from {source}", catalog.len());
    Ok((catalog, source))
}

/// Validate a catalog file and store it in the data directory
///
/// # Returns
/// Destination path and the imported catalog
///
/// # Errors
/// Returns error if the file cannot be decoded, holds no releases, or the
/// data directory cannot be written
pub fn import_catalog(path: &Path) -> Result<(PathBuf, ReleaseList)> {
    let catalog = ReleaseList::load(path)?;
    if catalog.is_empty() {
        return Err(Error::InvalidArgument(format!(
            "no releases found in {}",
            path.display()
        )));
    }

    let data_dir = get_data_dir()?;
    fs::create_dir_all(&data_dir)?;

    let destination = data_dir.join(CATALOG_FILE_NAME);
    catalog.save(&destination)?;
    debug!(
        "imported {} releases from {} into {}",
        catalog.len(),
        path.display(),
        destination.display()
    );
    Ok((destination, catalog))
}
