// GNU Affero General Public License v3.0 or later (see LICENSE or https://www.gnu.org/licenses/agpl.txt)
//! Detection of the PHP version installed on this machine
//!
//! When no target version is given, features are checked against the PHP
//! interpreter found on `PATH` (or named by `PHPFEATURE_PHP`).

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::error::{Error, Result};
use crate::version::{Version, extract_version_number};

/// Environment variable naming the PHP interpreter to query
pub const PHP_BINARY_ENV: &str = "PHPFEATURE_PHP";

/// Interpreter name looked up on `PATH`
pub const PHP_BINARY_NAME: &str = "php";

/// Locate the PHP interpreter
///
/// # Errors
/// Returns [`Error::Platform`] when `PHPFEATURE_PHP` is unset and no `php`
/// executable is on `PATH`
pub fn find_php_binary() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(PHP_BINARY_ENV)
        && !path.trim().is_empty()
    {
        debug!("using PHP interpreter from {PHP_BINARY_ENV}: {path}");
        return Ok(PathBuf::from(path));
    }

    which::which(PHP_BINARY_NAME)
        .map_err(|e| Error::Platform(format!("could not find '{PHP_BINARY_NAME}' in PATH: {e}")))
}

/// Ask a PHP interpreter for its version
///
/// Runs `<binary> -r 'echo PHP_VERSION;'` and parses the output in partial
/// mode after stripping distribution suffixes.
///
/// # Errors
/// Returns [`Error::Platform`] when the interpreter cannot be run or exits
/// unsuccessfully, and [`Error::InvalidVersion`] for unparseable output
pub fn query_php_version(binary: &Path) -> Result<Version> {
    let output = Command::new(binary)
        .args(["-r", "echo PHP_VERSION;"])
        .output()
        .map_err(|e| Error::Platform(format!("failed to run {}: {e}", binary.display())))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::Platform(format!(
            "{} exited with {}: {}",
            binary.display(),
            output.status,
            stderr.trim()
        )));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let version = Version::parse(extract_version_number(&stdout), true)?;
    debug!("{} reports PHP {version}", binary.display());
    Ok(version)
}

/// Version of the PHP interpreter installed on this machine
///
/// # Errors
/// See [`find_php_binary`] and [`query_php_version`]
pub fn detect_php_version() -> Result<Version> {
    query_php_version(&find_php_binary()?)
}
