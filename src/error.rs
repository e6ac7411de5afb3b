// GNU Affero General Public License v3.0 or later (see LICENSE or https://www.gnu.org/licenses/agpl.txt)
//! Error types shared by the library modules

use thiserror::Error;

/// Convenience alias used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while parsing versions, evaluating requirements or loading data
#[derive(Error, Debug)]
pub enum Error {
    /// A version string did not match `major[.minor[.patch]][-pre][+build]`
    #[error("Failed to validate version \"{input}\": {reason}")]
    InvalidVersion { input: String, reason: String },

    /// A requirement expression could not be split into operator and milestone
    #[error("Could not parse the requirement \"{input}\": {reason}")]
    InvalidRequirement { input: String, reason: String },

    /// Input had the wrong shape (blank feature name, malformed registry entry)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Boundary search ran off the end of the release catalog
    #[error("No known release satisfies the requirement \"{requirement}\"")]
    Unsatisfiable { requirement: String },

    /// The operator has no single boundary version
    #[error("Resolving a minimum version is not implemented for operator \"{operator}\"")]
    NotImplemented { operator: String },

    /// The running PHP interpreter could not be located or queried
    #[error("Platform detection failed: {0}")]
    Platform(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error came from parsing a version or requirement string
    #[must_use]
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidVersion { .. } | Error::InvalidRequirement { .. }
        )
    }

    pub(crate) fn invalid_version(input: &str, reason: impl Into<String>) -> Self {
        Error::InvalidVersion {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_requirement(input: &str, reason: impl Into<String>) -> Self {
        Error::InvalidRequirement {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}
