// GNU Affero General Public License v3.0 or later (see LICENSE or https://www.gnu.org/licenses/agpl.txt)
//! Feature support checks and minimum version resolution
//!
//! The [`Resolver`] ties a target version to a feature registry and answers
//! two questions: does the target support every requested feature, and what
//! is the lowest version that would.
//!
//! Unknown feature names are treated differently by the two operations. A
//! support check counts them as unsupported, while the minimum-version
//! computation ignores them so they never raise the floor.

use tracing::debug;

use crate::catalog::ReleaseCatalog;
use crate::error::{Error, Result};
use crate::platform;
use crate::registry::CapabilityRegistry;
use crate::requirement::Requirement;
use crate::version::{Version, VersionInput};

/// Feature names requested in a single call
///
/// Built from a single name or any list of names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capabilities(Vec<String>);

impl Capabilities {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn validate(&self) -> Result<()> {
        match self.0.iter().find(|name| name.trim().is_empty()) {
            Some(name) => Err(Error::InvalidArgument(format!(
                "feature names must not be blank, got \"{name}\""
            ))),
            None => Ok(()),
        }
    }
}

impl From<&str> for Capabilities {
    fn from(name: &str) -> Self {
        Self(vec![name.to_string()])
    }
}

impl From<String> for Capabilities {
    fn from(name: String) -> Self {
        Self(vec![name])
    }
}

impl From<&[&str]> for Capabilities {
    fn from(names: &[&str]) -> Self {
        Self(names.iter().map(ToString::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Capabilities {
    fn from(names: [&str; N]) -> Self {
        Self(names.iter().map(ToString::to_string).collect())
    }
}

impl From<Vec<&str>> for Capabilities {
    fn from(names: Vec<&str>) -> Self {
        Self(names.into_iter().map(ToString::to_string).collect())
    }
}

impl From<&[String]> for Capabilities {
    fn from(names: &[String]) -> Self {
        Self(names.to_vec())
    }
}

impl From<Vec<String>> for Capabilities {
    fn from(names: Vec<String>) -> Self {
        Self(names)
    }
}

/// Checks features against a fixed target version
#[derive(Debug, Clone)]
pub struct Resolver<R> {
    registry: R,
    target: Version,
}

impl<R: CapabilityRegistry> Resolver<R> {
    /// Create a resolver for an already parsed target version
    #[must_use]
    pub fn new(target: Version, registry: R) -> Self {
        Self { registry, target }
    }

    /// Create a resolver from a loosely typed target
    ///
    /// Strings and numbers are parsed in partial mode, so `"5.3"` and `7` are
    /// accepted. An absent target means the version of the PHP interpreter
    /// installed on this machine.
    ///
    /// # Errors
    /// Returns [`Error::InvalidVersion`] for a malformed target and
    /// [`Error::Platform`] when an absent target cannot be detected
    pub fn with_target(target: impl Into<VersionInput>, registry: R) -> Result<Self> {
        let target = match target.into() {
            VersionInput::Absent => platform::detect_php_version()?,
            other => Version::from_input(other, true)?,
        };
        Ok(Self::new(target, registry))
    }

    /// Create a resolver targeting the installed PHP interpreter
    ///
    /// # Errors
    /// Returns [`Error::Platform`] when the interpreter cannot be found or queried
    pub fn for_platform(registry: R) -> Result<Self> {
        Ok(Self::new(platform::detect_php_version()?, registry))
    }

    #[must_use]
    pub fn target(&self) -> &Version {
        &self.target
    }

    #[must_use]
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Whether the target supports every requested feature
    ///
    /// Unknown features count as unsupported. An empty request is supported.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] for a blank feature name and a parse
    /// error when a registry requirement is malformed
    pub fn is_supported(&self, capabilities: impl Into<Capabilities>) -> Result<bool> {
        let capabilities = capabilities.into();
        capabilities.validate()?;

        for name in capabilities.iter() {
            if !self.supports(name)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Requested features the target does not support, in request order
    ///
    /// # Errors
    /// Same conditions as [`Resolver::is_supported`]
    pub fn unsupported(&self, capabilities: impl Into<Capabilities>) -> Result<Vec<String>> {
        let capabilities = capabilities.into();
        capabilities.validate()?;

        let mut missing = Vec::new();
        for name in capabilities.iter() {
            if !self.supports(name)? {
                missing.push(name.to_string());
            }
        }
        Ok(missing)
    }

    /// Lowest version satisfying every requirement of every requested feature
    ///
    /// Unknown features are ignored. Returns `None` when no requirement
    /// raised the minimum above `0.0.0`.
    ///
    /// # Arguments
    /// * `capabilities` - Feature name or names
    /// * `catalog` - Known releases used to resolve inequality requirements
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] for a blank feature name, a parse
    /// error for a malformed requirement, [`Error::Unsatisfiable`] when a
    /// requirement has no matching release and [`Error::NotImplemented`] for
    /// `!=` requirements
    pub fn minimum_required<C>(
        &self,
        capabilities: impl Into<Capabilities>,
        catalog: &C,
    ) -> Result<Option<Version>>
    where
        C: ReleaseCatalog + ?Sized,
    {
        let capabilities = capabilities.into();
        capabilities.validate()?;

        let mut floor = Version::default();
        for name in capabilities.iter() {
            let Some(expressions) = self.registry.requirements_for(name) else {
                debug!(feature = name, "unknown feature does not raise the minimum");
                continue;
            };

            for expression in expressions {
                let requirement = Requirement::parse(expression)?;
                let boundary = requirement.boundary(&self.target, catalog)?;
                if boundary > floor {
                    floor = boundary;
                }
            }
        }

        debug!(minimum = %floor, "resolved minimum required version");
        Ok((!floor.is_zero()).then_some(floor))
    }

    fn supports(&self, name: &str) -> Result<bool> {
        if !self.registry.has_capability(name) {
            debug!(feature = name, "unknown feature");
            return Ok(false);
        }

        for expression in self.registry.requirements_for(name).unwrap_or_default() {
            let requirement = Requirement::parse(expression)?;
            if !requirement.is_satisfied_by(&self.target) {
                debug!(
                    feature = name,
                    %requirement,
                    target = %self.target,
                    "requirement not met"
                );
                return Ok(false);
            }
        }
        Ok(true)
    }
}
