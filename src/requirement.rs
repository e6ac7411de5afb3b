// GNU Affero General Public License v3.0 or later (see LICENSE or https://www.gnu.org/licenses/agpl.txt)
//! Requirement expressions such as `>=5.3.0` or `lt7`
//!
//! A requirement is an optional comparison operator immediately followed by a
//! version milestone. The milestone is parsed in partial mode, so `>5` means
//! "greater than 5.0.0". Besides checking a version against the requirement,
//! this module computes the boundary version: the lowest known release that
//! satisfies the requirement, looked up in a [`ReleaseCatalog`].

use std::cmp::Ordering;
use std::fmt;

use tracing::debug;

use crate::catalog::ReleaseCatalog;
use crate::error::{Error, Result};
use crate::version::Version;

/// Comparison operator of a requirement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Equal,
    NotEqual,
}

/// Recognized tokens, longest first so `<=` wins over `<` and `<>`
const OPERATOR_TOKENS: &[(&str, Operator)] = &[
    ("<=", Operator::LessThanOrEqual),
    (">=", Operator::GreaterThanOrEqual),
    ("==", Operator::Equal),
    ("!=", Operator::NotEqual),
    ("<>", Operator::NotEqual),
    ("lt", Operator::LessThan),
    ("le", Operator::LessThanOrEqual),
    ("gt", Operator::GreaterThan),
    ("ge", Operator::GreaterThanOrEqual),
    ("eq", Operator::Equal),
    ("ne", Operator::NotEqual),
    ("<", Operator::LessThan),
    (">", Operator::GreaterThan),
    ("=", Operator::Equal),
];

impl Operator {
    /// Look up an operator by symbol or word alias
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        OPERATOR_TOKENS
            .iter()
            .find(|(candidate, _)| *candidate == token)
            .map(|(_, operator)| *operator)
    }

    /// Canonical symbol used when displaying a requirement
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::GreaterThan => ">",
            Operator::GreaterThanOrEqual => ">=",
            Operator::LessThan => "<",
            Operator::LessThanOrEqual => "<=",
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
        }
    }

    /// Every accepted operator token
    #[must_use]
    pub fn supported_tokens() -> Vec<&'static str> {
        OPERATOR_TOKENS.iter().map(|(token, _)| *token).collect()
    }

    /// Whether an ordering of `version` relative to the milestone satisfies this operator
    #[must_use]
    pub fn accepts(self, ordering: Ordering) -> bool {
        match self {
            Operator::GreaterThan => ordering == Ordering::Greater,
            Operator::GreaterThanOrEqual => ordering != Ordering::Less,
            Operator::LessThan => ordering == Ordering::Less,
            Operator::LessThanOrEqual => ordering != Ordering::Greater,
            Operator::Equal => ordering == Ordering::Equal,
            Operator::NotEqual => ordering != Ordering::Equal,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// One parsed requirement: operator plus milestone version
#[derive(Debug, Clone)]
pub struct Requirement {
    operator: Operator,
    milestone: Version,
    source: String,
}

impl Requirement {
    /// Parse a requirement expression
    ///
    /// The operator defaults to `>=` when the expression starts with a digit.
    /// No whitespace is allowed between operator and milestone.
    ///
    /// # Errors
    /// Returns [`Error::InvalidRequirement`] for an unknown operator or a
    /// milestone that does not start with a digit, and
    /// [`Error::InvalidVersion`] when the milestone itself is malformed
    ///
    /// # Examples
    /// ```
    /// use phpfeature::{Operator, Requirement};
    ///
    /// let requirement = Requirement::parse(" gt5 ").unwrap();
    /// assert_eq!(requirement.operator(), Operator::GreaterThan);
    /// assert_eq!(requirement.milestone().to_string(), "5.0.0");
    /// assert!(Requirement::parse(">= 5.3").is_err());
    /// ```
    pub fn parse(expression: &str) -> Result<Self> {
        let source = expression.trim();

        let (operator, milestone_text) = OPERATOR_TOKENS
            .iter()
            .find_map(|(token, operator)| {
                source
                    .strip_prefix(*token)
                    .map(|rest| (*operator, rest))
            })
            .unwrap_or((Operator::GreaterThanOrEqual, source));

        if !milestone_text.starts_with(|c: char| c.is_ascii_digit()) {
            let reason = if milestone_text.len() < source.len() {
                "the version milestone must start with a digit".to_string()
            } else {
                format!(
                    "unrecognized operator, expected one of: {}",
                    Operator::supported_tokens().join(", ")
                )
            };
            return Err(Error::invalid_requirement(source, reason));
        }

        let milestone = Version::parse(milestone_text, true)?;

        Ok(Self {
            operator,
            milestone,
            source: source.to_string(),
        })
    }

    #[must_use]
    pub fn operator(&self) -> Operator {
        self.operator
    }

    #[must_use]
    pub fn milestone(&self) -> &Version {
        &self.milestone
    }

    /// Trimmed expression this requirement was parsed from
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Check a version against this requirement
    ///
    /// Pre-releases rank below their release here, so `5.3.0-beta` does not
    /// satisfy `>=5.3.0`.
    #[must_use]
    pub fn is_satisfied_by(&self, version: &Version) -> bool {
        self.operator.accepts(version.cmp_precedence(&self.milestone))
    }

    /// Lowest version that satisfies this requirement
    ///
    /// Inequalities resolve to concrete releases from the catalog. Upper
    /// bounds keep `current` when it already satisfies them.
    ///
    /// # Arguments
    /// * `current` - Version currently targeted
    /// * `catalog` - Known releases in ascending order
    ///
    /// # Errors
    /// Returns [`Error::Unsatisfiable`] when no known release lies on the
    /// accepted side of the milestone, and [`Error::NotImplemented`] for `!=`
    pub fn boundary<C>(&self, current: &Version, catalog: &C) -> Result<Version>
    where
        C: ReleaseCatalog + ?Sized,
    {
        let releases = catalog.releases();
        let milestone = &self.milestone;

        let found = match self.operator {
            Operator::Equal => Some(milestone.clone()),
            Operator::NotEqual => {
                return Err(Error::NotImplemented {
                    operator: self.operator.symbol().to_string(),
                });
            }
            Operator::GreaterThan => {
                let index = releases.partition_point(|release| release.version <= *milestone);
                releases.get(index).map(|release| release.version.clone())
            }
            Operator::GreaterThanOrEqual => {
                if catalog.contains(milestone) {
                    Some(milestone.clone())
                } else {
                    let index = releases.partition_point(|release| release.version < *milestone);
                    releases.get(index).map(|release| release.version.clone())
                }
            }
            Operator::LessThan => {
                if current < milestone {
                    Some(current.clone())
                } else {
                    let index = releases.partition_point(|release| release.version < *milestone);
                    index
                        .checked_sub(1)
                        .map(|last| releases[last].version.clone())
                }
            }
            Operator::LessThanOrEqual => {
                if current <= milestone {
                    Some(current.clone())
                } else {
                    let index = releases.partition_point(|release| release.version <= *milestone);
                    index
                        .checked_sub(1)
                        .map(|last| releases[last].version.clone())
                }
            }
        };

        let boundary = found.ok_or_else(|| Error::Unsatisfiable {
            requirement: self.source.clone(),
        })?;
        debug!(requirement = %self, current = %current, %boundary, "resolved boundary");
        Ok(boundary)
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.operator, self.milestone)
    }
}
