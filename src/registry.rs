// GNU Affero General Public License v3.0 or later (see LICENSE or https://www.gnu.org/licenses/agpl.txt)
//! Registry of known features and their version requirements
//!
//! Each feature name maps to one or more requirement expressions that must
//! all hold. The resolver only needs the read-only [`CapabilityRegistry`]
//! view; [`FeatureMap`] is the ordered-map implementation backing the
//! bundled registry and user-supplied JSON files.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::{Error, Result};

const BUILTIN_FEATURES: &str = include_str!("../data/known_features.json");

/// Read-only lookup of feature requirements
pub trait CapabilityRegistry {
    /// Requirement expressions of a feature, `None` when the name is unknown
    fn requirements_for(&self, name: &str) -> Option<&[String]>;

    fn has_capability(&self, name: &str) -> bool {
        self.requirements_for(name).is_some()
    }
}

impl<T: CapabilityRegistry + ?Sized> CapabilityRegistry for &T {
    fn requirements_for(&self, name: &str) -> Option<&[String]> {
        (**self).requirements_for(name)
    }
}

/// Feature registry backed by an ordered map
#[derive(Debug, Clone, Default)]
pub struct FeatureMap {
    features: BTreeMap<String, Vec<String>>,
}

impl FeatureMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bundled registry of PHP language features
    ///
    /// # Errors
    /// Returns error if the bundled data fails to decode
    pub fn builtin() -> Result<Self> {
        Self::from_json_str(BUILTIN_FEATURES)
    }

    /// Decode a registry from a JSON object
    ///
    /// Values are either a single requirement string or a non-empty list of
    /// requirement strings.
    ///
    /// # Errors
    /// Returns [`Error::Json`] for invalid JSON and [`Error::InvalidArgument`]
    /// when the document or one of its entries has the wrong shape
    ///
    /// # Examples
    /// ```
    /// use phpfeature::{CapabilityRegistry, FeatureMap};
    ///
    /// let map = FeatureMap::from_json_str(r#"{"enums": ">=8.1", "each": ["<8"]}"#).unwrap();
    /// assert!(map.has_capability("enums"));
    /// assert_eq!(map.requirements_for("each").unwrap(), ["<8"]);
    /// ```
    pub fn from_json_str(content: &str) -> Result<Self> {
        let document: Value = serde_json::from_str(content)?;
        let Value::Object(entries) = document else {
            return Err(Error::InvalidArgument(
                "feature registry must be a JSON object".to_string(),
            ));
        };

        let mut map = Self::new();
        for (name, value) in entries {
            let requirements = requirement_list(&name, value)?;
            map.features.insert(name, requirements);
        }
        Ok(map)
    }

    /// Load a registry file from disk
    ///
    /// # Errors
    /// Returns error if the file cannot be read or decoded
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Add or replace a feature
    pub fn insert<I, S>(&mut self, name: impl Into<String>, requirements: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.features.insert(
            name.into(),
            requirements.into_iter().map(Into::into).collect(),
        );
    }

    /// Builder-style [`FeatureMap::insert`]
    #[must_use]
    pub fn with<I, S>(mut self, name: impl Into<String>, requirements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(name, requirements);
        self
    }

    /// Feature names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.features.keys().map(String::as_str)
    }

    /// Features and their requirements in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.features
            .iter()
            .map(|(name, requirements)| (name.as_str(), requirements.as_slice()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl CapabilityRegistry for FeatureMap {
    fn requirements_for(&self, name: &str) -> Option<&[String]> {
        self.features.get(name).map(Vec::as_slice)
    }
}

fn requirement_list(name: &str, value: Value) -> Result<Vec<String>> {
    let shape_error = || {
        Error::InvalidArgument(format!(
            "requirements for \"{name}\" must be a string or a non-empty list of strings"
        ))
    };

    match value {
        Value::String(requirement) => Ok(vec![requirement]),
        Value::Array(items) if !items.is_empty() => items
            .into_iter()
            .map(|item| match item {
                Value::String(requirement) => Ok(requirement),
                _ => Err(shape_error()),
            })
            .collect(),
        _ => Err(shape_error()),
    }
}
