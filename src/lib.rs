// GNU Affero General Public License v3.0 or later (see LICENSE or https://www.gnu.org/licenses/agpl.txt)
//! PHP Feature Support Library
//!
//! This library answers whether a PHP version supports a named language
//! feature (or set of features) and, if not, which version is the lowest one
//! that would. It provides strict version parsing, requirement expressions,
//! a feature registry, a release catalog and the resolver combining them.

pub mod catalog;
pub mod config;
pub mod error;
pub mod platform;
pub mod registry;
pub mod requirement;
pub mod resolver;
pub mod version;

// Re-export commonly used items at the crate root for convenience
pub use catalog::{Release, ReleaseCatalog, ReleaseList, format_catalog_age};
pub use error::{Error, Result};
pub use registry::{CapabilityRegistry, FeatureMap};
pub use requirement::{Operator, Requirement};
pub use resolver::{Capabilities, Resolver};
pub use version::{Version, VersionInput, extract_version_number};
