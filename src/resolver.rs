//! Mapping of graph field names onto entity member paths
//!
//! Discovery asks a [`PathResolver`] for the entity-side name of every field
//! it visits. The default resolver keeps names as they are;
//! [`MappedPathResolver`] consults a mapping profile so a schema can expose
//! names that differ from the entity it is backed by:
//!
//! ```rust,ignore
//! let profile = MappingProfile::from_yaml_str(r#"
//! mappings:
//!   - source_type: Room
//!     source_property_path: RoomDetail
//!     destination_type: RoomModel
//!     destination_property_path: Detail
//! "#)?;
//! let resolver = MappedPathResolver::new(profile);
//! assert_eq!(resolver.resolve("RoomModel", "Detail", None), "RoomDetail");
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Resolves a field of a source type to the member path on the backing entity.
///
/// Implementations must be pure: the same input always yields the same path,
/// and unknown input is returned unchanged rather than treated as an error.
pub trait PathResolver: Send + Sync {
    fn resolve(&self, source_type: &str, source_field: &str, destination_type: Option<&str>)
    -> String;
}

/// Identity resolver
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPathResolver;

impl PathResolver for DefaultPathResolver {
    fn resolve(&self, _source_type: &str, source_field: &str, _destination_type: Option<&str>) -> String {
        source_field.to_string()
    }
}

impl<F> PathResolver for F
where
    F: Fn(&str, &str, Option<&str>) -> String + Send + Sync,
{
    fn resolve(&self, source_type: &str, source_field: &str, destination_type: Option<&str>) -> String {
        self(source_type, source_field, destination_type)
    }
}

/// One member mapping between two types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingItem {
    pub source_type: String,
    pub source_property_path: String,
    pub destination_type: String,
    /// May be dotted to flatten a nested member (e.g. `RoomDetail.Beds`)
    pub destination_property_path: String,
}

impl MappingItem {
    pub fn new(
        source_type: impl Into<String>,
        source_property_path: impl Into<String>,
        destination_type: impl Into<String>,
        destination_property_path: impl Into<String>,
    ) -> Self {
        Self {
            source_type: source_type.into(),
            source_property_path: source_property_path.into(),
            destination_type: destination_type.into(),
            destination_property_path: destination_property_path.into(),
        }
    }

    fn reversed(&self) -> Self {
        Self {
            source_type: self.destination_type.clone(),
            source_property_path: self.destination_property_path.clone(),
            destination_type: self.source_type.clone(),
            destination_property_path: self.source_property_path.clone(),
        }
    }
}

/// A set of member mappings, typically maintained next to the object mapping
/// configuration of the application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingProfile {
    #[serde(default)]
    pub mappings: Vec<MappingItem>,
}

impl MappingProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mapping from an entity member to a model member.
    pub fn map(
        mut self,
        entity_type: impl Into<String>,
        entity_path: impl Into<String>,
        model_type: impl Into<String>,
        model_member: impl Into<String>,
    ) -> Self {
        self.mappings
            .push(MappingItem::new(entity_type, entity_path, model_type, model_member));
        self
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Invalid mapping profile YAML")
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid mapping profile JSON")
    }
}

/// Resolver backed by a [`MappingProfile`].
///
/// Every mapping is usable in both directions.
#[derive(Debug, Clone, Default)]
pub struct MappedPathResolver {
    mappings: Vec<MappingItem>,
}

impl MappedPathResolver {
    pub fn new(profile: MappingProfile) -> Self {
        let mut mappings = profile.mappings;
        let reversed: Vec<MappingItem> = mappings.iter().map(MappingItem::reversed).collect();
        mappings.extend(reversed);

        tracing::debug!(mappings = mappings.len(), "Mapped path resolver initialized");

        Self { mappings }
    }
}

impl PathResolver for MappedPathResolver {
    fn resolve(&self, source_type: &str, source_field: &str, destination_type: Option<&str>) -> String {
        self.mappings
            .iter()
            .find(|m| {
                m.source_type == source_type
                    && m.source_property_path == source_field
                    && destination_type.is_none_or(|d| m.destination_type == d)
            })
            .map(|m| m.destination_property_path.clone())
            .unwrap_or_else(|| source_field.to_string())
    }
}
