//! Asset-type catalog
//!
//! The ordered list of named categories an asset can be classified as. The
//! catalog is loaded by an external settings collaborator and handed to each
//! intake session as a read-only dependency.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A single named asset category
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetType {
    pub name: String,
}

impl AssetType {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl std::fmt::Display for AssetType {
    #[mutants::skip]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Ordered, read-only set of legal asset types
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<AssetType>", into = "Vec<AssetType>")]
pub struct AssetTypeCatalog {
    types: Vec<AssetType>,
}

impl AssetTypeCatalog {
    /// Build a catalog, preserving order. Names must be non-blank and unique.
    pub fn new(types: Vec<AssetType>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(types.len());
        for asset_type in &types {
            if asset_type.name.trim().is_empty() {
                return Err(Error::Validation(
                    "Asset type names must not be blank".to_string(),
                ));
            }
            if !seen.insert(asset_type.name.as_str()) {
                return Err(Error::Validation(format!(
                    "Asset type '{}' appears more than once in the catalog",
                    asset_type.name
                )));
            }
        }
        Ok(Self { types })
    }

    /// Build a catalog from bare names
    pub fn from_names<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(names.into_iter().map(AssetType::new).collect())
    }

    /// All types in catalog order
    pub fn list(&self) -> &[AssetType] {
        &self.types
    }

    /// Look up a type by exact name
    pub fn get(&self, name: &str) -> Option<&AssetType> {
        self.types.iter().find(|t| t.name == name)
    }

    /// Resolve a type name, failing if it is not part of the catalog
    pub fn resolve(&self, name: &str) -> Result<&AssetType> {
        self.get(name)
            .ok_or_else(|| Error::UnknownAssetType(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TryFrom<Vec<AssetType>> for AssetTypeCatalog {
    type Error = Error;

    fn try_from(types: Vec<AssetType>) -> Result<Self> {
        Self::new(types)
    }
}

impl From<AssetTypeCatalog> for Vec<AssetType> {
    fn from(catalog: AssetTypeCatalog) -> Self {
        catalog.types
    }
}
