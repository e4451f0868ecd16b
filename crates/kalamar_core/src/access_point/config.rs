//! Declarative access point configuration.

use super::AccessPoint;
use crate::item::Item;
use crate::model::alias::AliasTable;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Encoding assumed when a configuration does not name one.
pub const DEFAULT_ENCODING: &str = "utf-8";

fn default_encoding() -> String {
    DEFAULT_ENCODING.to_string()
}

/// Access point described by configuration data.
///
/// Deserializable from any serde format; fields other than `name` are optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AccessPointConfig {
    /// Stable access point name, e.g. `tracks`.
    pub name: String,
    /// Format tag used to dispatch items, e.g. `binary`.
    #[serde(default)]
    pub parser: Option<String>,
    #[serde(default)]
    pub storage_aliases: AliasTable,
    #[serde(default)]
    pub parser_aliases: AliasTable,
    #[serde(default = "default_encoding")]
    pub default_encoding: String,
    /// Storage keys declared by the schema, in declaration order.
    #[serde(default)]
    pub storage_properties: Vec<String>,
    /// Directory holding item files, for file-backed storages.
    #[serde(default)]
    pub base_dir: Option<PathBuf>,
    /// Storage property holding the item file name relative to `base_dir`.
    #[serde(default)]
    pub filename_property: Option<String>,
}

impl AccessPointConfig {
    /// Creates a configuration with defaults for everything but the name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parser: None,
            storage_aliases: AliasTable::new(),
            parser_aliases: AliasTable::new(),
            default_encoding: default_encoding(),
            storage_properties: Vec::new(),
            base_dir: None,
            filename_property: None,
        }
    }

    /// Validates declaration-level invariants.
    pub fn validate(&self) -> Result<(), AccessPointConfigError> {
        if self.name.trim().is_empty() {
            return Err(AccessPointConfigError::EmptyName);
        }
        if self.default_encoding.trim().is_empty() {
            return Err(AccessPointConfigError::EmptyEncoding);
        }
        for (alias, key) in self.storage_aliases.iter().chain(self.parser_aliases.iter()) {
            if alias.trim().is_empty() || key.trim().is_empty() {
                return Err(AccessPointConfigError::EmptyAlias);
            }
        }

        let mut seen = BTreeSet::new();
        for property in &self.storage_properties {
            if !seen.insert(property.as_str()) {
                return Err(AccessPointConfigError::DuplicateStorageProperty(
                    property.clone(),
                ));
            }
        }
        Ok(())
    }
}

impl AccessPoint for AccessPointConfig {
    fn parser_name(&self) -> Option<&str> {
        self.parser.as_deref()
    }

    fn storage_aliases(&self) -> &AliasTable {
        &self.storage_aliases
    }

    fn parser_aliases(&self) -> &AliasTable {
        &self.parser_aliases
    }

    fn default_encoding(&self) -> &str {
        &self.default_encoding
    }

    fn storage_properties(&self) -> Vec<String> {
        self.storage_properties.clone()
    }

    fn filename_for(&self, item: &Item) -> Option<PathBuf> {
        let base_dir = self.base_dir.as_ref()?;
        let property = self.filename_property.as_deref()?;
        let name = item.get(property)?.as_text()?;
        Some(base_dir.join(name))
    }
}

/// Access point configuration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessPointConfigError {
    EmptyName,
    EmptyEncoding,
    EmptyAlias,
    DuplicateStorageProperty(String),
}

impl Display for AccessPointConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "access point name must not be empty"),
            Self::EmptyEncoding => write!(f, "default encoding must not be empty"),
            Self::EmptyAlias => write!(f, "alias names and targets must not be empty"),
            Self::DuplicateStorageProperty(value) => {
                write!(f, "storage property declared twice: {value}")
            }
        }
    }
}

impl Error for AccessPointConfigError {}
