//! Format registry and item dispatch.
//!
//! # Responsibility
//! - Hold the format tag → strategy table populated at bootstrap.
//! - Build items for stored records and for brand-new records.
//!
//! # Invariants
//! - Tags are unique; registration rejects duplicates.
//! - Lookup is exact and case-sensitive.
//! - A missing tag selects the untyped base item; an unknown tag is an error.
//! - Building an item never opens or parses its content.

use super::binary::BinaryParser;
use super::ItemParser;
use crate::access_point::AccessPoint;
use crate::item::{Item, ItemError, ItemResult, Opener};
use crate::model::multimap::MultiMap;
use crate::model::value::PropertyValue;
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::rc::Rc;
use std::sync::Arc;

/// Format registration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    InvalidFormatTag(String),
    DuplicateFormat(String),
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidFormatTag(value) => write!(f, "format tag is invalid: `{value}`"),
            Self::DuplicateFormat(value) => write!(f, "format already registered: {value}"),
        }
    }
}

impl Error for RegistryError {}

/// Request model for a record that does not exist in storage yet.
#[derive(Debug, Clone, Default)]
pub struct NewItem {
    /// Initial properties, applied through the normal write path.
    pub properties: MultiMap<PropertyValue>,
    /// Raw content returned by the new item's opener.
    pub initial_content: Option<Vec<u8>>,
}

impl NewItem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.set(key, value.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<Vec<u8>>) -> Self {
        self.initial_content = Some(content.into());
        self
    }
}

/// Format tag → strategy table.
#[derive(Clone, Default)]
pub struct FormatRegistry {
    parsers: BTreeMap<String, Arc<dyn ItemParser>>,
}

impl FormatRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the formats shipped with the core (`binary`).
    pub fn with_builtin_formats() -> Self {
        let mut registry = Self::new();
        registry.parsers.insert(
            BinaryParser.format().to_string(),
            Arc::new(BinaryParser) as Arc<dyn ItemParser>,
        );
        registry
    }

    /// Registers one format strategy.
    pub fn register(&mut self, parser: Arc<dyn ItemParser>) -> Result<(), RegistryError> {
        let format = parser.format().to_string();
        if format.is_empty() || format.trim() != format {
            return Err(RegistryError::InvalidFormatTag(format));
        }
        if self.parsers.contains_key(format.as_str()) {
            return Err(RegistryError::DuplicateFormat(format));
        }

        info!("event=format_register module=registry status=ok format={format}");
        self.parsers.insert(format, parser);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }

    /// Returns sorted format tags.
    pub fn formats(&self) -> Vec<String> {
        self.parsers.keys().cloned().collect()
    }

    pub fn get(&self, format: &str) -> Option<Arc<dyn ItemParser>> {
        self.parsers.get(format).cloned()
    }

    /// Resolves a format tag to its strategy.
    ///
    /// `None` resolves to `Ok(None)`, the untyped base item.
    pub fn resolve_variant(&self, format: Option<&str>) -> ItemResult<Option<Arc<dyn ItemParser>>> {
        let Some(format) = format else {
            return Ok(None);
        };
        match self.get(format) {
            Some(parser) => Ok(Some(parser)),
            None => {
                warn!(
                    "event=item_dispatch module=registry status=error error_code=parser_not_available format={format}"
                );
                Err(ItemError::ParserNotAvailable(format.to_string()))
            }
        }
    }

    /// Builds the item for a stored record of `access_point`.
    ///
    /// The untyped base item discards `opener`: it has no content to parse.
    pub fn get_item_parser(
        &self,
        access_point: Rc<dyn AccessPoint>,
        opener: Option<Opener>,
        storage_properties: MultiMap<PropertyValue>,
    ) -> ItemResult<Item> {
        let parser = self.resolve_variant(access_point.parser_name())?;
        debug!(
            "event=item_dispatch module=registry status=ok format={}",
            parser.as_ref().map_or("none", |parser| parser.format())
        );
        let opener = if parser.is_some() { opener } else { None };
        Ok(Item::new(access_point, parser, opener, storage_properties))
    }

    /// Builds a new item for `access_point`.
    ///
    /// # Contract
    /// - Every declared storage property starts as `PropertyValue::Null`.
    /// - `old_storage_properties` is empty.
    /// - Supplied properties are applied with `Item::set`, so modification
    ///   flags reflect them.
    pub fn create_item(
        &self,
        access_point: Rc<dyn AccessPoint>,
        request: NewItem,
    ) -> ItemResult<Item> {
        let storage_properties: MultiMap<PropertyValue> = access_point
            .storage_properties()
            .into_iter()
            .map(|name| (name, PropertyValue::Null))
            .collect();
        let NewItem {
            properties,
            initial_content,
        } = request;
        let opener: Opener = Box::new(move || initial_content);

        let mut item = self.get_item_parser(access_point, Some(opener), storage_properties)?;
        item.clear_old_storage_properties();

        for (key, value) in properties.iter() {
            item.set(key, value.clone());
        }
        Ok(item)
    }
}

impl Debug for FormatRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatRegistry")
            .field("formats", &self.formats())
            .finish()
    }
}
