//! Item: one stored record seen through two property namespaces.
//!
//! # Responsibility
//! - Route property reads and writes to the storage or parser namespace.
//! - Compute parser properties lazily, once, from the raw content.
//! - Track storage and parser modifications independently.
//!
//! # Invariants
//! - Key classification is total: storage alias, then parser alias, then
//!   storage membership, otherwise parser.
//! - The content opener runs at most once; its result is memoized.
//! - `parse_data` runs at most once per item; its result is memoized.
//! - Construction never opens content nor parses it.
//!
//! # See also
//! - `parser::registry` for how items are built.

mod capsule;
pub mod tracking;

use crate::access_point::AccessPoint;
use crate::model::alias::{AliasTable, AliasedMultiMap};
use crate::model::multimap::MultiMap;
use crate::model::value::PropertyValue;
use crate::parser::ItemParser;
use log::{debug, trace};
use once_cell::unsync::OnceCell;
use std::cell::Cell;
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use tracking::{ModificationTrackingList, TrackModified};

/// Zero-argument content loader supplied by the storage layer.
///
/// Returning `None` means the item has no content; it reads as empty bytes.
pub type Opener = Box<dyn FnOnce() -> Option<Vec<u8>>>;

pub type ItemResult<T> = Result<T, ItemError>;

/// Item dispatch and format strategy errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemError {
    /// No format strategy is registered under the requested tag.
    ParserNotAvailable(String),
    /// A strategy claimed a capability without providing its method.
    AbstractMethodInvoked {
        format: String,
        method: &'static str,
    },
    /// Subitems were requested from an item that is not a capsule.
    NotACapsule(Option<String>),
    /// A capsule loader asked for the children it is loading.
    ReentrantSubitemLoad(String),
    /// A property holds a value kind the strategy cannot serialize.
    InvalidPropertyValue {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl Display for ItemError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ParserNotAvailable(format) => write!(f, "unknown parser: {format}"),
            Self::AbstractMethodInvoked { format, method } => {
                write!(f, "format `{format}` does not implement `{method}`")
            }
            Self::NotACapsule(format) => write!(
                f,
                "item of format `{}` has no subitems",
                format.as_deref().unwrap_or("none")
            ),
            Self::ReentrantSubitemLoad(format) => {
                write!(f, "format `{format}` read subitems while loading them")
            }
            Self::InvalidPropertyValue {
                key,
                expected,
                found,
            } => write!(
                f,
                "property `{key}` holds a {found} value, expected {expected}"
            ),
        }
    }
}

impl Error for ItemError {}

/// Property namespace a key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Supplied by the storage layer.
    Storage,
    /// Derived from the raw content by the format strategy.
    Parser,
}

/// In-memory representation of one stored record.
pub struct Item {
    access_point: Rc<dyn AccessPoint>,
    parser: Option<Arc<dyn ItemParser>>,
    opener: Cell<Option<Opener>>,
    raw_content: OnceCell<Vec<u8>>,
    storage_properties: AliasedMultiMap,
    old_storage_properties: MultiMap<PropertyValue>,
    parser_aliases: AliasTable,
    parser_properties: OnceCell<AliasedMultiMap>,
    subitems: OnceCell<ModificationTrackingList<Item>>,
    loading_subitems: Cell<bool>,
    storage_modified: bool,
    parser_modified: bool,
}

impl Item {
    /// Wires an item; only the registry builds items.
    pub(crate) fn new(
        access_point: Rc<dyn AccessPoint>,
        parser: Option<Arc<dyn ItemParser>>,
        opener: Option<Opener>,
        storage_properties: MultiMap<PropertyValue>,
    ) -> Self {
        let storage_aliases = access_point.storage_aliases().clone();
        let parser_aliases = access_point.parser_aliases().clone();
        Self {
            access_point,
            parser,
            opener: Cell::new(opener),
            raw_content: OnceCell::new(),
            old_storage_properties: storage_properties.clone(),
            storage_properties: AliasedMultiMap::new(storage_properties, storage_aliases),
            parser_aliases,
            parser_properties: OnceCell::new(),
            subitems: OnceCell::new(),
            loading_subitems: Cell::new(false),
            storage_modified: false,
            parser_modified: false,
        }
    }

    /// Format tag of this item's strategy; `None` for the untyped base item.
    pub fn format(&self) -> Option<&str> {
        self.parser.as_ref().map(|parser| parser.format())
    }

    pub fn access_point(&self) -> &Rc<dyn AccessPoint> {
        &self.access_point
    }

    /// Encoding of the raw content, as declared by the access point.
    pub fn encoding(&self) -> &str {
        self.access_point.default_encoding()
    }

    /// Filesystem path of this item, when its storage keeps it in a file.
    pub fn filename(&self) -> Option<PathBuf> {
        self.access_point.filename_for(self)
    }

    /// Raw content, loaded through the opener on first use.
    pub fn content(&self) -> &[u8] {
        self.raw_content.get_or_init(|| {
            let content = self
                .opener
                .take()
                .and_then(|open| open())
                .unwrap_or_default();
            debug!(
                "event=content_open module=item status=ok format={} bytes={}",
                self.format_label(),
                content.len()
            );
            content
        })
    }

    /// Decides which namespace `key` belongs to.
    pub fn classify(&self, key: &str) -> Namespace {
        if self.storage_properties.aliases().is_alias(key) {
            return Namespace::Storage;
        }
        if self.parser_aliases.is_alias(key) {
            return Namespace::Parser;
        }
        if self.storage_properties.contains_key(key) {
            return Namespace::Storage;
        }
        trace!(
            "event=classify_fallback module=item status=ok format={} key={}",
            self.format_label(),
            key
        );
        Namespace::Parser
    }

    /// Returns the first value of `key`, or `None` when it is not set.
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        match self.classify(key) {
            Namespace::Storage => self.storage_properties.get(key),
            Namespace::Parser => self.parser_properties().get(key),
        }
    }

    /// Returns every value of `key`.
    pub fn get_all(&self, key: &str) -> &[PropertyValue] {
        match self.classify(key) {
            Namespace::Storage => self.storage_properties.get_all(key),
            Namespace::Parser => self.parser_properties().get_all(key),
        }
    }

    /// Sets `key` to `value` in its namespace and flags that namespace modified.
    pub fn set(&mut self, key: &str, value: impl Into<PropertyValue>) {
        let value = value.into();
        match self.classify(key) {
            Namespace::Storage => {
                self.storage_properties.set(key, value);
                self.storage_modified = true;
            }
            Namespace::Parser => {
                self.parser_properties();
                if let Some(properties) = self.parser_properties.get_mut() {
                    properties.set(key, value);
                }
                self.parser_modified = true;
            }
        }
    }

    /// Names of all properties, storage and parser, without duplicates.
    pub fn keys(&self) -> BTreeSet<String> {
        self.storage_properties
            .keys()
            .chain(self.parser_properties().keys())
            .map(str::to_string)
            .collect()
    }

    /// Storage properties addressed through storage aliases.
    pub fn storage_properties(&self) -> &AliasedMultiMap {
        &self.storage_properties
    }

    /// Parser properties addressed through parser aliases; parses on first use.
    pub fn parser_properties(&self) -> &AliasedMultiMap {
        self.parser_properties.get_or_init(|| {
            let parsed = match &self.parser {
                Some(parser) => parser.parse_data(self.content(), self.encoding()),
                None => MultiMap::new(),
            };
            debug!(
                "event=parse_data module=item status=ok format={} keys={}",
                self.format_label(),
                parsed.len()
            );
            AliasedMultiMap::new(parsed, self.parser_aliases.clone())
        })
    }

    pub fn raw_storage_properties(&self) -> &MultiMap<PropertyValue> {
        self.storage_properties.raw()
    }

    pub fn raw_parser_properties(&self) -> &MultiMap<PropertyValue> {
        self.parser_properties().raw()
    }

    /// Storage properties as they were when the item was loaded.
    ///
    /// Empty for items that never existed in storage.
    pub fn old_storage_properties(&self) -> &MultiMap<PropertyValue> {
        &self.old_storage_properties
    }

    pub(crate) fn clear_old_storage_properties(&mut self) {
        self.old_storage_properties = MultiMap::new();
    }

    pub fn storage_aliases(&self) -> &AliasTable {
        self.storage_properties.aliases()
    }

    pub fn parser_aliases(&self) -> &AliasTable {
        &self.parser_aliases
    }

    pub fn storage_modified(&self) -> bool {
        self.storage_modified
    }

    pub fn set_storage_modified(&mut self, value: bool) {
        self.storage_modified = value;
    }

    /// Whether any storage or parser property changed since creation.
    pub fn modified(&self) -> bool {
        self.storage_modified || self.parser_modified()
    }

    /// Serializes the parser properties back to raw content.
    pub fn serialize(&self) -> ItemResult<Vec<u8>> {
        match &self.parser {
            Some(parser) => parser.serialize(self),
            None => Ok(Vec::new()),
        }
    }

    fn format_label(&self) -> &str {
        self.format().unwrap_or("none")
    }
}

impl TrackModified for Item {
    fn is_modified(&self) -> bool {
        self.modified()
    }
}

impl Debug for Item {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Item")
            .field("format", &self.format())
            .field("storage_properties", self.storage_properties.raw())
            .field("parser_properties", &self.parser_properties.get())
            .field("storage_modified", &self.storage_modified)
            .field("parser_modified", &self.parser_modified)
            .finish_non_exhaustive()
    }
}
