//! Access point contract consumed by items.
//!
//! # Responsibility
//! - Describe how an item's properties map onto its storage: format tag,
//!   alias tables, default encoding, declared storage keys.
//! - Optionally resolve an item to a filesystem path.
//!
//! # Invariants
//! - Items treat their access point as read-only after construction.
//! - Alias tables are copied into each item when it is built.

mod config;

pub use config::{AccessPointConfig, AccessPointConfigError, DEFAULT_ENCODING};

use crate::item::Item;
use crate::model::alias::AliasTable;
use std::path::PathBuf;

/// Storage-side description of where items live and how they are parsed.
pub trait AccessPoint {
    /// Format tag of the items stored here. `None` selects the untyped base item.
    fn parser_name(&self) -> Option<&str>;

    fn storage_aliases(&self) -> &AliasTable;

    fn parser_aliases(&self) -> &AliasTable;

    fn default_encoding(&self) -> &str;

    /// Storage keys declared by the schema.
    fn storage_properties(&self) -> Vec<String>;

    /// Filesystem path of `item`, for storages that keep items in files.
    fn filename_for(&self, item: &Item) -> Option<PathBuf> {
        let _ = item;
        None
    }
}
