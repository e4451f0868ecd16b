//! Format strategies and their registry.
//!
//! # Responsibility
//! - Define the contract every format strategy implements.
//! - Host the built-in `binary` strategy and the format registry.
//!
//! # Invariants
//! - Strategies are stateless and shared between items.
//! - A format tag identifies exactly one registered strategy.

pub mod binary;
pub mod registry;

use crate::item::{Item, ItemError, ItemResult};
use crate::model::multimap::MultiMap;
use crate::model::value::PropertyValue;

/// Parsing and serialization strategy for one content format.
pub trait ItemParser {
    /// Unique format tag, e.g. `binary`.
    fn format(&self) -> &str;

    /// Derives parser properties from raw content.
    fn parse_data(&self, content: &[u8], encoding: &str) -> MultiMap<PropertyValue>;

    /// Builds raw content back from the item's parser properties.
    fn serialize(&self, item: &Item) -> ItemResult<Vec<u8>>;

    /// Whether items of this format hold child items.
    fn is_capsule(&self) -> bool {
        false
    }

    /// Loads the child items of a capsule.
    ///
    /// Called once per successful load. Reading `item.subitems()` from here
    /// yields `ItemError::ReentrantSubitemLoad`.
    fn load_subitems(&self, item: &Item) -> ItemResult<Vec<Item>> {
        let _ = item;
        Err(ItemError::AbstractMethodInvoked {
            format: self.format().to_string(),
            method: "load_subitems",
        })
    }
}
