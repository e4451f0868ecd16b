//! Core item model for Kalamar.
//! Items expose stored records as storage and parser properties, dispatched
//! to format strategies through an explicit registry.

pub mod access_point;
pub mod item;
pub mod logging;
pub mod model;
pub mod parser;

pub use access_point::{AccessPoint, AccessPointConfig, AccessPointConfigError, DEFAULT_ENCODING};
pub use item::tracking::{ModificationTrackingList, TrackModified};
pub use item::{Item, ItemError, ItemResult, Namespace, Opener};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::alias::{AliasTable, AliasedMultiMap};
pub use model::multimap::MultiMap;
pub use model::value::PropertyValue;
pub use parser::binary::{BinaryParser, BINARY_FORMAT, DATA_PROPERTY};
pub use parser::registry::{FormatRegistry, NewItem, RegistryError};
pub use parser::ItemParser;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
