//! Raw passthrough format.

use super::ItemParser;
use crate::item::{Item, ItemError, ItemResult};
use crate::model::multimap::MultiMap;
use crate::model::value::PropertyValue;

/// Format tag of [`BinaryParser`].
pub const BINARY_FORMAT: &str = "binary";

/// Parser property holding the whole content.
pub const DATA_PROPERTY: &str = "data";

/// Exposes the whole raw content as the `data` property.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryParser;

impl ItemParser for BinaryParser {
    fn format(&self) -> &str {
        BINARY_FORMAT
    }

    fn parse_data(&self, content: &[u8], _encoding: &str) -> MultiMap<PropertyValue> {
        let mut properties = MultiMap::new();
        properties.set(DATA_PROPERTY, PropertyValue::from(content));
        properties
    }

    fn serialize(&self, item: &Item) -> ItemResult<Vec<u8>> {
        match item.raw_parser_properties().get(DATA_PROPERTY) {
            None | Some(PropertyValue::Null) => Ok(Vec::new()),
            Some(value) => value.as_bytes().map(<[u8]>::to_vec).ok_or_else(|| {
                ItemError::InvalidPropertyValue {
                    key: DATA_PROPERTY.to_string(),
                    expected: "bytes or text",
                    found: value.kind_name(),
                }
            }),
        }
    }
}
