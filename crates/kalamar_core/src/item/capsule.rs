//! Capsule behaviour: items whose body is an ordered list of child items.
//!
//! # Invariants
//! - Children are loaded by the format strategy at most once per item.
//! - A capsule is parser-modified when its own flag is set or its child list
//!   reports modified; the aggregate is recomputed on every call and loads
//!   the children when they are not loaded yet.
//! - A loader that asks for its own item's children gets
//!   `ItemError::ReentrantSubitemLoad` instead of a panic.
//! - Clearing the own flag never clears the aggregate. A capsule whose
//!   children changed stays dirty until it is loaded again.

use super::tracking::ModificationTrackingList;
use super::{Item, ItemError, ItemResult};
use log::{debug, warn};

impl Item {
    /// Whether this item's strategy produces child items.
    pub fn is_capsule(&self) -> bool {
        self.parser
            .as_ref()
            .is_some_and(|parser| parser.is_capsule())
    }

    /// Whether parser properties changed.
    ///
    /// For capsules this also covers the child list, loading it on first use.
    /// When loading fails the failure is logged and only the own flag counts.
    pub fn parser_modified(&self) -> bool {
        if !self.is_capsule() || self.parser_modified {
            return self.parser_modified;
        }
        match self.subitems() {
            Ok(children) => children.modified(),
            Err(err) => {
                warn!(
                    "event=parser_modified module=item status=error format={} error={err}",
                    self.format_label()
                );
                false
            }
        }
    }

    /// Sets this item's own parser flag; capsule children are unaffected.
    pub fn set_parser_modified(&mut self, value: bool) {
        self.parser_modified = value;
    }

    /// Child items, loaded on first access.
    ///
    /// # Errors
    /// - `NotACapsule` when the item's strategy is not a capsule.
    /// - `ReentrantSubitemLoad` when called from this item's own loader.
    /// - Any loader error; a failed load is retried on the next call.
    pub fn subitems(&self) -> ItemResult<&ModificationTrackingList<Item>> {
        let Some(parser) = self.parser.as_ref().filter(|parser| parser.is_capsule()) else {
            return Err(ItemError::NotACapsule(self.format().map(str::to_string)));
        };
        if let Some(children) = self.subitems.get() {
            return Ok(children);
        }
        if self.loading_subitems.replace(true) {
            return Err(ItemError::ReentrantSubitemLoad(parser.format().to_string()));
        }
        let loaded = parser.load_subitems(self);
        self.loading_subitems.set(false);
        self.subitems.get_or_try_init(|| {
            let children = loaded?;
            debug!(
                "event=load_subitems module=item status=ok format={} count={}",
                parser.format(),
                children.len()
            );
            Ok::<_, ItemError>(ModificationTrackingList::new(children))
        })
    }

    /// Mutable child list, loaded on first access.
    pub fn subitems_mut(&mut self) -> ItemResult<&mut ModificationTrackingList<Item>> {
        self.subitems()?;
        let format = self.format().map(str::to_string);
        self.subitems.get_mut().ok_or(ItemError::NotACapsule(format))
    }
}
