//! Ordered sequence that records structural changes.
//!
//! # Responsibility
//! - Wrap a vector and flag every membership or order change.
//! - Report an aggregate modified state over elements that track their own.
//!
//! # Invariants
//! - Reads and in-place element access never set the structure flag.
//! - The structure flag is never cleared; unwrap and re-wrap for a clean list.
//! - `modified()` is recomputed on each call.

use std::ops::Deref;

/// Elements that know whether they were modified.
pub trait TrackModified {
    fn is_modified(&self) -> bool;
}

/// Vector wrapper with structural modification tracking.
#[derive(Debug, Clone, PartialEq)]
pub struct ModificationTrackingList<T> {
    items: Vec<T>,
    structure_modified: bool,
}

impl<T> Default for ModificationTrackingList<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T> ModificationTrackingList<T> {
    /// Wraps `items` in a clean list.
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            structure_modified: false,
        }
    }

    /// Whether membership or order changed since wrapping.
    pub fn structure_modified(&self) -> bool {
        self.structure_modified
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn push(&mut self, value: T) {
        self.items.push(value);
        self.structure_modified = true;
    }

    /// Inserts `value` at `index`; positions past the end append.
    pub fn insert(&mut self, index: usize, value: T) {
        let index = index.min(self.items.len());
        self.items.insert(index, value);
        self.structure_modified = true;
    }

    pub fn pop(&mut self) -> Option<T> {
        let value = self.items.pop()?;
        self.structure_modified = true;
        Some(value)
    }

    pub fn remove(&mut self, index: usize) -> Option<T> {
        if index >= self.items.len() {
            return None;
        }
        self.structure_modified = true;
        Some(self.items.remove(index))
    }

    /// Replaces the element at `index`, returning the previous one.
    pub fn replace(&mut self, index: usize, value: T) -> Option<T> {
        let slot = self.items.get_mut(index)?;
        let previous = std::mem::replace(slot, value);
        self.structure_modified = true;
        Some(previous)
    }

    /// Swaps two elements. Does nothing if either index is out of range.
    pub fn swap(&mut self, a: usize, b: usize) {
        if a >= self.items.len() || b >= self.items.len() {
            return;
        }
        self.items.swap(a, b);
        self.structure_modified = true;
    }

    pub fn reverse(&mut self) {
        self.items.reverse();
        self.structure_modified = true;
    }

    pub fn sort_by<F>(&mut self, compare: F)
    where
        F: FnMut(&T, &T) -> std::cmp::Ordering,
    {
        self.items.sort_by(compare);
        self.structure_modified = true;
    }

    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.items.retain(keep);
        self.structure_modified = true;
    }

    pub fn truncate(&mut self, len: usize) {
        self.items.truncate(len);
        self.structure_modified = true;
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.structure_modified = true;
    }

    pub fn into_inner(self) -> Vec<T> {
        self.items
    }
}

impl<T: TrackModified> ModificationTrackingList<T> {
    /// Structure changed, or any element reports itself modified.
    pub fn modified(&self) -> bool {
        self.structure_modified || self.items.iter().any(TrackModified::is_modified)
    }
}

impl<T> Deref for ModificationTrackingList<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.items
    }
}

impl<T> Extend<T> for ModificationTrackingList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.items.extend(iter);
        self.structure_modified = true;
    }
}

impl<'a, T> IntoIterator for &'a ModificationTrackingList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
