//! Property storage model shared by every item.
//!
//! # Responsibility
//! - Define the value kinds, the ordered multi-valued map and the alias layer.
//! - Stay independent from item dispatch and format strategies.
//!
//! # Invariants
//! - Property maps store canonical keys only; aliases are resolved on access.

pub mod alias;
pub mod multimap;
pub mod value;
