//! Shopping cart.
//!
//! [`CartStore`] owns the ordered list of [`LineItem`]s, merges additions by
//! their `(id, size, color)` key, persists the full list through a
//! [`KeyValueStore`](crate::storage::KeyValueStore) after every change and
//! publishes a [`CartSnapshot`] to subscribers.
//!
//! # Scope of id-based operations
//!
//! [`CartStore::remove_item`] and [`CartStore::set_quantity`] match on `id`
//! alone and therefore touch every size/color variant sharing that id. Use
//! [`CartStore::remove_line`] and [`CartStore::set_line_quantity`] to target a
//! single variant.

mod item;
mod store;

pub use item::{CartSnapshot, LineItem, LineKey, total_items, total_price};
pub use store::{CartError, CartStore, DEFAULT_CART_KEY, HydrateOutcome};
