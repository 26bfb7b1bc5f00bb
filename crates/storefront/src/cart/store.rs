//! The cart store: rows, merge rules, persistence and change notification.

use rust_decimal::Decimal;
use teehub_core::Price;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use super::item::{CartSnapshot, LineItem, LineKey};
use crate::storage::{KeyValueStore, StorageError};

/// Default persistence key for the cart payload.
pub const DEFAULT_CART_KEY: &str = "cart";

/// Errors from cart mutations.
///
/// A mutation that returns an error has not changed the cart.
#[derive(Debug, Error)]
pub enum CartError {
    /// Quantity is zero or does not fit a row.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Unit price is negative, or the row total is out of range.
    #[error("invalid price: {0}")]
    InvalidPrice(Decimal),

    /// The cart's price total would be out of range.
    #[error("cart total out of range")]
    TotalOverflow,

    /// Item has an empty id.
    #[error("line item id cannot be empty")]
    MissingId,

    /// Payload could not be encoded.
    #[error("cart encode error: {0}")]
    Encode(#[from] serde_json::Error),

    /// Payload could not be written.
    #[error("cart persistence error: {0}")]
    Storage(#[from] StorageError),
}

/// How [`CartStore::hydrate`] obtained its rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HydrateOutcome {
    /// Nothing stored yet.
    Empty,
    /// Stored rows decoded.
    Loaded {
        rows: usize,
        /// Rows discarded for an empty id, quantity 0 or a bad price.
        dropped: usize,
    },
    /// Stored payload was unreadable or its total out of range; the cart
    /// starts empty.
    Recovered { reason: String },
}

/// Single source of truth for cart contents.
///
/// Every mutation writes the full row list to the store before it takes
/// effect in memory, then publishes a [`CartSnapshot`] to subscribers.
pub struct CartStore<S> {
    storage: S,
    key: String,
    items: Vec<LineItem>,
    updates: watch::Sender<CartSnapshot>,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Create an empty store persisting under [`DEFAULT_CART_KEY`].
    ///
    /// Call [`hydrate`](Self::hydrate) once before use to load saved rows.
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, DEFAULT_CART_KEY)
    }

    /// Create an empty store persisting under `key`.
    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        let (updates, _) = watch::channel(CartSnapshot::default());
        Self {
            storage,
            key: key.into(),
            items: Vec::new(),
            updates,
        }
    }

    /// Load rows from the store.
    ///
    /// Never fails: unreadable or corrupt payloads leave the cart empty and
    /// are logged. Duplicate merge keys in the payload are combined, and if
    /// any rows were merged or dropped the cleaned list is written back.
    #[instrument(skip(self), fields(key = %self.key))]
    pub fn hydrate(&mut self) -> HydrateOutcome {
        let raw = match self.storage.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No saved cart");
                self.reset();
                return HydrateOutcome::Empty;
            }
            Err(e) => {
                warn!(error = %e, "Failed to read saved cart, starting empty");
                self.reset();
                return HydrateOutcome::Recovered {
                    reason: e.to_string(),
                };
            }
        };

        let decoded: Vec<LineItem> = match serde_json::from_str(&raw) {
            Ok(rows) => rows,
            Err(e) => {
                warn!(error = %e, "Error loading saved cart, starting empty");
                self.reset();
                return HydrateOutcome::Recovered {
                    reason: e.to_string(),
                };
            }
        };

        let stored = decoded.len();
        let mut rows: Vec<LineItem> = Vec::with_capacity(stored);
        let mut dropped = 0;
        for item in decoded {
            if validate(&item).is_err() {
                warn!(item_id = %item.id, "Dropping invalid saved cart row");
                dropped += 1;
                continue;
            }
            merge_into(&mut rows, item);
        }

        let Some(snapshot) = CartSnapshot::try_of(&rows) else {
            warn!("Saved cart total out of range, starting empty");
            self.reset();
            return HydrateOutcome::Recovered {
                reason: CartError::TotalOverflow.to_string(),
            };
        };

        let kept = rows.len();
        info!(rows = kept, dropped, "Cart hydrated");
        self.publish(rows, snapshot);
        if kept != stored {
            self.persist()
                .unwrap_or_else(|e| warn!(error = %e, "Failed to rewrite cleaned cart"));
        }
        HydrateOutcome::Loaded {
            rows: kept,
            dropped,
        }
    }

    /// Add an item, combining it with an existing row of the same merge key.
    ///
    /// A merged row keeps its position and every field except quantity.
    ///
    /// # Errors
    ///
    /// Returns `CartError` for a zero quantity, negative price or empty id,
    /// `CartError::InvalidPrice` if a row or cart total would be out of range,
    /// or an error if the updated cart cannot be persisted.
    #[instrument(skip(self, item), fields(item_id = %item.id, quantity = item.quantity))]
    pub fn add_item(&mut self, item: LineItem) -> Result<(), CartError> {
        validate(&item)?;
        let mut next = self.items.clone();
        if next
            .iter()
            .any(|row| row.same_line(&item) && row.quantity.checked_add(item.quantity).is_none())
        {
            return Err(CartError::InvalidQuantity(i64::from(item.quantity)));
        }
        let price = item.price;
        merge_into(&mut next, item);
        match self.commit(next) {
            Err(CartError::TotalOverflow) => Err(CartError::InvalidPrice(price)),
            result => result,
        }
    }

    /// Remove every row with this `id`, whatever its size or color.
    ///
    /// Returns the number of rows removed.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the updated cart cannot be persisted.
    #[instrument(skip(self))]
    pub fn remove_item(&mut self, id: &str) -> Result<usize, CartError> {
        let next: Vec<LineItem> = self.items.iter().filter(|row| row.id != id).cloned().collect();
        let removed = self.items.len() - next.len();
        self.commit(next)?;
        Ok(removed)
    }

    /// Set the quantity of every row with this `id`.
    ///
    /// A quantity of zero or less removes those rows, exactly like
    /// [`remove_item`](Self::remove_item). Returns the number of rows affected.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` if the quantity does not fit a row,
    /// `CartError::TotalOverflow` if the cart total would be out of range,
    /// or `CartError::Storage` if the updated cart cannot be persisted.
    #[instrument(skip(self))]
    pub fn set_quantity(&mut self, id: &str, quantity: i64) -> Result<usize, CartError> {
        if quantity <= 0 {
            return self.remove_item(id);
        }
        let quantity = u32::try_from(quantity).map_err(|_| CartError::InvalidQuantity(quantity))?;

        let mut affected = 0;
        let mut next = self.items.clone();
        for row in next.iter_mut().filter(|row| row.id == id) {
            row.quantity = quantity;
            affected += 1;
        }
        self.commit(next)?;
        Ok(affected)
    }

    /// Remove the single row with this merge key.
    ///
    /// Returns whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the updated cart cannot be persisted.
    #[instrument(skip(self), fields(line = %key))]
    pub fn remove_line(&mut self, key: &LineKey) -> Result<bool, CartError> {
        let next: Vec<LineItem> = self
            .items
            .iter()
            .filter(|row| !row.has_key(key))
            .cloned()
            .collect();
        let removed = next.len() != self.items.len();
        self.commit(next)?;
        Ok(removed)
    }

    /// Set the quantity of the single row with this merge key.
    ///
    /// A quantity of zero or less removes the row. Returns whether a row matched.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` if the quantity does not fit a row,
    /// `CartError::TotalOverflow` if the cart total would be out of range,
    /// or `CartError::Storage` if the updated cart cannot be persisted.
    #[instrument(skip(self), fields(line = %key))]
    pub fn set_line_quantity(&mut self, key: &LineKey, quantity: i64) -> Result<bool, CartError> {
        if quantity <= 0 {
            return self.remove_line(key);
        }
        let quantity = u32::try_from(quantity).map_err(|_| CartError::InvalidQuantity(quantity))?;

        let mut next = self.items.clone();
        let row = next.iter_mut().find(|row| row.has_key(key));
        let matched = row.is_some();
        if let Some(row) = row {
            row.quantity = quantity;
        }
        self.commit(next)?;
        Ok(matched)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the empty cart cannot be persisted.
    #[instrument(skip(self))]
    pub fn clear(&mut self) -> Result<(), CartError> {
        self.commit(Vec::new())
    }

    /// Write the current rows to the store again.
    ///
    /// # Errors
    ///
    /// Returns `CartError` if the rows cannot be encoded or written.
    pub fn persist(&mut self) -> Result<(), CartError> {
        let payload = serde_json::to_string(&self.items)?;
        self.storage.set(&self.key, &payload)?;
        Ok(())
    }

    /// Sum of quantities across all rows.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.updates.borrow().total_items
    }

    /// Sum of `price × quantity` across all rows.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.updates.borrow().total_price
    }

    /// Rows in cart order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Current rows and totals.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        self.updates.borrow().clone()
    }

    /// Receive a snapshot after every committed change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartSnapshot> {
        self.updates.subscribe()
    }

    /// Borrow the persistence backend.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Mutably borrow the persistence backend.
    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Total and persist `next`, then make it the current state.
    fn commit(&mut self, next: Vec<LineItem>) -> Result<(), CartError> {
        let snapshot = CartSnapshot::try_of(&next).ok_or(CartError::TotalOverflow)?;
        let payload = serde_json::to_string(&next)?;
        if let Err(e) = self.storage.set(&self.key, &payload) {
            warn!(error = %e, "Failed to persist cart, change discarded");
            return Err(e.into());
        }
        debug!(rows = next.len(), "Cart persisted");
        self.publish(next, snapshot);
        Ok(())
    }

    fn publish(&mut self, items: Vec<LineItem>, snapshot: CartSnapshot) {
        self.items = items;
        self.updates.send_replace(snapshot);
    }

    fn reset(&mut self) {
        self.publish(Vec::new(), CartSnapshot::default());
    }
}

fn validate(item: &LineItem) -> Result<(), CartError> {
    if item.id.is_empty() {
        return Err(CartError::MissingId);
    }
    if item.quantity == 0 {
        return Err(CartError::InvalidQuantity(0));
    }
    if Price::usd(item.price).is_negative() || item.line_total().is_none() {
        return Err(CartError::InvalidPrice(item.price));
    }
    Ok(())
}

/// Append `item`, or add its quantity to the row with the same merge key.
fn merge_into(rows: &mut Vec<LineItem>, item: LineItem) {
    match rows.iter_mut().find(|row| row.same_line(&item)) {
        Some(existing) => {
            existing.quantity = existing.quantity.saturating_add(item.quantity);
        }
        None => rows.push(item),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn item(id: &str, price: i64, quantity: u32, size: &str, color: &str) -> LineItem {
        LineItem {
            id: id.to_string(),
            name: format!("Product {id}"),
            price: Decimal::from(price),
            image: format!("https://example.com/{id}.jpg"),
            quantity,
            size: size.to_string(),
            color: color.to_string(),
            is_custom: false,
        }
    }

    fn store() -> CartStore<MemoryStore> {
        let mut store = CartStore::new(MemoryStore::new());
        assert_eq!(store.hydrate(), HydrateOutcome::Empty);
        store
    }

    #[test]
    fn test_add_same_key_merges_quantity() {
        let mut cart = store();
        cart.add_item(item("1", 25, 1, "M", "black")).unwrap();
        cart.add_item(item("1", 25, 2, "M", "black")).unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].quantity, 3);
        assert_eq!(cart.total_price(), Decimal::new(7500, 2));
    }

    #[test]
    fn test_merge_keeps_existing_fields_and_position() {
        let mut cart = store();
        cart.add_item(item("1", 25, 1, "M", "black")).unwrap();
        cart.add_item(item("2", 55, 1, "L", "gray")).unwrap();

        let mut repriced = item("1", 99, 1, "M", "black");
        repriced.name = "Renamed".to_string();
        cart.add_item(repriced).unwrap();

        assert_eq!(cart.items()[0].id, "1");
        assert_eq!(cart.items()[0].name, "Product 1");
        assert_eq!(cart.items()[0].price, Decimal::from(25));
        assert_eq!(cart.items()[0].quantity, 2);
        assert_eq!(cart.items()[1].id, "2");
    }

    #[test]
    fn test_different_variants_are_separate_rows() {
        let mut cart = store();
        cart.add_item(item("1", 25, 1, "M", "black")).unwrap();
        cart.add_item(item("1", 25, 1, "L", "black")).unwrap();
        cart.add_item(item("1", 25, 1, "M", "navy")).unwrap();
        assert_eq!(cart.len(), 3);
    }

    #[test]
    fn test_totals_two_products() {
        let mut cart = store();
        cart.add_item(item("1", 25, 1, "M", "black")).unwrap();
        cart.add_item(item("2", 55, 1, "M", "black")).unwrap();

        assert_eq!(cart.total_items(), 2);
        assert_eq!(cart.total_price(), Decimal::new(8000, 2));
    }

    #[test]
    fn test_add_rejects_invalid_items_without_mutation() {
        let mut cart = store();
        assert!(matches!(
            cart.add_item(item("1", 25, 0, "M", "black")),
            Err(CartError::InvalidQuantity(0))
        ));
        assert!(matches!(
            cart.add_item(item("1", -1, 1, "M", "black")),
            Err(CartError::InvalidPrice(_))
        ));
        assert!(matches!(
            cart.add_item(item("", 25, 1, "M", "black")),
            Err(CartError::MissingId)
        ));
        assert!(cart.is_empty());
        assert!(cart.storage().raw(DEFAULT_CART_KEY).is_none());
    }

    #[test]
    fn test_remove_item_matches_id_across_variants() {
        let mut cart = store();
        cart.add_item(item("1", 25, 1, "M", "black")).unwrap();
        cart.add_item(item("1", 25, 1, "XL", "red")).unwrap();
        cart.add_item(item("2", 55, 1, "M", "black")).unwrap();

        assert_eq!(cart.remove_item("1").unwrap(), 2);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].id, "2");
    }

    #[test]
    fn test_set_quantity_zero_equals_remove() {
        let seed = |cart: &mut CartStore<MemoryStore>| {
            cart.add_item(item("1", 25, 2, "M", "black")).unwrap();
            cart.add_item(item("2", 55, 1, "M", "black")).unwrap();
            cart.add_item(item("1", 25, 1, "S", "white")).unwrap();
        };

        let mut by_quantity = store();
        seed(&mut by_quantity);
        by_quantity.set_quantity("1", 0).unwrap();

        let mut by_remove = store();
        seed(&mut by_remove);
        by_remove.remove_item("1").unwrap();

        assert_eq!(by_quantity.items(), by_remove.items());
        assert_eq!(
            by_quantity.storage().raw(DEFAULT_CART_KEY),
            by_remove.storage().raw(DEFAULT_CART_KEY)
        );

        let mut negative = store();
        seed(&mut negative);
        negative.set_quantity("1", -3).unwrap();
        assert_eq!(negative.items(), by_remove.items());
    }

    #[test]
    fn test_set_quantity_updates_all_rows_with_id() {
        let mut cart = store();
        cart.add_item(item("1", 25, 1, "M", "black")).unwrap();
        cart.add_item(item("1", 25, 1, "L", "black")).unwrap();

        assert_eq!(cart.set_quantity("1", 4).unwrap(), 2);
        assert_eq!(cart.total_items(), 8);
    }

    #[test]
    fn test_set_quantity_too_large() {
        let mut cart = store();
        cart.add_item(item("1", 25, 1, "M", "black")).unwrap();
        assert!(matches!(
            cart.set_quantity("1", i64::from(u32::MAX) + 1),
            Err(CartError::InvalidQuantity(_))
        ));
        assert_eq!(cart.total_items(), 1);
    }

    #[test]
    fn test_line_scoped_operations() {
        let mut cart = store();
        cart.add_item(item("1", 25, 1, "M", "black")).unwrap();
        cart.add_item(item("1", 25, 1, "L", "black")).unwrap();

        let large = LineKey::new("1", "L", "black");
        assert!(cart.set_line_quantity(&large, 5).unwrap());
        assert_eq!(cart.items()[0].quantity, 1);
        assert_eq!(cart.items()[1].quantity, 5);

        assert!(cart.set_line_quantity(&large, 0).unwrap());
        assert_eq!(cart.len(), 1);
        assert!(!cart.remove_line(&large).unwrap());
        assert!(cart.remove_line(&LineKey::new("1", "M", "black")).unwrap());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_clear_persists_empty_list() {
        let mut cart = store();
        cart.add_item(item("1", 25, 1, "M", "black")).unwrap();
        cart.clear().unwrap();
        assert!(cart.is_empty());
        assert_eq!(cart.storage().raw(DEFAULT_CART_KEY), Some("[]"));
    }

    #[test]
    fn test_hydrate_roundtrip_preserves_rows() {
        let mut cart = store();
        cart.add_item(item("2", 55, 1, "L", "gray")).unwrap();
        let mut custom = item("custom-abc", 35, 1, "M", "navy");
        custom.is_custom = true;
        custom.image = "data:image/png;base64,iVBORw0KGgo=".to_string();
        cart.add_item(custom).unwrap();
        cart.add_item(item("1", 25, 3, "S", "white")).unwrap();

        let raw = cart.storage().raw(DEFAULT_CART_KEY).unwrap().to_string();
        let mut reloaded = CartStore::new(MemoryStore::with_value(DEFAULT_CART_KEY, &raw));
        assert_eq!(
            reloaded.hydrate(),
            HydrateOutcome::Loaded {
                rows: 3,
                dropped: 0
            }
        );
        assert_eq!(reloaded.items(), cart.items());
    }

    #[test]
    fn test_hydrate_corrupt_payload_recovers_empty() {
        let mut cart = CartStore::new(MemoryStore::with_value(DEFAULT_CART_KEY, "{not json"));
        assert!(matches!(cart.hydrate(), HydrateOutcome::Recovered { .. }));
        assert!(cart.is_empty());

        // Still usable afterwards
        cart.add_item(item("1", 25, 1, "M", "black")).unwrap();
        assert_eq!(cart.total_items(), 1);
    }

    #[test]
    fn test_hydrate_drops_zero_quantity_and_merges_duplicates() {
        let raw = r#"[
            {"id":"1","name":"Tee","price":25,"image":"x","quantity":1,"size":"M","color":"black"},
            {"id":"2","name":"Hoodie","price":55,"image":"x","quantity":0,"size":"M","color":"black"},
            {"id":"1","name":"Tee","price":25,"image":"x","quantity":2,"size":"M","color":"black"}
        ]"#;
        let mut cart = CartStore::new(MemoryStore::with_value(DEFAULT_CART_KEY, raw));
        assert_eq!(
            cart.hydrate(),
            HydrateOutcome::Loaded {
                rows: 1,
                dropped: 1
            }
        );
        assert_eq!(cart.items()[0].quantity, 3);

        let stored: Vec<LineItem> =
            serde_json::from_str(cart.storage().raw(DEFAULT_CART_KEY).unwrap()).unwrap();
        assert_eq!(stored, cart.items());
    }

    #[test]
    fn test_hydrate_clean_payload_not_rewritten() {
        let raw = r#"[{"id":"1","name":"Tee","price":25,"image":"x","quantity":1,"size":"M","color":"black"}]"#;
        let mut cart = CartStore::new(MemoryStore::with_value(DEFAULT_CART_KEY, raw));
        cart.hydrate();
        assert_eq!(cart.storage().raw(DEFAULT_CART_KEY), Some(raw));
    }

    #[test]
    fn test_hydrate_rewrite_failure_keeps_cleaned_rows() {
        let raw = r#"[
            {"id":"1","name":"Tee","price":25,"image":"x","quantity":1,"size":"M","color":"black"},
            {"id":"1","name":"Tee","price":25,"image":"x","quantity":1,"size":"M","color":"black"}
        ]"#;
        let mut storage = MemoryStore::with_value(DEFAULT_CART_KEY, raw);
        storage.set_fail_writes(true);
        let mut cart = CartStore::new(storage);

        assert_eq!(
            cart.hydrate(),
            HydrateOutcome::Loaded {
                rows: 1,
                dropped: 0
            }
        );
        assert_eq!(cart.items()[0].quantity, 2);
        assert_eq!(cart.storage().raw(DEFAULT_CART_KEY), Some(raw));
    }

    #[test]
    fn test_hydrate_drops_row_with_out_of_range_total() {
        let raw = r#"[
            {"id":"1","name":"Tee","price":"79228162514264337593543950335","image":"x","quantity":2,"size":"M","color":"black"},
            {"id":"2","name":"Hoodie","price":55,"image":"x","quantity":1,"size":"L","color":"gray"}
        ]"#;
        let mut cart = CartStore::new(MemoryStore::with_value(DEFAULT_CART_KEY, raw));
        assert_eq!(
            cart.hydrate(),
            HydrateOutcome::Loaded {
                rows: 1,
                dropped: 1
            }
        );
        assert_eq!(cart.items()[0].id, "2");
        assert_eq!(cart.total_price(), Decimal::from(55));
    }

    #[test]
    fn test_hydrate_cart_total_out_of_range_recovers_empty() {
        let raw = r#"[
            {"id":"1","name":"Tee","price":"79228162514264337593543950335","image":"x","quantity":1,"size":"M","color":"black"},
            {"id":"2","name":"Hoodie","price":55,"image":"x","quantity":1,"size":"L","color":"gray"}
        ]"#;
        let mut cart = CartStore::new(MemoryStore::with_value(DEFAULT_CART_KEY, raw));
        assert!(matches!(cart.hydrate(), HydrateOutcome::Recovered { .. }));
        assert!(cart.is_empty());
        assert_eq!(cart.total_price(), Decimal::ZERO);
    }

    #[test]
    fn test_add_out_of_range_total_leaves_cart_and_storage_unchanged() {
        let mut cart = store();
        let mut huge = item("1", 0, 1, "M", "black");
        huge.price = Decimal::MAX;
        cart.add_item(huge.clone()).unwrap();
        let before = cart.storage().raw(DEFAULT_CART_KEY).unwrap().to_string();

        assert!(matches!(
            cart.add_item(huge),
            Err(CartError::InvalidPrice(_))
        ));
        assert!(matches!(
            cart.add_item(item("2", 25, 1, "M", "black")),
            Err(CartError::InvalidPrice(_))
        ));
        assert!(matches!(
            cart.set_quantity("1", 2),
            Err(CartError::TotalOverflow)
        ));
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].quantity, 1);
        assert_eq!(cart.total_price(), Decimal::MAX);
        assert_eq!(cart.storage().raw(DEFAULT_CART_KEY), Some(before.as_str()));
    }

    #[test]
    fn test_write_failure_leaves_state_unchanged() {
        let mut cart = store();
        cart.add_item(item("1", 25, 1, "M", "black")).unwrap();
        cart.storage_mut().set_fail_writes(true);

        assert!(matches!(
            cart.add_item(item("2", 55, 1, "M", "black")),
            Err(CartError::Storage(_))
        ));
        assert!(matches!(cart.clear(), Err(CartError::Storage(_))));
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total_price(), Decimal::from(25));
    }

    #[test]
    fn test_subscribers_see_committed_snapshots() {
        let mut cart = store();
        let rx = cart.subscribe();

        cart.add_item(item("1", 25, 2, "M", "black")).unwrap();
        {
            let snapshot = rx.borrow();
            assert_eq!(snapshot.total_items, 2);
            assert_eq!(snapshot.total_price, Decimal::from(50));
        }

        cart.storage_mut().set_fail_writes(true);
        let _ = cart.clear();
        assert_eq!(rx.borrow().total_items, 2);
    }
}
