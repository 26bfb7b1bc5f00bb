//! Cart line items.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row in the cart: a product variant and how many of it.
///
/// Serialized with camelCase names to match the stored payload format:
///
/// ```json
/// {"id":"1","name":"Classic Cotton T-Shirt","price":"25","image":"https://…",
///  "quantity":2,"size":"M","color":"black","isCustom":false}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Product identity (or `custom-<uuid>` for designed items).
    pub id: String,
    pub name: String,
    /// Unit price captured when the item was added.
    pub price: Decimal,
    /// Image URL or `data:` URI of a rendered design.
    pub image: String,
    pub quantity: u32,
    pub size: String,
    pub color: String,
    #[serde(default)]
    pub is_custom: bool,
}

impl LineItem {
    /// The merge key of this row.
    #[must_use]
    pub fn key(&self) -> LineKey {
        LineKey {
            id: self.id.clone(),
            size: self.size.clone(),
            color: self.color.clone(),
        }
    }

    /// Whether this row has the given merge key.
    #[must_use]
    pub fn has_key(&self, key: &LineKey) -> bool {
        self.id == key.id && self.size == key.size && self.color == key.color
    }

    /// Whether two rows share a merge key.
    #[must_use]
    pub fn same_line(&self, other: &Self) -> bool {
        self.id == other.id && self.size == other.size && self.color == other.color
    }

    /// `price × quantity`, or `None` if it does not fit a [`Decimal`].
    #[must_use]
    pub fn line_total(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }
}

/// Identity of a cart line: `(id, size, color)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineKey {
    pub id: String,
    pub size: String,
    pub color: String,
}

impl LineKey {
    #[must_use]
    pub fn new(id: impl Into<String>, size: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            size: size.into(),
            color: color.into(),
        }
    }
}

impl std::fmt::Display for LineKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.id, self.size, self.color)
    }
}

/// Cart contents with derived totals, published after every change.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    pub items: Vec<LineItem>,
    pub total_items: u64,
    pub total_price: Decimal,
}

impl CartSnapshot {
    /// Rows with their totals, or `None` if the price total overflows.
    pub(crate) fn try_of(items: &[LineItem]) -> Option<Self> {
        Some(Self {
            items: items.to_vec(),
            total_items: total_items(items),
            total_price: total_price(items)?,
        })
    }
}

/// Sum of quantities.
#[must_use]
pub fn total_items(items: &[LineItem]) -> u64 {
    items.iter().map(|item| u64::from(item.quantity)).sum()
}

/// Sum of `price × quantity`, or `None` if any step overflows.
#[must_use]
pub fn total_price(items: &[LineItem]) -> Option<Decimal> {
    items
        .iter()
        .try_fold(Decimal::ZERO, |sum, item| sum.checked_add(item.line_total()?))
}
