//! Cart commands.

use serde::Serialize;
use teehub_core::Size;
use teehub_storefront::cart::{CartError, CartSnapshot};
use teehub_storefront::checkout::OrderSummary;
use tracing::info;

use super::{Context, print_json};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Changed {
    lines_changed: usize,
    cart: CartSnapshot,
}

/// Print every line and the cart totals.
pub fn list(ctx: &Context) -> teehub_storefront::Result<()> {
    print_json(&ctx.cart.snapshot())
}

/// Add `quantity` of a catalog product's variant.
pub fn add(
    ctx: &mut Context,
    product_id: &str,
    size: Size,
    color: Option<&str>,
    quantity: u32,
) -> teehub_storefront::Result<()> {
    let product = ctx.catalog.product(product_id)?;
    let color = color
        .or_else(|| product.colors.first().map(String::as_str))
        .unwrap_or_default();
    let mut item = product.line_item(size, color)?;
    item.quantity = quantity;

    info!(item_id = %item.id, quantity, "Adding to cart");
    ctx.cart.add_item(item)?;
    print_json(&ctx.cart.snapshot())
}

/// Remove every line with `id`.
pub fn remove(ctx: &mut Context, id: &str) -> teehub_storefront::Result<()> {
    let lines_changed = ctx.cart.remove_item(id)?;
    print_json(&Changed {
        lines_changed,
        cart: ctx.cart.snapshot(),
    })
}

/// Set the quantity of every line with `id`.
pub fn set(ctx: &mut Context, id: &str, quantity: i64) -> teehub_storefront::Result<()> {
    let lines_changed = ctx.cart.set_quantity(id, quantity)?;
    print_json(&Changed {
        lines_changed,
        cart: ctx.cart.snapshot(),
    })
}

pub fn clear(ctx: &mut Context) -> teehub_storefront::Result<()> {
    ctx.cart.clear()?;
    print_json(&ctx.cart.snapshot())
}

#[derive(Serialize)]
struct Totals {
    #[serde(flatten)]
    summary: OrderSummary,
    display: String,
}

/// Print subtotal, tax, shipping and total.
pub fn totals(ctx: &Context) -> teehub_storefront::Result<()> {
    let summary = OrderSummary::from_items(ctx.cart.items(), ctx.config.tax_rate)
        .ok_or(CartError::TotalOverflow)?;
    print_json(&Totals {
        display: summary.total_price().to_string(),
        summary,
    })
}
