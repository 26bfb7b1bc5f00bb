//! Order placement.

use teehub_storefront::checkout::{CheckoutForm, place_order};

use super::{Context, print_json};

/// Place a cash-on-delivery order and print the confirmation.
pub fn place(ctx: &mut Context, form: &CheckoutForm) -> teehub_storefront::Result<()> {
    let confirmation = place_order(&mut ctx.cart, form, ctx.config.tax_rate)?;
    print_json(&confirmation)
}
