//! Catalog listing.

use teehub_storefront::catalog::{Category, ProductQuery, SortBy};

use super::{Context, print_json};

pub fn list(
    ctx: &Context,
    category: Option<Category>,
    search: Option<String>,
    sort: SortBy,
) -> teehub_storefront::Result<()> {
    let query = ProductQuery {
        category,
        search,
        sort,
    };
    print_json(&ctx.catalog.search(&query))
}
