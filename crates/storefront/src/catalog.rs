//! Product catalog and design templates.
//!
//! The catalog is fixed at build time. Products are what the shop lists;
//! design templates are the blank garments a custom design goes on.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use teehub_core::{Palette, Rgb, Size};
use thiserror::Error;
use tracing::warn;

use crate::cart::LineItem;

/// Catalog lookup and variant errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("unknown product: {0}")]
    UnknownProduct(String),

    #[error("unknown design template: {0}")]
    UnknownTemplate(String),

    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("unknown sort order: {0}")]
    UnknownSort(String),

    #[error("{product} is not available in size {size}")]
    SizeUnavailable { product: String, size: Size },

    #[error("{product} is not available in {color}")]
    ColorUnavailable { product: String, color: String },
}

/// Shop category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    TShirts,
    Hoodies,
    Sweatshirts,
}

impl Category {
    pub const ALL: [Self; 3] = [Self::TShirts, Self::Hoodies, Self::Sweatshirts];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TShirts => "t-shirts",
            Self::Hoodies => "hoodies",
            Self::Sweatshirts => "sweatshirts",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CatalogError::UnknownCategory(s.to_string()))
    }
}

/// A product listed in the shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub image: String,
    pub category: Category,
    pub colors: Vec<String>,
    pub sizes: Vec<Size>,
    pub description: String,
}

impl Product {
    /// A quantity-1 cart line for a chosen variant.
    ///
    /// The line id is `<product>-<color>-<size>`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::SizeUnavailable` or `CatalogError::ColorUnavailable`
    /// if the product is not offered in that variant.
    pub fn line_item(&self, size: Size, color: &str) -> Result<LineItem, CatalogError> {
        if !self.sizes.contains(&size) {
            return Err(CatalogError::SizeUnavailable {
                product: self.name.clone(),
                size,
            });
        }
        let color = self
            .colors
            .iter()
            .find(|c| c.eq_ignore_ascii_case(color))
            .ok_or_else(|| CatalogError::ColorUnavailable {
                product: self.name.clone(),
                color: color.to_string(),
            })?;

        Ok(LineItem {
            id: format!("{}-{color}-{size}", self.id),
            name: self.name.clone(),
            price: self.price,
            image: self.image.clone(),
            quantity: 1,
            size: size.to_string(),
            color: color.clone(),
            is_custom: false,
        })
    }

    /// The shop grid's one-click add: size M, first listed color, and the
    /// bare product id.
    #[must_use]
    pub fn quick_add(&self) -> LineItem {
        LineItem {
            id: self.id.clone(),
            name: self.name.clone(),
            price: self.price,
            image: self.image.clone(),
            quantity: 1,
            size: Size::M.to_string(),
            color: self.colors.first().cloned().unwrap_or_default(),
            is_custom: false,
        }
    }
}

/// A blank garment a custom design is printed on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignTemplate {
    pub id: String,
    pub name: String,
    pub base_price: Decimal,
}

/// Shop listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortBy {
    #[default]
    Name,
    PriceLow,
    PriceHigh,
}

impl FromStr for SortBy {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "price-low" => Ok(Self::PriceLow),
            "price-high" => Ok(Self::PriceHigh),
            _ => Err(CatalogError::UnknownSort(s.to_string())),
        }
    }
}

/// Shop filter. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    pub category: Option<Category>,
    pub search: Option<String>,
    pub sort: SortBy,
}

impl ProductQuery {
    fn matches(&self, product: &Product) -> bool {
        if self.category.is_some_and(|c| c != product.category) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                product.name.to_lowercase().contains(&term)
                    || product.description.to_lowercase().contains(&term)
            }
        }
    }
}

/// Products, templates and the color palette.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    templates: Vec<DesignTemplate>,
    palette: Palette,
}

impl Catalog {
    #[must_use]
    pub const fn new(products: Vec<Product>, templates: Vec<DesignTemplate>, palette: Palette) -> Self {
        Self {
            products,
            templates,
            palette,
        }
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn design_templates(&self) -> &[DesignTemplate] {
        &self.templates
    }

    #[must_use]
    pub const fn palette(&self) -> &Palette {
        &self.palette
    }

    /// # Errors
    ///
    /// Returns `CatalogError::UnknownProduct`.
    pub fn product(&self, id: &str) -> Result<&Product, CatalogError> {
        self.products
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| CatalogError::UnknownProduct(id.to_string()))
    }

    /// # Errors
    ///
    /// Returns `CatalogError::UnknownTemplate`.
    pub fn design_template(&self, id: &str) -> Result<&DesignTemplate, CatalogError> {
        self.templates
            .iter()
            .find(|t| t.id.eq_ignore_ascii_case(id))
            .ok_or_else(|| CatalogError::UnknownTemplate(id.to_string()))
    }

    /// Filtered and sorted products.
    #[must_use]
    pub fn search(&self, query: &ProductQuery) -> Vec<&Product> {
        let mut found: Vec<&Product> = self.products.iter().filter(|p| query.matches(p)).collect();
        match query.sort {
            SortBy::Name => found.sort_by(|a, b| a.name.cmp(&b.name)),
            SortBy::PriceLow => found.sort_by(|a, b| a.price.cmp(&b.price)),
            SortBy::PriceHigh => found.sort_by(|a, b| b.price.cmp(&a.price)),
        }
        found
    }

    /// Palette color for a name, or black if the name is unknown.
    #[must_use]
    pub fn color(&self, name: &str) -> Rgb {
        if !self.palette.contains(name) {
            warn!(color = name, "Unknown color, using black");
        }
        self.palette.get_or_black(name)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(shop_products(), design_templates(), Palette::default())
    }
}

#[allow(clippy::too_many_arguments)]
fn product(
    id: &str,
    name: &str,
    price: i64,
    photo: &str,
    category: Category,
    colors: &[&str],
    sizes: &[Size],
    description: &str,
) -> Product {
    Product {
        id: id.to_string(),
        name: name.to_string(),
        price: Decimal::from(price),
        image: format!("https://images.unsplash.com/photo-{photo}?w=300&h=300&fit=crop"),
        category,
        colors: colors.iter().map(ToString::to_string).collect(),
        sizes: sizes.to_vec(),
        description: description.to_string(),
    }
}

const REGULAR: [Size; 4] = [Size::S, Size::M, Size::L, Size::XL];

fn shop_products() -> Vec<Product> {
    vec![
        product(
            "1",
            "Classic Cotton T-Shirt",
            25,
            "1521572163474-6864f9cf17ab",
            Category::TShirts,
            &["black", "white", "navy", "red"],
            &REGULAR,
            "Premium cotton t-shirt perfect for everyday wear",
        ),
        product(
            "2",
            "Comfort Hoodie",
            55,
            "1556821840-3a63f95609a7",
            Category::Hoodies,
            &["black", "gray", "navy"],
            &Size::ALL,
            "Cozy hoodie with premium fleece lining",
        ),
        product(
            "3",
            "Crew Neck Sweatshirt",
            45,
            "1434389677669-e08b4cac3105",
            Category::Sweatshirts,
            &["gray", "black", "white", "green"],
            &REGULAR,
            "Classic crew neck sweatshirt for casual comfort",
        ),
        product(
            "4",
            "Vintage Graphic Tee",
            30,
            "1583743814966-8936f37f4ad2",
            Category::TShirts,
            &["black", "white", "vintage"],
            &REGULAR,
            "Retro-style graphic t-shirt with vintage wash",
        ),
        product(
            "5",
            "Zip-Up Hoodie",
            65,
            "1620012253295-c15cc3e65df4",
            Category::Hoodies,
            &["black", "gray", "navy", "red"],
            &Size::ALL,
            "Full-zip hoodie with kangaroo pocket",
        ),
        product(
            "6",
            "Athletic Sweatshirt",
            50,
            "1622445275576-721325763afe",
            Category::Sweatshirts,
            &["gray", "navy", "black"],
            &REGULAR,
            "Performance sweatshirt with moisture-wicking fabric",
        ),
    ]
}

fn design_templates() -> Vec<DesignTemplate> {
    [("t-shirt", "T-Shirt", 25), ("hoodie", "Hoodie", 55), ("sweatshirt", "Sweatshirt", 45)]
        .into_iter()
        .map(|(id, name, price)| DesignTemplate {
            id: id.to_string(),
            name: name.to_string(),
            base_price: Decimal::from(price),
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn names(products: &[&Product]) -> Vec<String> {
        products.iter().map(|p| p.name.clone()).collect()
    }

    #[test]
    fn test_default_catalog_contents() {
        let catalog = Catalog::default();
        assert_eq!(catalog.products().len(), 6);
        assert_eq!(catalog.design_templates().len(), 3);
        assert_eq!(catalog.product("2").unwrap().sizes, Size::ALL.to_vec());
        assert_eq!(
            catalog.design_template("sweatshirt").unwrap().base_price,
            Decimal::from(45)
        );
    }

    #[test]
    fn test_unknown_product() {
        assert_eq!(
            Catalog::default().product("99"),
            Err(CatalogError::UnknownProduct("99".to_string()))
        );
    }

    #[test]
    fn test_search_by_category_sorted_by_name() {
        let catalog = Catalog::default();
        let query = ProductQuery {
            category: Some(Category::Hoodies),
            ..ProductQuery::default()
        };
        assert_eq!(
            names(&catalog.search(&query)),
            vec!["Comfort Hoodie", "Zip-Up Hoodie"]
        );
    }

    #[test]
    fn test_search_matches_description_case_insensitively() {
        let catalog = Catalog::default();
        let query = ProductQuery {
            search: Some("FLEECE".to_string()),
            ..ProductQuery::default()
        };
        assert_eq!(names(&catalog.search(&query)), vec!["Comfort Hoodie"]);
    }

    #[test]
    fn test_blank_search_matches_all() {
        let query = ProductQuery {
            search: Some("  ".to_string()),
            ..ProductQuery::default()
        };
        assert_eq!(Catalog::default().search(&query).len(), 6);
    }

    #[test]
    fn test_sort_by_price() {
        let catalog = Catalog::default();
        let low = catalog.search(&ProductQuery {
            sort: SortBy::PriceLow,
            ..ProductQuery::default()
        });
        assert_eq!(low.first().unwrap().price, Decimal::from(25));
        assert_eq!(low.last().unwrap().price, Decimal::from(65));

        let high = catalog.search(&ProductQuery {
            sort: SortBy::PriceHigh,
            ..ProductQuery::default()
        });
        assert_eq!(high.first().unwrap().name, "Zip-Up Hoodie");
    }

    #[test]
    fn test_parse_query_parts() {
        assert_eq!("Hoodies".parse::<Category>().unwrap(), Category::Hoodies);
        assert_eq!("price-high".parse::<SortBy>().unwrap(), SortBy::PriceHigh);
        assert!("jackets".parse::<Category>().is_err());
        assert!("random".parse::<SortBy>().is_err());
    }

    #[test]
    fn test_line_item_for_variant() {
        let catalog = Catalog::default();
        let item = catalog.product("1").unwrap().line_item(Size::L, "Navy").unwrap();
        assert_eq!(item.id, "1-navy-L");
        assert_eq!(item.color, "navy");
        assert_eq!(item.price, Decimal::from(25));
        assert_eq!(item.quantity, 1);
        assert!(!item.is_custom);
    }

    #[test]
    fn test_line_item_rejects_unavailable_variant() {
        let catalog = Catalog::default();
        let tee = catalog.product("1").unwrap();
        assert!(matches!(
            tee.line_item(Size::XXL, "black"),
            Err(CatalogError::SizeUnavailable { .. })
        ));
        assert!(matches!(
            tee.line_item(Size::M, "green"),
            Err(CatalogError::ColorUnavailable { .. })
        ));
    }

    #[test]
    fn test_quick_add_defaults() {
        let item = Catalog::default().product("3").unwrap().quick_add();
        assert_eq!(item.id, "3");
        assert_eq!(item.size, "M");
        assert_eq!(item.color, "gray");
    }

    #[test]
    fn test_unknown_color_falls_back_to_black() {
        let catalog = Catalog::default();
        assert_eq!(catalog.color("navy"), Rgb::new(0x1e, 0x3a, 0x8a));
        assert_eq!(catalog.color("plaid"), Rgb::BLACK);
    }
}
