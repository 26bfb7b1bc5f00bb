//! Checkout: form validation, order totals and placing an order.
//!
//! Only cash on delivery is accepted. Placing an order records nothing
//! beyond the returned confirmation and empties the cart.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use teehub_core::{Email, EmailError, Price};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::cart::{CartError, CartStore, LineItem, total_items, total_price};
use crate::storage::KeyValueStore;

/// Delivery regions.
pub const REGIONS: [&str; 10] = [
    "Greater Accra",
    "Ashanti",
    "Western",
    "Central",
    "Volta",
    "Eastern",
    "Northern",
    "Upper West",
    "Upper East",
    "Brong Ahafo",
];

/// Checkout errors.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("missing required fields: {}", join_fields(.0))]
    MissingFields(Vec<CheckoutField>),

    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("unknown region: {0}")]
    UnknownRegion(String),

    #[error("payment method {0} is not available")]
    PaymentUnavailable(PaymentMethod),

    #[error("cart is empty")]
    EmptyCart,

    #[error("tax rate must be between 0 and 1, got {0}")]
    InvalidTaxRate(Decimal),

    #[error(transparent)]
    Cart(#[from] CartError),
}

fn join_fields(fields: &[CheckoutField]) -> String {
    fields
        .iter()
        .map(CheckoutField::label)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A required checkout form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutField {
    FirstName,
    LastName,
    Email,
    Phone,
    Address,
    City,
    Region,
}

impl CheckoutField {
    pub const REQUIRED: [Self; 7] = [
        Self::FirstName,
        Self::LastName,
        Self::Email,
        Self::Phone,
        Self::Address,
        Self::City,
        Self::Region,
    ];

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::FirstName => "first name",
            Self::LastName => "last name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Address => "address",
            Self::City => "city",
            Self::Region => "region",
        }
    }
}

impl fmt::Display for CheckoutField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    #[serde(rename = "cod")]
    CashOnDelivery,
    /// Listed, but not yet accepted.
    Paystack,
}

impl PaymentMethod {
    #[must_use]
    pub const fn is_available(self) -> bool {
        matches!(self, Self::CashOnDelivery)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CashOnDelivery => f.write_str("cash on delivery"),
            Self::Paystack => f.write_str("Paystack"),
        }
    }
}

/// Contact and delivery details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub region: String,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub payment_method: PaymentMethod,
}

/// A form that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedCheckout {
    pub name: String,
    pub email: Email,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub region: &'static str,
    pub postal_code: Option<String>,
    pub payment_method: PaymentMethod,
}

impl CheckoutForm {
    fn field(&self, field: CheckoutField) -> &str {
        match field {
            CheckoutField::FirstName => &self.first_name,
            CheckoutField::LastName => &self.last_name,
            CheckoutField::Email => &self.email,
            CheckoutField::Phone => &self.phone,
            CheckoutField::Address => &self.address,
            CheckoutField::City => &self.city,
            CheckoutField::Region => &self.region,
        }
    }

    /// Blank required fields, in form order.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<CheckoutField> {
        CheckoutField::REQUIRED
            .into_iter()
            .filter(|f| self.field(*f).trim().is_empty())
            .collect()
    }

    /// # Errors
    ///
    /// Returns `CheckoutError::MissingFields` listing every blank required
    /// field, then `InvalidEmail`, `UnknownRegion` or `PaymentUnavailable`.
    pub fn validate(&self) -> Result<ValidatedCheckout, CheckoutError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(CheckoutError::MissingFields(missing));
        }
        let email = Email::parse(&self.email)?;
        let region = REGIONS
            .into_iter()
            .find(|r| r.eq_ignore_ascii_case(self.region.trim()))
            .ok_or_else(|| CheckoutError::UnknownRegion(self.region.clone()))?;
        if !self.payment_method.is_available() {
            return Err(CheckoutError::PaymentUnavailable(self.payment_method));
        }

        Ok(ValidatedCheckout {
            name: format!("{} {}", self.first_name.trim(), self.last_name.trim()),
            email,
            phone: self.phone.trim().to_string(),
            address: self.address.trim().to_string(),
            city: self.city.trim().to_string(),
            region,
            postal_code: self
                .postal_code
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(ToString::to_string),
            payment_method: self.payment_method,
        })
    }
}

/// Order totals. Shipping is free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub total_items: u64,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
}

impl OrderSummary {
    /// Totals for `items` with tax at `tax_rate`, rounded to cents.
    ///
    /// Returns `None` if any total does not fit a [`Decimal`].
    #[must_use]
    pub fn from_items(items: &[LineItem], tax_rate: Decimal) -> Option<Self> {
        let subtotal = total_price(items)?;
        let tax = Price::usd(subtotal).scaled(tax_rate)?.amount;
        let shipping = Decimal::ZERO;
        Some(Self {
            total_items: total_items(items),
            subtotal,
            tax,
            shipping,
            total: subtotal.checked_add(tax)?.checked_add(shipping)?,
        })
    }

    /// The total as a displayable price, e.g. `$86.40`.
    #[must_use]
    pub const fn total_price(&self) -> Price {
        Price::usd(self.total)
    }
}

/// Result of a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
    pub order_number: String,
    pub placed_at: DateTime<Utc>,
    pub customer: ValidatedCheckout,
    pub summary: OrderSummary,
    pub items: Vec<LineItem>,
}

/// Validate, total and place an order for the cart's contents.
///
/// # Errors
///
/// Returns `CheckoutError::EmptyCart`, a validation error, or
/// `CheckoutError::InvalidTaxRate` without touching the cart, or
/// `CheckoutError::Cart` if the cart cannot be cleared afterwards.
#[instrument(skip(store, form))]
pub fn place_order<S: KeyValueStore>(
    store: &mut CartStore<S>,
    form: &CheckoutForm,
    tax_rate: Decimal,
) -> Result<OrderConfirmation, CheckoutError> {
    if store.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    if tax_rate.is_sign_negative() || tax_rate > Decimal::ONE {
        return Err(CheckoutError::InvalidTaxRate(tax_rate));
    }
    let customer = form
        .validate()
        .inspect_err(|e| warn!(error = %e, "Checkout rejected"))?;

    let items = store.items().to_vec();
    let summary =
        OrderSummary::from_items(&items, tax_rate).ok_or(CartError::TotalOverflow)?;
    store.clear()?;

    let order_number = order_number();
    info!(
        order_number = %order_number,
        items = summary.total_items,
        total = %summary.total_price(),
        region = customer.region,
        "Order placed"
    );
    Ok(OrderConfirmation {
        order_number,
        placed_at: Utc::now(),
        customer,
        summary,
        items,
    })
}

fn order_number() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("TH-{}", id.get(..8).unwrap_or(&id).to_ascii_uppercase())
}
