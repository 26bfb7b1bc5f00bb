//! Tees & Hoodies Hub storefront library.
//!
//! Client-side state for the shop: a persisted shopping cart, a design
//! composer for custom prints, the product catalog and checkout.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod design;
pub mod error;
pub mod storage;

pub use error::{AppError, Result};
