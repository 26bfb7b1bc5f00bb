//! Tees & Hoodies Hub Core - Shared types library.
//!
//! This crate provides common types used across all storefront components:
//! - `storefront` - Cart, design composer, catalog and checkout logic
//! - `cli` - Command-line front end over a file-backed store
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no persistence, no
//! rendering. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for prices, emails, colors and sizes

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
