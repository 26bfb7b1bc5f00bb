//! Core types for Tees & Hoodies Hub.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod color;
pub mod email;
pub mod price;
pub mod size;

pub use color::{ColorError, Palette, Rgb};
pub use email::{Email, EmailError};
pub use price::{CurrencyCode, Price};
pub use size::{Size, SizeError};
