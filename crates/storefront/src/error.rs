//! Unified error handling.
//!
//! Every module has its own error enum; `AppError` wraps them for front
//! ends that drive several modules in one call.

use teehub_core::{ColorError, SizeError};
use thiserror::Error;

use crate::cart::CartError;
use crate::catalog::CatalogError;
use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::design::DesignError;
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Persistence backend failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Cart mutation rejected or not persisted.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Design composition failed.
    #[error("Design error: {0}")]
    Design(#[from] DesignError),

    /// Unknown product, template or variant.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Checkout rejected.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    #[error("Invalid size: {0}")]
    Size(#[from] SizeError),

    #[error("Invalid color: {0}")]
    Color(#[from] ColorError),

    /// Reading or writing a user-supplied file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Whether the error was caused by bad input rather than the environment.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        match self {
            Self::Catalog(_) | Self::Checkout(_) | Self::Size(_) | Self::Color(_) => true,
            Self::Cart(err) => matches!(
                err,
                CartError::InvalidQuantity(_)
                    | CartError::InvalidPrice(_)
                    | CartError::TotalOverflow
                    | CartError::MissingId
            ),
            Self::Design(err) => {
                !matches!(err, DesignError::Render(_) | DesignError::InvalidConfig(_))
            }
            Self::Config(_) | Self::Storage(_) | Self::Io(_) => false,
        }
    }
}

/// Result type alias for storefront operations.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_errors() {
        assert!(AppError::from(CatalogError::UnknownProduct("9".to_string())).is_user_error());
        assert!(AppError::from(CartError::InvalidQuantity(0)).is_user_error());
        assert!(AppError::from(DesignError::NoDesign).is_user_error());
        assert!(AppError::from(CheckoutError::EmptyCart).is_user_error());
    }

    #[test]
    fn test_environment_errors() {
        let io = std::io::Error::other("disk full");
        assert!(!AppError::from(StorageError::Io(io)).is_user_error());
        let err = AppError::from(CartError::Storage(StorageError::WriteRejected(
            "quota".to_string(),
        )));
        assert!(!err.is_user_error());
        assert!(err.to_string().starts_with("Cart error:"));
    }
}
