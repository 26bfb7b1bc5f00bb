//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `TEEHUB_DATA_DIR` - Directory for the file-backed cart (default: .teehub)
//! - `TEEHUB_CART_KEY` - Storage key of the cart payload (default: cart)
//! - `TEEHUB_TAX_RATE` - Checkout tax rate in [0, 1] (default: 0.08)
//! - `TEEHUB_CUSTOM_SURCHARGE` - Added to a template's price for custom designs (default: 10)
//! - `TEEHUB_THUMBNAIL_MULTIPLIER` - Render multiplier for cart thumbnails (default: 0.5)

use std::path::PathBuf;
use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::cart::DEFAULT_CART_KEY;
use crate::design::RenderOptions;
use crate::storage::validate_key;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct StorefrontConfig {
    pub data_dir: PathBuf,
    pub cart_key: String,
    pub tax_rate: Decimal,
    pub custom_surcharge: Decimal,
    pub thumbnail: RenderOptions,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".teehub"),
            cart_key: DEFAULT_CART_KEY.to_string(),
            tax_rate: Decimal::new(8, 2),
            custom_surcharge: Decimal::TEN,
            thumbnail: RenderOptions::thumbnail(),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let data_dir = get("TEEHUB_DATA_DIR").map_or(defaults.data_dir, PathBuf::from);

        let cart_key = get("TEEHUB_CART_KEY").unwrap_or(defaults.cart_key);
        validate_key(&cart_key)
            .map_err(|e| ConfigError::InvalidEnvVar("TEEHUB_CART_KEY".to_string(), e.to_string()))?;

        let tax_rate = parse_decimal(&get, "TEEHUB_TAX_RATE", defaults.tax_rate)?;
        if tax_rate.is_sign_negative() || tax_rate > Decimal::ONE {
            return Err(ConfigError::InvalidEnvVar(
                "TEEHUB_TAX_RATE".to_string(),
                "must be between 0 and 1".to_string(),
            ));
        }

        let custom_surcharge =
            parse_decimal(&get, "TEEHUB_CUSTOM_SURCHARGE", defaults.custom_surcharge)?;
        if custom_surcharge.is_sign_negative() {
            return Err(ConfigError::InvalidEnvVar(
                "TEEHUB_CUSTOM_SURCHARGE".to_string(),
                "must not be negative".to_string(),
            ));
        }

        let thumbnail = match get("TEEHUB_THUMBNAIL_MULTIPLIER") {
            None => defaults.thumbnail,
            Some(raw) => {
                let multiplier = raw.trim().parse::<f32>().map_err(|e| {
                    ConfigError::InvalidEnvVar(
                        "TEEHUB_THUMBNAIL_MULTIPLIER".to_string(),
                        e.to_string(),
                    )
                })?;
                let options = RenderOptions::with_multiplier(multiplier);
                options.validate().map_err(|e| {
                    ConfigError::InvalidEnvVar(
                        "TEEHUB_THUMBNAIL_MULTIPLIER".to_string(),
                        e.to_string(),
                    )
                })?;
                options
            }
        };

        Ok(Self {
            data_dir,
            cart_key,
            tax_rate,
            custom_surcharge,
            thumbnail,
        })
    }
}

fn parse_decimal<F>(get: &F, key: &str, default: Decimal) -> Result<Decimal, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    get(key).map_or(Ok(default), |raw| {
        Decimal::from_str(raw.trim())
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}
