//! Subcommand implementations.
//!
//! Every command loads the same [`Context`] and prints its result as JSON.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod design;

use serde::Serialize;
use teehub_storefront::cart::{CartStore, HydrateOutcome};
use teehub_storefront::catalog::Catalog;
use teehub_storefront::config::StorefrontConfig;
use teehub_storefront::storage::FileStore;
use tracing::{info, warn};

/// Loaded configuration, catalog and the hydrated cart.
pub struct Context {
    pub config: StorefrontConfig,
    pub catalog: Catalog,
    pub cart: CartStore<FileStore>,
}

impl Context {
    /// Read configuration and hydrate the cart from the data directory.
    ///
    /// # Errors
    ///
    /// Returns `AppError` if the configuration is invalid or the data
    /// directory cannot be created.
    pub fn load() -> teehub_storefront::Result<Self> {
        let config = StorefrontConfig::from_env()?;
        let storage = FileStore::open(config.data_dir.clone())?;
        let mut cart = CartStore::with_key(storage, config.cart_key.clone());

        match cart.hydrate() {
            HydrateOutcome::Recovered { reason } => {
                warn!(%reason, "Saved cart was unreadable and has been reset");
            }
            outcome => info!(?outcome, dir = %config.data_dir.display(), "Cart loaded"),
        }

        Ok(Self {
            config,
            catalog: Catalog::default(),
            cart,
        })
    }
}

/// Print `value` as pretty JSON on stdout.
///
/// # Errors
///
/// Returns `AppError::Io` if serialization fails.
#[allow(clippy::print_stdout)]
pub fn print_json<T: Serialize>(value: &T) -> teehub_storefront::Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(std::io::Error::other)?;
    println!("{json}");
    Ok(())
}
