//! Tees & Hoodies Hub CLI - cart, custom designs and checkout from the shell.
//!
//! # Usage
//!
//! ```bash
//! # Browse hoodies, cheapest first
//! teehub catalog --category hoodies --sort price-low
//!
//! # Add a large navy tee and show the cart
//! teehub cart add 1 --size L --color navy
//! teehub cart list
//!
//! # Put an uploaded design on a hoodie and add it to the cart
//! teehub design --image logo.png --template hoodie --color gray --add-to-cart
//!
//! # Place a cash-on-delivery order
//! teehub checkout --first-name Ama --last-name Mensah --email ama@example.com \
//!     --phone 0200000000 --address "12 Ring Road" --city Accra --region "Greater Accra"
//! ```
//!
//! The cart is stored under `TEEHUB_DATA_DIR`. Command output is JSON on
//! stdout; logs go to stderr.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use teehub_core::Size;
use teehub_storefront::catalog::{Category, SortBy};
use teehub_storefront::checkout::{CheckoutForm, PaymentMethod};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::Context;

#[derive(Parser)]
#[command(name = "teehub")]
#[command(author, version, about = "Tees & Hoodies Hub storefront tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and edit the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Compose a custom design and optionally add it to the cart
    Design(DesignArgs),
    /// Place an order for the cart's contents
    Checkout(CheckoutArgs),
    /// List products
    Catalog {
        /// Only show this category (`t-shirts`, `hoodies`, `sweatshirts`)
        #[arg(long)]
        category: Option<Category>,

        /// Case-insensitive match on name or description
        #[arg(short, long)]
        search: Option<String>,

        /// Listing order (`name`, `price-low`, `price-high`)
        #[arg(long, default_value = "name")]
        sort: SortBy,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show all lines and totals
    List,
    /// Add a catalog product
    Add {
        /// Product id
        product: String,

        #[arg(short, long, default_value = "M")]
        size: Size,

        /// Color name (defaults to the product's first color)
        #[arg(short, long)]
        color: Option<String>,

        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove every line with this id
    Remove { id: String },
    /// Set the quantity of every line with this id (0 or less removes)
    Set {
        id: String,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Empty the cart
    Clear,
    /// Show subtotal, tax and total
    Totals,
}

#[derive(Args)]
struct DesignArgs {
    /// Image to print (PNG, JPEG, GIF or WebP)
    #[arg(short, long)]
    image: PathBuf,

    /// Garment template (`t-shirt`, `hoodie`, `sweatshirt`)
    #[arg(short, long)]
    template: String,

    /// Garment color
    #[arg(short, long, default_value = "black")]
    color: String,

    #[arg(long, default_value = "M")]
    size: Size,

    /// Override the fitted scale (clamped to 0.1 - 3)
    #[arg(long)]
    scale: Option<f32>,

    /// Rotation in degrees (clamped to -180 - 180)
    #[arg(long, allow_negative_numbers = true)]
    rotation: Option<f32>,

    /// Write a full-size PNG preview here
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Add the design to the cart
    #[arg(long)]
    add_to_cart: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Payment {
    /// Cash on delivery
    Cod,
    /// Paystack (not yet available)
    Paystack,
}

impl From<Payment> for PaymentMethod {
    fn from(payment: Payment) -> Self {
        match payment {
            Payment::Cod => Self::CashOnDelivery,
            Payment::Paystack => Self::Paystack,
        }
    }
}

#[derive(Args)]
struct CheckoutArgs {
    #[arg(long, default_value = "")]
    first_name: String,
    #[arg(long, default_value = "")]
    last_name: String,
    #[arg(long, default_value = "")]
    email: String,
    #[arg(long, default_value = "")]
    phone: String,
    #[arg(long, default_value = "")]
    address: String,
    #[arg(long, default_value = "")]
    city: String,
    #[arg(long, default_value = "")]
    region: String,
    #[arg(long)]
    postal_code: Option<String>,
    #[arg(long, value_enum, default_value = "cod")]
    payment: Payment,
}

impl From<CheckoutArgs> for CheckoutForm {
    fn from(args: CheckoutArgs) -> Self {
        Self {
            first_name: args.first_name,
            last_name: args.last_name,
            email: args.email,
            phone: args.phone,
            address: args.address,
            city: args.city,
            region: args.region,
            postal_code: args.postal_code,
            payment_method: args.payment.into(),
        }
    }
}

#[tokio::main]
async fn main() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "teehub_storefront=info,teehub_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut ctx = Context::load()?;
    match cli.command {
        Commands::Cart { action } => match action {
            CartAction::List => commands::cart::list(&ctx)?,
            CartAction::Add {
                product,
                size,
                color,
                quantity,
            } => commands::cart::add(&mut ctx, &product, size, color.as_deref(), quantity)?,
            CartAction::Remove { id } => commands::cart::remove(&mut ctx, &id)?,
            CartAction::Set { id, quantity } => commands::cart::set(&mut ctx, &id, quantity)?,
            CartAction::Clear => commands::cart::clear(&mut ctx)?,
            CartAction::Totals => commands::cart::totals(&ctx)?,
        },
        Commands::Design(args) => {
            let request = commands::design::DesignRequest {
                image: args.image,
                template: args.template,
                color: args.color,
                size: args.size,
                scale: args.scale,
                rotation: args.rotation,
                out: args.out,
                add_to_cart: args.add_to_cart,
            };
            commands::design::compose(&mut ctx, request).await?;
        }
        Commands::Checkout(args) => commands::checkout::place(&mut ctx, &args.into())?,
        Commands::Catalog {
            category,
            search,
            sort,
        } => commands::catalog::list(&ctx, category, search, sort)?,
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_cart_set_negative() {
        let cli = Cli::try_parse_from(["teehub", "cart", "set", "1", "-2"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Cart {
                action: CartAction::Set { quantity: -2, .. }
            })
        ));
    }

    #[test]
    fn test_parse_design_flags() {
        let cli = Cli::try_parse_from([
            "teehub",
            "design",
            "--image",
            "logo.png",
            "--template",
            "hoodie",
            "--size",
            "xl",
            "--rotation",
            "-45",
            "--add-to-cart",
        ]);
        let Ok(Cli {
            command: Commands::Design(args),
        }) = cli
        else {
            panic!("design args did not parse");
        };
        assert_eq!(args.size, Size::XL);
        assert_eq!(args.rotation, Some(-45.0));
        assert!(args.add_to_cart);
        assert_eq!(args.color, "black");
    }

    #[test]
    fn test_parse_rejects_unknown_category() {
        assert!(Cli::try_parse_from(["teehub", "catalog", "--category", "jackets"]).is_err());
    }

    #[test]
    fn test_checkout_args_into_form() {
        let Ok(Cli {
            command: Commands::Checkout(args),
        }) = Cli::try_parse_from(["teehub", "checkout", "--first-name", "Ama", "--payment", "paystack"])
        else {
            panic!("checkout args did not parse");
        };
        let form = CheckoutForm::from(args);
        assert_eq!(form.first_name, "Ama");
        assert_eq!(form.payment_method, PaymentMethod::Paystack);
        assert!(form.last_name.is_empty());
    }
}
