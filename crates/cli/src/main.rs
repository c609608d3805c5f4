//! Rocket Shoes CLI - drive the shopping cart from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Show the saved cart
//! rs-cart show
//!
//! # Add one unit of product 3
//! rs-cart add 3
//!
//! # Set product 3 to two units
//! rs-cart update 3 2
//!
//! # Remove product 3
//! rs-cart remove 3
//!
//! # Totals only, as JSON
//! rs-cart --format json summary
//! ```
//!
//! Each invocation is one shopping session: the cart is loaded from
//! `CART_STORE_PATH`, the command runs against the inventory service at
//! `INVENTORY_BASE_URL`, and any accepted change is written back.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use rocket_shoes_core::ProductId;
use rocket_shoes_storefront::CartManager;
use rocket_shoes_storefront::config::CartConfig;
use rocket_shoes_storefront::inventory::HttpInventory;
use rocket_shoes_storefront::notify::Notifier;
use rocket_shoes_storefront::store::FileStore;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::cart::{CommandError, OutputFormat};

#[derive(Parser)]
#[command(name = "rs-cart")]
#[command(author, version, about = "Rocket Shoes cart tools")]
struct Cli {
    /// Output format for the cart
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the cart
    Show,
    /// Show cart totals
    Summary,
    /// Add one unit of a product
    Add {
        /// Product ID
        product_id: ProductId,
    },
    /// Remove a product from the cart
    Remove {
        /// Product ID
        product_id: ProductId,
    },
    /// Set the quantity of a product already in the cart
    Update {
        /// Product ID
        product_id: ProductId,
        /// New quantity (absolute, at least 1)
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
}

/// Shows cart notifications on stderr.
struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn error(&self, message: &str) {
        let _ = writeln!(std::io::stderr().lock(), "error: {message}");
    }
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &CartConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN | tracing::Level::INFO => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match CartConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            let _ = writeln!(std::io::stderr().lock(), "configuration error: {e}");
            std::process::exit(2);
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Defaults to warn so notifications are not duplicated by info logs
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "rocket_shoes_storefront=warn,rs_cart=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if let Err(e) = run(cli, &config).await {
        // Cart rejections were already shown by the notifier.
        let shown = e
            .downcast_ref::<CommandError>()
            .is_some_and(|err| matches!(err, CommandError::Cart(_)));
        if !shown {
            tracing::error!("Command failed: {e}");
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &CartConfig) -> Result<(), Box<dyn std::error::Error>> {
    let inventory = HttpInventory::new(&config.inventory)?;
    let store = FileStore::new(&config.store_path);
    tracing::debug!(store = %store.path().display(), "Opening cart store");

    let cart = CartManager::new(Arc::new(inventory), Arc::new(store), Arc::new(StderrNotifier));
    let format = cli.format;

    match cli.command {
        Commands::Show => commands::cart::show(&cart, format)?,
        Commands::Summary => commands::cart::summary(&cart, format)?,
        Commands::Add { product_id } => commands::cart::add(&cart, product_id, format).await?,
        Commands::Remove { product_id } => commands::cart::remove(&cart, product_id, format)?,
        Commands::Update { product_id, amount } => {
            commands::cart::update(&cart, product_id, amount, format).await?;
        }
    }
    Ok(())
}
