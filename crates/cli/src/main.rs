//! León de Guerrero CLI - cart and catalog tools.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! leon catalog products --category espadin
//! leon catalog product tobala-silvestre
//!
//! # Work with the persisted cart
//! leon cart add tobala-silvestre -q 2
//! leon cart update 2 1
//! leon cart show
//! leon cart clear
//! ```
//!
//! # Commands
//!
//! - `cart` - Show and change the cart stored under `LEON_DATA_DIR`
//! - `catalog` - List products, categories and stockists; show pages and site settings

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use leon_cart::{CartEngine, FileStore};
use leon_catalog::{CatalogSource, FixtureCatalog};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{Layer, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use commands::CliError;
use commands::catalog::ProductFilter;
use config::{CliConfig, LogFormat};

#[derive(Parser)]
#[command(name = "leon")]
#[command(author, version, about = "León de Guerrero storefront tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show and change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Browse the product catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart contents and totals
    Show,
    /// Add a product by slug
    Add {
        /// Product slug
        slug: String,

        /// Number of units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a line item by product ID
    Remove {
        /// Product ID
        id: String,
    },
    /// Set a line item's quantity (0 or less removes it)
    Update {
        /// Product ID
        id: String,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove every line item
    Clear,
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List products
    Products {
        /// Only products in this category slug
        #[arg(short, long)]
        category: Option<String>,

        /// Only featured products
        #[arg(long)]
        featured: bool,

        /// Only products on sale
        #[arg(long)]
        on_sale: bool,
    },
    /// Show one product by slug
    Product {
        /// Product slug
        slug: String,
    },
    /// List product categories
    Categories,
    /// List stockist locations
    Stockists,
    /// Show a content page by slug
    Page {
        /// Page slug
        slug: String,
    },
    /// Show site settings
    Site,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &CliConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// Install the tracing subscriber: env filter, text or JSON output, Sentry.
fn init_tracing(format: LogFormat) {
    // Defaults to info level if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());

    let fmt_layer = match format {
        LogFormat::Pretty => tracing_subscriber::fmt::layer().with_target(false).boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer().json().boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match CliConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(LogFormat::Pretty);
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let sentry_guard = init_sentry(&config);
    init_tracing(config.log_format);
    if sentry_guard.is_some() {
        tracing::debug!("Sentry initialized");
    }

    if let Err(e) = run(cli, &config).await {
        tracing::error!("Command failed: {e}");
        // process::exit skips destructors; flush Sentry first
        drop(sentry_guard);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &CliConfig) -> Result<(), CliError> {
    match cli.command {
        Commands::Cart { action } => {
            let store = FileStore::new(&config.data_dir);
            let mut engine = CartEngine::with_policy(store, config.price_policy)?;

            match action {
                CartAction::Show => {
                    commands::cart::show(&engine);
                }
                CartAction::Add { slug, quantity } => {
                    let catalog = CatalogSource::from_config(&config.catalog);
                    commands::cart::add(&mut engine, &catalog, &slug, quantity).await?;
                }
                CartAction::Remove { id } => commands::cart::remove(&mut engine, &id)?,
                CartAction::Update { id, quantity } => {
                    commands::cart::update(&mut engine, &id, quantity)?;
                }
                CartAction::Clear => commands::cart::clear(&mut engine)?,
            }
        }
        Commands::Catalog { action } => {
            let catalog = CatalogSource::from_config(&config.catalog);

            match action {
                CatalogAction::Products {
                    category,
                    featured,
                    on_sale,
                } => {
                    let filter = ProductFilter {
                        category,
                        featured,
                        on_sale,
                    };
                    commands::catalog::products(&catalog, &filter).await;
                }
                CatalogAction::Product { slug } => {
                    commands::catalog::product(&catalog, &slug).await?;
                }
                CatalogAction::Categories => {
                    commands::catalog::categories(&catalog).await;
                }
                CatalogAction::Stockists => {
                    commands::catalog::stockists(&FixtureCatalog::load());
                }
                CatalogAction::Page { slug } => {
                    commands::catalog::page(&catalog, &slug).await?;
                }
                CatalogAction::Site => {
                    commands::catalog::site(&catalog).await;
                }
            }
        }
    }
    Ok(())
}
