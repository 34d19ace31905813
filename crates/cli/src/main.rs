//! MTP Food CLI - browse the menu, manage the cart, and book a table.
//!
//! # Usage
//!
//! ```bash
//! # Browse the menu
//! mtp menu --search pho --filter under200
//! mtp food 3
//!
//! # Manage the cart (persisted in MTP_STORAGE_DIR between runs)
//! mtp cart add 3 -q 2
//! mtp cart inc 1718000000001
//! mtp cart show
//!
//! # Book a table with the current cart
//! mtp book -n "Nguyễn Văn An" -p 0901234567 -e an@example.com -g 4 -d 2030-06-01T19:00
//!
//! # Look up a booking
//! mtp booking BK1A2B3C4D
//! ```
//!
//! # Commands
//!
//! - `menu` - List foods, optionally searched and filtered
//! - `food` - Show one food with related suggestions
//! - `cart` - Show or change the cart
//! - `book` - Submit a booking for the cart
//! - `booking` - Look up a booking by code
//! - `stats` - Show dashboard statistics

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use mtp_food_core::{BookingCode, CartId, FoodId};
use mtp_food_storefront::api::ApiClient;
use mtp_food_storefront::booking::{BookingError, BookingForm};
use mtp_food_storefront::config::StorefrontConfig;
use mtp_food_storefront::menu::MenuFilter;
use mtp_food_storefront::session::CartSession;
use mtp_food_storefront::storage::FileStore;
use mtp_food_storefront::{Result, StorefrontError};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "mtp")]
#[command(author, version, about = "MTP Food ordering CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the menu
    Menu {
        /// Case-insensitive text to find in names and descriptions
        #[arg(short, long, default_value = "")]
        search: String,

        /// Category filter (`all`, `premium`, `under200`, `vegan`)
        #[arg(short, long, default_value = "all")]
        filter: MenuFilter,
    },
    /// Show a food with related suggestions
    Food {
        /// Food ID
        id: FoodId,
    },
    /// Show or change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Book a table and pre-order the cart
    Book {
        /// Customer name
        #[arg(short, long)]
        name: String,

        /// Phone number (10 digits starting with 0)
        #[arg(short, long)]
        phone: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Number of guests (1-20)
        #[arg(short, long)]
        guests: String,

        /// Date and time, e.g. 2030-06-01T19:00
        #[arg(short, long)]
        date_time: String,

        /// Note for the restaurant
        #[arg(long, default_value = "")]
        note: String,
    },
    /// Look up a booking by code
    Booking {
        /// Booking code, e.g. BK1A2B3C4D
        code: String,
    },
    /// Show dashboard statistics
    Stats,
}

#[derive(Subcommand)]
enum CartAction {
    /// Show grouped cart contents and total
    Show,
    /// Add a food to the cart
    Add {
        /// Food ID
        food_id: FoodId,

        /// Number of units (1-10)
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Add one more unit like the given cart item
    Inc {
        /// Cart item ID
        cart_id: CartId,
    },
    /// Remove one unit of the given cart item's food
    Dec {
        /// Cart item ID
        cart_id: CartId,
    },
    /// Remove a single cart item
    Remove {
        /// Cart item ID
        cart_id: CartId,
    },
    /// Remove every unit of a food
    RemoveFood {
        /// Food ID
        food_id: FoodId,
    },
    /// Empty the cart
    Clear,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
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

fn init_tracing() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "mtp_food_storefront=info,mtp=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Configuration is needed before Sentry, and Sentry before tracing
    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing();
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(2);
        }
    };
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    if let Err(e) = run(cli, &config).await {
        e.report();
        if let StorefrontError::Booking(BookingError::Validation(errors)) = &e {
            for error in errors.errors() {
                tracing::error!(field = %error.field(), "{error}");
            }
        }
        tracing::error!("{}", e.user_message());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &StorefrontConfig) -> Result<()> {
    let client = ApiClient::new(&config.api);

    match cli.command {
        Commands::Menu { search, filter } => {
            commands::menu::list(&client, &search, filter).await?;
        }
        Commands::Food { id } => commands::menu::show(&client, id).await?,
        Commands::Cart { action } => {
            let mut session = open_session(config);
            match action {
                CartAction::Show => commands::cart::show(&session, client.base_url()),
                CartAction::Add { food_id, quantity } => {
                    commands::cart::add(&client, &mut session, food_id, quantity).await?;
                }
                CartAction::Inc { cart_id } => commands::cart::increment(&mut session, cart_id)?,
                CartAction::Dec { cart_id } => commands::cart::decrement(&mut session, cart_id)?,
                CartAction::Remove { cart_id } => commands::cart::remove(&mut session, cart_id)?,
                CartAction::RemoveFood { food_id } => {
                    commands::cart::remove_food(&mut session, food_id)?;
                }
                CartAction::Clear => commands::cart::clear(&mut session),
            }
            session.unload();
        }
        Commands::Book {
            name,
            phone,
            email,
            guests,
            date_time,
            note,
        } => {
            let form = BookingForm {
                name,
                phone,
                email,
                guests,
                date_time,
                note,
            };
            let mut session = open_session(config);
            let result = commands::booking::book(&client, &form, &mut session).await;
            session.unload();
            result?;
        }
        Commands::Booking { code } => {
            commands::booking::lookup(&client, &BookingCode::new(&code)).await?;
        }
        Commands::Stats => commands::booking::stats(&client).await?,
    }
    Ok(())
}

fn open_session(config: &StorefrontConfig) -> CartSession<FileStore> {
    let mut session = CartSession::open(FileStore::new(&config.storage_dir));
    session.subscribe(|change| tracing::debug!(?change, "Cart changed"));
    session
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_cart_add() {
        let cli = Cli::try_parse_from(["mtp", "cart", "add", "3", "-q", "2"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Cart {
                action: CartAction::Add { quantity: 2, .. }
            })
        ));
    }

    #[test]
    fn test_rejects_unknown_filter() {
        assert!(Cli::try_parse_from(["mtp", "menu", "--filter", "spicy"]).is_err());
    }
}
