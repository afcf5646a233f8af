//! GoMarketplace CLI - Inspect and edit the persisted cart.
//!
//! # Usage
//!
//! ```bash
//! # Show the stored cart
//! gm-cart show
//!
//! # Add a product (or one more unit of it)
//! gm-cart add --id 1 --title "Cadeira Gamer" --image-url https://img/1.png --price 1200.5
//!
//! # Change quantities
//! gm-cart increment 1
//! gm-cart decrement 1
//!
//! # Remove the stored cart
//! gm-cart clear
//! ```
//!
//! # Environment Variables
//!
//! See `go_marketplace_cart::config`. `--dir` and `--key` override
//! `CART_STORAGE_DIR` and `CART_STORAGE_KEY`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "gm-cart")]
#[command(author, version, about = "GoMarketplace cart tools")]
struct Cli {
    /// Directory the cart is stored in
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Storage key the cart is stored under
    #[arg(long, global = true)]
    key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the stored cart
    Show,
    /// Add one unit of a product
    Add {
        /// Product ID
        #[arg(long)]
        id: String,

        /// Product title
        #[arg(long)]
        title: String,

        /// Product image URL
        #[arg(long)]
        image_url: String,

        /// Unit price
        #[arg(long)]
        price: f64,
    },
    /// Add one unit to a product already in the cart
    Increment {
        /// Product ID
        id: String,
    },
    /// Remove one unit of a product, dropping it at zero
    Decrement {
        /// Product ID
        id: String,
    },
    /// Empty the cart and delete it from storage
    Clear,
}

#[tokio::main]
async fn main() {
    // Defaults to info level for the cart crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "go_marketplace_cart=info,gm_cart=info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = go_marketplace_cart::CartConfig::from_env()?;
    if let Some(dir) = cli.dir {
        config.storage_dir = dir;
    }
    if let Some(key) = cli.key {
        config.storage_key = key;
    }

    let session = commands::cart::Session::open(&config).await?;
    let result = match cli.command {
        Commands::Show => {
            commands::cart::show(session.cart());
            Ok(())
        }
        Commands::Add {
            id,
            title,
            image_url,
            price,
        } => commands::cart::add(session.cart(), id, title, image_url, price).await,
        Commands::Increment { id } => commands::cart::increment(session.cart(), &id).await,
        Commands::Decrement { id } => commands::cart::decrement(session.cart(), &id).await,
        Commands::Clear => commands::cart::clear(session.cart()).await,
    };
    session.close().await;

    Ok(result?)
}
