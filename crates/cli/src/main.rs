//! Shopfront CLI - Database migrations and catalog tools.
//!
//! # Usage
//!
//! ```bash
//! # Run document store migrations
//! sf-cli migrate
//!
//! # Load products and SKUs from a YAML file
//! sf-cli seed crates/cli/seed/catalog.yaml
//!
//! # Inspect the catalog
//! sf-cli products list
//! sf-cli products show 2
//! ```
//!
//! All commands read `SHOPFRONT_DATABASE_URL` (or `DATABASE_URL`) and the
//! other `SHOPFRONT_*` settings the API uses.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "sf-cli")]
#[command(author, version, about = "Shopfront CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed products and SKUs from a YAML file
    Seed {
        /// Path to the YAML seed file
        file: PathBuf,
    },
    /// Inspect the product catalog
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
}

#[derive(Subcommand)]
enum ProductAction {
    /// List every product
    List,
    /// Show the product with the given application id
    Show {
        /// Product id
        id: i64,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { file } => commands::seed::catalog(&file).await?,
        Commands::Products { action } => match action {
            ProductAction::List => commands::products::list().await?,
            ProductAction::Show { id } => commands::products::show(id).await?,
        },
    }
    Ok(())
}
