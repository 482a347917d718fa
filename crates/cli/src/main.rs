//! Safar CLI - database migrations and operator tools.
//!
//! # Usage
//!
//! ```bash
//! # Create the documents and session tables
//! safar migrate
//!
//! # Grant admin rights without going through the HTTP API
//! safar admin allow -e ops@example.com --by owner@example.com
//! safar admin revoke -e ops@example.com
//! safar admin list
//!
//! # Load packages, hotels and flights
//! safar seed catalog -f crates/cli/catalog.example.yaml
//! ```
//!
//! Every command reads `SAFAR_DATABASE_URL` (falling back to `DATABASE_URL`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "safar")]
#[command(author, version, about = "Safar operator tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage the admin allowlist
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Seed the store from files
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Allow an email to use the admin console
    Allow {
        /// Email address to allow
        #[arg(short, long)]
        email: String,

        /// Recorded as `createdBy` on the entry
        #[arg(long, default_value = "cli")]
        by: String,
    },
    /// Remove an email from the allowlist
    Revoke {
        /// Email address to revoke
        #[arg(short, long)]
        email: String,
    },
    /// List allowlisted emails
    List,
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Load packages, hotels and flights from a YAML file
    Catalog {
        /// Path to the YAML file
        #[arg(short, long)]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Admin { action } => match action {
            AdminAction::Allow { email, by } => commands::admin::allow(&email, &by).await?,
            AdminAction::Revoke { email } => commands::admin::revoke(&email).await?,
            AdminAction::List => commands::admin::list().await?,
        },
        Commands::Seed { target } => match target {
            SeedTarget::Catalog { file } => commands::seed::catalog(&file).await?,
        },
    }
    Ok(())
}
