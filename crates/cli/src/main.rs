//! certdesk CLI - database management for the certdesk server.
//!
//! # Usage
//!
//! ```bash
//! # Create or upgrade the certdesk schema
//! certdesk migrate
//!
//! # List applied and pending migrations without running them
//! certdesk migrate --dry-run
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "certdesk")]
#[command(author, version, about = "certdesk CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate {
        /// Report pending migrations without applying them
        #[arg(long)]
        dry_run: bool,
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
        Commands::Migrate { dry_run } => {
            if dry_run {
                commands::migrate::pending().await?;
            } else {
                commands::migrate::run().await?;
            }
        }
    }
    Ok(())
}
