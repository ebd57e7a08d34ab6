//! CLI administration tool for urler.
//!
//! Inspects and manages short URLs directly in the database, without going
//! through the HTTP API (and therefore without the host blocklist).
//!
//! # Usage
//!
//! ```bash
//! # Check database connection
//! cargo run --bin admin -- db check
//!
//! # View store-wide statistics
//! cargo run --bin admin -- stats
//!
//! # Inspect one short URL
//! cargo run --bin admin -- url show aB3xYz
//!
//! # Soft-delete a short URL
//! cargo run --bin admin -- url delete aB3xYz --yes
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string

use urler::domain::repositories::ShortUrlRepository;
use urler::infrastructure::persistence::PgShortUrlRepository;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing urler.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Inspect or delete short URLs
    Url {
        #[command(subcommand)]
        action: UrlAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum UrlAction {
    /// Show a short URL and its request count
    Show {
        /// The 6-character short form
        short_form: String,
    },

    /// Soft-delete a short URL
    Delete {
        /// The 6-character short form
        short_form: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    let repo = PgShortUrlRepository::new(Arc::new(pool.clone()));

    match cli.command {
        Commands::Url { action } => handle_url_action(action, &repo).await?,
        Commands::Stats => handle_stats(&repo).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn handle_url_action(action: UrlAction, repo: &PgShortUrlRepository) -> Result<()> {
    match action {
        UrlAction::Show { short_form } => show_url(repo, &short_form).await,
        UrlAction::Delete { short_form, yes } => delete_url(repo, &short_form, yes).await,
    }
}

/// Prints one short URL with its state and request count.
///
/// # Output Format
///
/// ```text
/// 🔗 Short URL aB3xYz
///
///   Origin:    http://ya.ru
///   Short URL: http://127.0.0.1:8080/api/v1/short_url/aB3xYz
///   Created:   2024-01-15 10:30
///   Status:    ACTIVE
///   Requests:  2
/// ```
async fn show_url(repo: &PgShortUrlRepository, short_form: &str) -> Result<()> {
    let url = repo
        .find_by_short_form(short_form)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .context("Short URL not found")?;

    let requests = repo
        .count_requests(url.id)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    let status = if url.is_deleted() {
        "DELETED".red()
    } else {
        "ACTIVE".green()
    };

    println!(
        "{} {}",
        "🔗 Short URL".bright_blue().bold(),
        url.short_form.bright_white().bold()
    );
    println!();
    println!("  Origin:    {}", url.origin_url.cyan());
    println!("  Short URL: {}", url.short_url.bright_black());
    println!(
        "  Created:   {}",
        url.created_at.format("%Y-%m-%d %H:%M").to_string().bright_black()
    );
    println!("  Status:    {}", status);
    println!(
        "  Requests:  {}",
        requests.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Soft-deletes a short URL after confirmation (default: No).
async fn delete_url(repo: &PgShortUrlRepository, short_form: &str, skip_confirm: bool) -> Result<()> {
    println!("{}", "🗑️  Delete Short URL".bright_blue().bold());
    println!();

    let url = repo
        .find_by_short_form(short_form)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .context("Short URL not found")?;

    if url.is_deleted() {
        println!("{}", "⚠️  This short URL is already deleted".yellow());
        return Ok(());
    }

    println!("  Short form: {}", url.short_form.cyan());
    println!("  Origin:     {}", url.origin_url.bright_black());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this short URL?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    repo.mark_deleted(short_form)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete short URL: {}", e))?;

    println!();
    println!("{}", "✅ Short URL deleted".green().bold());
    println!();

    Ok(())
}

/// Displays store-wide statistics.
async fn handle_stats(repo: &PgShortUrlRepository) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let totals = repo
        .totals()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load statistics: {}", e))?;

    println!(
        "  Short URLs: {}",
        totals.short_urls.to_string().bright_green().bold()
    );
    println!(
        "  Deleted:    {}",
        totals.deleted_short_urls.to_string().bright_red().bold()
    );
    println!(
        "  Requests:   {}",
        totals.requests.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
    }

    Ok(())
}
