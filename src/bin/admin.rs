//! CLI administration tool for shortlink.
//!
//! Provides maintenance commands that work directly against the database,
//! without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Delete expired links now instead of waiting for the scheduled sweep
//! cargo run --bin admin -- sweep
//!
//! # Show statistics for one link, or totals when no code is given
//! cargo run --bin admin -- stats promo
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (or `DB_HOST`, `DB_USER`, ...): PostgreSQL connection

use shortlink::application::services::{ResolveService, SweepService};
use shortlink::config::Config;
use shortlink::domain::clock::{Clock, SystemClock};
use shortlink::domain::repositories::UrlMappingRepository;
use shortlink::infrastructure::persistence::PgUrlMappingRepository;
use shortlink::server::connect_database;
use shortlink::utils::short_url;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing shortlink.
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
    /// Delete expired links now
    Sweep {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show statistics for a link, or totals
    Stats {
        /// Short code to inspect
        code: Option<String>,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
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

    let config = Config::from_env()?;
    let pool = connect_database(&config).await?;

    match cli.command {
        Commands::Sweep { yes } => {
            let service = SweepService::new(repository(&pool), Arc::new(SystemClock));
            sweep(&service, yes).await?;
        }
        Commands::Stats { code: Some(code) } => {
            let service = ResolveService::new(repository(&pool), Arc::new(SystemClock));
            link_stats(&service, &config.base_url, &code).await?;
        }
        Commands::Stats { code: None } => totals(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

fn repository(pool: &PgPool) -> Arc<PgUrlMappingRepository> {
    Arc::new(PgUrlMappingRepository::new(Arc::new(pool.clone())))
}

/// Deletes expired links after showing how many will be removed.
///
/// The count and the deletion use one cutoff taken from the service clock.
/// Returns the number of deleted links.
async fn sweep<R>(service: &SweepService<R>, skip_confirm: bool) -> Result<u64>
where
    R: UrlMappingRepository + ?Sized,
{
    println!("{}", "🧹 Sweep expired links".bright_blue().bold());
    println!();

    let cutoff = service.now();
    let pending = service.count_expired_at(cutoff).await?;

    if pending == 0 {
        println!("{}", "✅ Nothing to sweep".green());
        return Ok(0);
    }

    println!("  Expired links: {}", pending.to_string().yellow().bold());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete them now?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(0);
        }
    }

    let deleted = service
        .sweep_expired_at(cutoff)
        .await
        .map_err(|e| anyhow::anyhow!("Sweep failed: {}", e))?;

    println!();
    println!(
        "{} {}",
        "✅ Deleted expired links:".green().bold(),
        deleted.to_string().bright_green().bold()
    );

    Ok(deleted)
}

/// Prints statistics for a single live link.
///
/// Unknown and expired codes are reported as errors.
async fn link_stats<R>(service: &ResolveService<R>, base_url: &str, code: &str) -> Result<()>
where
    R: UrlMappingRepository + ?Sized,
{
    let stats = service
        .get_stats(code)
        .await
        .with_context(|| format!("No statistics for '{code}'"))?;

    println!("{}", "📊 Link statistics".bright_blue().bold());
    println!();
    println!("  Short URL:  {}", short_url(base_url, code).cyan());
    println!("  Target:     {}", stats.original_url.bright_white());
    println!("  Created:    {}", stats.created_at.to_rfc3339().bright_black());
    println!(
        "  Clicks:     {}",
        stats.click_count.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Prints totals across all links.
async fn totals(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let links_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM url_mappings")
        .fetch_one(pool)
        .await?;

    let clicks_count: i64 =
        sqlx::query_scalar("SELECT COALESCE(SUM(click_count), 0)::BIGINT FROM url_mappings")
            .fetch_one(pool)
            .await?;

    let expired_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM url_mappings WHERE expires_at < $1")
            .bind(SystemClock.now())
            .fetch_one(pool)
            .await?;

    println!(
        "  Links:           {}",
        links_count.to_string().bright_green().bold()
    );
    println!(
        "  Clicks:          {}",
        clicks_count.to_string().bright_green().bold()
    );
    println!(
        "  Awaiting sweep:  {}",
        expired_count.to_string().yellow().bold()
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
