//! CLI administration tool for snaplink.
//!
//! Inspects users and link totals and checks the database without going
//! through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # List registered users
//! cargo run --bin admin -- user list
//!
//! # Create a user (prompts for missing fields)
//! cargo run --bin admin -- user create --username alice --email alice@example.com
//!
//! # View totals
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string

use snaplink::application::services::validate_registration;
use snaplink::domain::entities::NewUser;
use snaplink::domain::repositories::{LinkRepository, UserRepository};
use snaplink::infrastructure::persistence::{PgLinkRepository, PgUserRepository};
use snaplink::infrastructure::security::PasswordHasher;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input, Password};
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing snaplink.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Show link, click, and user totals
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// List registered users
    List,

    /// Create a user
    Create {
        #[arg(short, long)]
        username: Option<String>,

        #[arg(short, long)]
        email: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

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
    let pool = Arc::new(pool);

    let users = PgUserRepository::new(pool.clone());
    let links = PgLinkRepository::new(pool.clone());

    match cli.command {
        Commands::User { action } => match action {
            UserAction::List => list_users(&users).await?,
            UserAction::Create {
                username,
                email,
                yes,
            } => create_user(&users, username, email, yes).await?,
        },
        Commands::Stats => show_stats(&links, &users).await?,
        Commands::Db { action } => handle_db_action(action, &links, &pool).await?,
    }

    Ok(())
}

/// Lists all users, oldest first.
///
/// ```text
/// 👥 Users
///
///   ID  Username             Email                          Created
///   ──────────────────────────────────────────────────────────────────────
///   1   alice                alice@example.com              2025-06-01 10:30
/// ```
async fn list_users(users: &PgUserRepository) -> Result<()> {
    println!("{}", "👥 Users".bright_blue().bold());
    println!();

    let all = users
        .list()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list users: {}", e))?;

    if all.is_empty() {
        println!("{}", "  No users found".yellow());
        println!();
        println!(
            "  Create one with: {} admin user create",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<4} {:<20} {:<30} {}",
        "ID".bright_white().bold(),
        "Username".bright_white().bold(),
        "Email".bright_white().bold(),
        "Created".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for user in &all {
        println!(
            "  {:<4} {:<20} {:<30} {}",
            user.id.to_string().bright_black(),
            user.username.cyan(),
            user.email,
            user.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black()
        );
    }

    println!();
    println!("  Total: {}", all.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

/// Creates a user with interactive prompts for missing fields.
///
/// The password is always prompted for and never accepted as an argument.
async fn create_user(
    users: &PgUserRepository,
    username: Option<String>,
    email: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "👤 Create User".bright_blue().bold());
    println!();

    let username = match username {
        Some(u) => u,
        None => Input::new().with_prompt("Username").interact_text()?,
    };

    let email = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Email").interact_text()?,
    };

    let password = Password::new()
        .with_prompt("Password")
        .with_confirmation("Repeat password", "Passwords do not match")
        .interact()?;

    validate_registration(&username, &email, &password)
        .map_err(|e| anyhow::anyhow!("Invalid input: {}", e))?;

    if users
        .find_by_username_or_email(&username, &email)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .is_some()
    {
        println!("{}", "⚠️  Username or email is already in use".yellow());
        return Ok(());
    }

    println!();
    println!("  Username: {}", username.cyan());
    println!("  Email:    {}", email.cyan());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this user?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let password_hash = PasswordHasher::new()
        .hash(&password)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;

    let user = users
        .insert(NewUser {
            username,
            email,
            password_hash,
        })
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create user: {}", e))?;

    println!();
    println!(
        "{} (id {})",
        "✅ User created successfully!".green().bold(),
        user.id
    );
    println!();

    Ok(())
}

/// Displays link, click, and user totals.
async fn show_stats(links: &PgLinkRepository, users: &PgUserRepository) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let link_count = links.count().await?;
    let click_count = links.total_clicks().await?;
    let user_count = users.count().await?;

    println!(
        "  Links:  {}",
        link_count.to_string().bright_green().bold()
    );
    println!(
        "  Clicks: {}",
        click_count.to_string().bright_green().bold()
    );
    println!(
        "  Users:  {}",
        user_count.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

async fn handle_db_action(action: DbAction, links: &PgLinkRepository, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            links.ping().await?;

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
