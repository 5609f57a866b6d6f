//! Guestlist - admin console for event guests
//!
//! Main entry point for the guestlist CLI.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod drafts;
mod export;
mod table;

use commands::{accompanies, auth, drafts as draft_cmd, guests, invitation, repl};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// Guestlist - admin console for event guests
#[derive(Parser)]
#[command(name = "guestlist")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    /// Server URL (default: http://localhost:5000)
    #[arg(long, global = true, env = "GUESTLIST_SERVER_URL")]
    pub server: Option<String>,

    /// Config directory (default: ~/.config/guestlist)
    #[arg(long, global = true, env = "GUESTLIST_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check admin credentials and show the profile
    Login(auth::LoginArgs),

    /// Show the signed-in admin
    Whoami,

    /// Request a password reset link
    ForgotPassword(auth::ForgotPasswordArgs),

    /// Guest management
    Guests(guests::GuestsArgs),

    /// Accompanying guests
    Accompanies(accompanies::AccompaniesArgs),

    /// Public invitation registration
    Invitation(invitation::InvitationArgs),

    /// Saved form drafts
    Drafts(draft_cmd::DraftsArgs),

    /// Interactive console
    Console(repl::ConsoleArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = guestlist_config::load_config(cli.config_dir.as_deref(), None)?;

    // Tracing: human-readable on stderr, daily-rolling JSON file under the config dir
    let filter = if cli.verbose {
        "guestlist=debug,guestlist_client=debug,guestlist_config=debug,info"
    } else {
        "guestlist=info,guestlist_client=info,warn"
    };

    let log_dir = loaded.config_dir.join("logs");
    let file_appender = tracing_appender::rolling::daily(&log_dir, "guestlist.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    use tracing_subscriber::prelude::*;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .with_filter(tracing_subscriber::EnvFilter::new(filter)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(tracing_subscriber::EnvFilter::new(
                    "guestlist=trace,guestlist_client=trace,guestlist_config=trace,info",
                )),
        )
        .init();

    for warning in &loaded.warnings {
        tracing::warn!("{}", warning);
    }
    for path in loaded.loaded_from() {
        tracing::debug!(path = %path.display(), "loaded config");
    }

    // Create context for commands
    let ctx = commands::Context {
        server_url: loaded.config.server_url(cli.server.as_deref()),
        json_output: cli.json,
        verbose: cli.verbose,
        config: loaded.config,
        config_dir: loaded.config_dir,
    };

    // Dispatch to command handlers
    let result = match cli.command {
        Commands::Login(args) => auth::login(args, &ctx).await,
        Commands::Whoami => auth::whoami(&ctx).await,
        Commands::ForgotPassword(args) => auth::forgot_password(args, &ctx).await,
        Commands::Guests(args) => guests::run(args, &ctx).await,
        Commands::Accompanies(args) => accompanies::run(args, &ctx).await,
        Commands::Invitation(args) => invitation::run(args, &ctx).await,
        Commands::Drafts(args) => draft_cmd::run(args, &ctx).await,
        Commands::Console(args) => repl::run(args, &ctx).await,
    };

    if let Err(e) = result {
        commands::print_error(&format!("{e:#}"));
        drop(guard);
        std::process::exit(1);
    }
    drop(guard);
    Ok(())
}
