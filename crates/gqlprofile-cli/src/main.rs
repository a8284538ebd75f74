//! gqlprofile - render a Zone01 GraphQL profile dashboard to HTML.
//!
//! Signs in against the platform, fetches the profile data and writes a
//! standalone dashboard page with hand-drawn SVG charts.

mod app;
mod terminal;

use std::io;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::App;
use gqlprofile_core::Config;

/// Log file written inside the cache directory
const LOG_FILE: &str = "gqlprofile.log";

#[derive(Parser)]
#[command(name = "gqlprofile")]
#[command(author, version, about = "Render your GraphQL profile as an HTML dashboard", long_about = None)]
struct Cli {
    /// Where to write the dashboard (overrides the configured output path)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Log in if needed and write the dashboard (default)
    Show,
    /// Sign in and store a fresh token
    Login,
    /// Remove the stored token
    Logout,
    /// Show the stored session
    Status,
}

/// Initialize the tracing subscriber for logging.
/// The returned guard flushes the log file on drop.
fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match log_dir.filter(|dir| std::fs::create_dir_all(dir).is_ok()) {
        Some(dir) => {
            let appender = tracing_appender::rolling::never(dir, LOG_FILE);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let log_dir = Config::default().cache_dir().ok();
    let _guard = init_tracing(log_dir.as_deref());
    info!(command = ?cli.command, "gqlprofile starting");

    let mut app = App::new(cli.output)?;

    match cli.command.unwrap_or(Command::Show) {
        Command::Show => app.run().await?,
        Command::Login => app.login().await?,
        Command::Logout => app.logout(),
        Command::Status => app.status(),
    }

    info!("gqlprofile finished");
    Ok(())
}
