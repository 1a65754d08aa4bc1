use std::io::{BufRead, Write};
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use patterning_core::{AccessGate, AdminConfig};
use patterning_service::{DashboardSession, PatternService};
use patterning_storage::StoreBackend;
use tracing_subscriber::EnvFilter;

mod commands;
mod render;

#[derive(Parser)]
#[command(name = "patterning-admin")]
#[command(about = "Review and delete pattern records in the remote store", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the dashboard JSON API
    Serve {
        #[arg(short, long, default_value = "37780")]
        port: u16,
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,
    },
    /// Show the most recent patterns
    List {
        /// Access code; prompted for when omitted
        #[arg(long)]
        password: Option<String>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Delete one voicing by id
    Delete {
        id: String,
        /// Access code; prompted for when omitted
        #[arg(long)]
        password: Option<String>,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

pub(crate) fn load_config() -> Result<AdminConfig> {
    let config = AdminConfig::from_env()?;
    config.warn_if_insecure();
    Ok(config)
}

pub(crate) async fn connect_patterns(config: &AdminConfig) -> Result<Arc<PatternService>> {
    let backend = StoreBackend::connect(&config.store, config.http_timeout_secs).await?;
    tracing::info!(backend = backend.kind(), "pattern store connected");
    Ok(Arc::new(PatternService::new(Arc::new(backend))))
}

/// Print `message` to stderr and read one line from stdin, without the
/// line terminator.
pub(crate) fn prompt_line(message: &str) -> Result<String> {
    eprint!("{message}");
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    let line = line.strip_suffix('\n').unwrap_or(&line);
    Ok(line.strip_suffix('\r').unwrap_or(line).to_owned())
}

/// Unlock a session with the given or prompted access code.
pub(crate) async fn open_session(
    config: &AdminConfig,
    password: Option<String>,
) -> Result<DashboardSession> {
    let password = match password {
        Some(p) => p,
        None => prompt_line("Access code: ")?,
    };
    let patterns = connect_patterns(config).await?;
    let mut session =
        DashboardSession::new(AccessGate::new(config.admin_password.as_str()), patterns);
    session.unlock(&password).await?;
    Ok(session)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, host } => commands::serve::run(port, host).await,
        Commands::List { password, json } => commands::list::run(password, json).await,
        Commands::Delete { id, password, yes } => commands::delete::run(id, password, yes).await,
    }
}
