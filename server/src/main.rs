mod config;
mod employees;
mod export;
mod http;
mod samples;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use platform_db::{DatabaseSettings, EmployeeStore, SqlEmployeeStore, connect};
use platform_obs::{ObsConfig, init_tracing};
use tracing::info;

use crate::{
    config::AppConfig,
    http::{AppState, ServeConfig},
};

#[derive(Parser, Debug)]
#[command(name = "employees-server", version, about = "Employees CRUD API")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP server.
    Serve(ServeCommand),
    /// Render the employee spreadsheet to a local file instead of serving it.
    Export {
        #[arg(long, value_name = "FILE", help = "Destination file path")]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct ServeCommand {
    #[arg(long, default_value = "0.0.0.0")]
    host: std::net::IpAddr,
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

impl From<ServeCommand> for ServeConfig {
    fn from(value: ServeCommand) -> Self {
        ServeConfig::new(value.host, value.port)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing(ObsConfig::default())?;
    let cli = Cli::parse();
    let config = Arc::new(AppConfig::load()?);
    match cli.command {
        Command::Serve(cmd) => run_server(cmd, config).await,
        Command::Export { output } => run_export(output).await,
    }
}

async fn setup_store() -> Result<SqlEmployeeStore> {
    let settings = DatabaseSettings::from_env();
    let pool = connect(&settings).await?;
    Ok(SqlEmployeeStore::new(pool))
}

async fn run_server(cmd: ServeCommand, config: Arc<AppConfig>) -> Result<()> {
    let store = Arc::new(setup_store().await?);
    // Process-wide outbound client, constructed once and injected; the html
    // sample handlers share it across requests.
    let http_client = reqwest::Client::builder()
        .user_agent(concat!("employees-server/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(config.outbound_timeout_secs))
        .build()
        .context("failed to build outbound HTTP client")?;
    let state = AppState {
        store,
        http_client,
        config,
    };
    http::serve(cmd.into(), state).await
}

async fn run_export(output: Option<PathBuf>) -> Result<()> {
    let store = setup_store().await?;
    let employees = store.list().await?;
    let workbook = export::render_workbook(&employees)?;
    let target = output.unwrap_or_else(|| PathBuf::from(export::timestamped_filename(Utc::now())));
    std::fs::write(&target, workbook)
        .with_context(|| format!("failed to write {}", target.display()))?;
    info!(path = %target.display(), rows = employees.len(), "employee export written");
    Ok(())
}
