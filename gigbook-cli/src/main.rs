//! gigbook CLI - runs the booking directory server
//!
//! - `serve`: connect to PostgreSQL, bootstrap the schema, serve HTTP
//! - `config`: show where configuration comes from and what it resolves to

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "gigbook",
    author,
    version,
    about = "Booking directory for venues, artists and shows",
    long_about = "Serve the gigbook HTTP API backed by PostgreSQL. Settings come from flags, \
                  then environment (.env included), then ~/.gigbook/config.toml."
)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    debug: bool,

    /// Config file (default: ~/.gigbook/config.toml)
    #[arg(long, global = true, value_name = "PATH", env = "GIGBOOK_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server
    Serve(commands::serve::ServeArgs),
    /// Inspect configuration (path, show)
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env never overrides variables already set
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug }).ok();

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args, cli.config.as_deref()).await?,
        Commands::Config(args) => config::run_config(args, cli.config.as_deref())?,
    }
    Ok(())
}
