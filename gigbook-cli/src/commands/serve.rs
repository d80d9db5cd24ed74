//! HTTP server command
//!
//! Resolves settings, connects the pool, bootstraps the schema, then serves
//! until Ctrl+C or SIGTERM.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;

use gigbook_server::db::{create_pool_with_options, migrations};
use gigbook_server::http::{run_server, ServerConfig};

use crate::config::{ConnectionArgs, GigbookConfig, Settings};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs, config_path: Option<&Path>) -> Result<()> {
    let file = GigbookConfig::load(config_path)?;
    let settings = Settings::resolve(&file, &args.connection, args.cors_permissive);

    let database_url = settings.database_url.clone().context(
        "DATABASE_URL not set. Set via --database-url, DATABASE_URL env, .env, \
         or [database] url in ~/.gigbook/config.toml",
    )?;

    tracing::info!(
        bind = %settings.bind,
        max_connections = settings.max_connections,
        "Starting gigbook server"
    );

    let pool = create_pool_with_options(
        &database_url,
        settings.max_connections,
        settings.acquire_timeout,
    )
    .await
    .context("Failed to create database pool")?;

    migrations::run(&pool)
        .await
        .context("Failed to bootstrap database schema")?;

    let config = ServerConfig {
        bind_addr: settings.bind,
        cors_permissive: settings.cors_permissive,
    };

    // Run server (blocks until shutdown)
    run_server(pool, config).await.context("Server error")?;

    Ok(())
}
