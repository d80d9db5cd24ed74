//! gigbook-server: booking directory for venues, artists and shows
//!
//! - `models`: records, submitted forms and their validation, read models
//! - `db`: connection pool, schema bootstrap, repositories
//! - `http`: axum router, handlers and error mapping

pub mod db;
pub mod http;
pub mod models;

pub use db::{create_pool, create_pool_with_options, DbError};
pub use http::{build_router, run_server, AppState, ServerConfig, ServerError};
