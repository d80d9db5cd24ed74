//! Route handlers organized by resource
//!
//! Every handler runs in one transaction taken from the pool and finished
//! with `db::settle`. Reads map database failures to 5xx; commands map
//! them to 400 after the rollback.

pub mod artists;
pub mod health;
pub mod home;
pub mod shows;
pub mod venues;

use serde::Deserialize;
use sqlx::{Postgres, Transaction};

use crate::db::DbError;
use crate::http::server::AppState;
use crate::models::FormErrors;

/// How many recent venues/artists the home page shows
const RECENT_LIMIT: i64 = 10;

/// Search box submission (`application/x-www-form-urlencoded`)
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchForm {
    pub search_term: String,
}

/// Result of an edit: either written, or sent back with its errors
pub enum EditOutcome<T, F> {
    Saved(T),
    Rejected(F, FormErrors),
}

async fn begin(state: &AppState) -> Result<Transaction<'static, Postgres>, DbError> {
    Ok(state.pool.begin().await?)
}
