//! Database layer - connection pool, schema and repositories
//!
//! # Design Principles
//!
//! - One transaction per request; repositories borrow its connection
//! - All list operations use JOINs - no N+1 queries
//! - Rely on DB constraints and classify their failures - no check-then-insert
//! - The current time is a query parameter, never read inside SQL

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repos;

use sqlx::{Postgres, Transaction};

pub use error::{ConstraintKind, DbError};
pub use pool::{create_pool, create_pool_with_options};
pub use repos::*;

/// Finish a request transaction: commit on success, roll back on error.
///
/// A failed rollback is logged and the original error is returned.
pub async fn settle<T>(
    tx: Transaction<'_, Postgres>,
    result: Result<T, DbError>,
) -> Result<T, DbError> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::warn!(error = %rollback_err, "rollback failed");
            }
            Err(err)
        }
    }
}
