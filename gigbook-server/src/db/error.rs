//! Database error type
//!
//! Driver errors are sorted into what a caller can act on: a missing row, a
//! constraint the data broke, a database we can't reach, or anything else.

use std::fmt;

use sqlx::error::ErrorKind;

/// Which integrity constraint rejected a write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Unique,
    ForeignKey,
    NotNull,
    Check,
    /// Any other SQLSTATE class 23 error (e.g. exclusion)
    Other,
}

impl ConstraintKind {
    fn classify(kind: ErrorKind, code: Option<&str>) -> Option<Self> {
        match kind {
            ErrorKind::UniqueViolation => Some(Self::Unique),
            ErrorKind::ForeignKeyViolation => Some(Self::ForeignKey),
            ErrorKind::NotNullViolation => Some(Self::NotNull),
            ErrorKind::CheckViolation => Some(Self::Check),
            _ if code.is_some_and(|c| c.starts_with("23")) => Some(Self::Other),
            _ => None,
        }
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unique => "unique",
            Self::ForeignKey => "foreign key",
            Self::NotNull => "not-null",
            Self::Check => "check",
            Self::Other => "integrity",
        };
        f.write_str(name)
    }
}

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("{kind} constraint violated: {message}")]
    Constraint {
        kind: ConstraintKind,
        constraint: Option<String>,
        message: String,
    },

    #[error("database unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),

    #[error("timed out waiting for a database connection")]
    Timeout,

    #[error("database error: {0}")]
    Sqlx(#[source] sqlx::Error),
}

impl DbError {
    /// Short machine-readable label used in error responses.
    pub fn kind_label(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Constraint { .. } => "constraint_violation",
            Self::Unavailable(_) => "unavailable",
            Self::Timeout => "timeout",
            Self::Sqlx(_) => "database",
        }
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            let code = db.code();
            if let Some(kind) = ConstraintKind::classify(db.kind(), code.as_deref()) {
                return Self::Constraint {
                    kind,
                    constraint: db.constraint().map(str::to_owned),
                    message: db.message().to_owned(),
                };
            }
        }

        match err {
            sqlx::Error::PoolTimedOut => Self::Timeout,
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => Self::Unavailable(err),
            other => Self::Sqlx(other),
        }
    }
}
