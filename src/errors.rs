//! Unified error types and result handling for the engine.

use thiserror::Error;

/// All failures the engine can surface to a caller.
///
/// Interactive operations propagate these directly; the daily scan never lets
/// them escape its per-item loop (they are logged and counted instead).
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {message}")]
    Config { message: String },

    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// The referenced record is missing or belongs to another owner. The two
    /// cases are deliberately indistinguishable to the caller.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// An upstream caller supplied a date string that does not parse. The
    /// operation is rejected; there is no fallback to "now".
    #[error("invalid date: {value:?}")]
    InvalidDate { value: String },

    #[error("invalid amount: {amount}")]
    InvalidAmount { amount: f64 },

    /// A transaction kind other than `DEBIT` or `CREDIT`.
    #[error("invalid transaction kind: {kind:?}")]
    InvalidKind { kind: String },

    #[error("notification delivery failed: {reason}")]
    NotificationDelivery { reason: String },

    #[error("scheduler error: {0}")]
    Scheduler(#[from] tokio_cron_scheduler::JobSchedulerError),
}

impl Error {
    /// True when the underlying store reported per-record contention (SQLite
    /// lock errors, or an update that matched zero rows because the record
    /// changed under us). Mutating operations retry their whole
    /// read-recompute-write unit once when this holds.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        match self {
            Self::Database(sea_orm::DbErr::RecordNotUpdated) => true,
            Self::Database(err) => {
                let text = err.to_string();
                text.contains("database is locked") || text.contains("database table is locked")
            }
            _ => false,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        Self::NotificationDelivery {
            reason: value.to_string(),
        }
    }
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
