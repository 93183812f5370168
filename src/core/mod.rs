//! Core business logic - framework-agnostic balance, billing, lending, and
//! scan operations.
//!
//! Everything in here takes a database handle plus plain values and returns
//! [`crate::errors::Result`]; no scheduler or HTTP types leak in. The daemon
//! and the tests drive these functions the same way.

pub mod balance;
pub mod billing;
pub mod dates;
pub mod lending;
pub mod scan;

use std::future::Future;

use crate::errors::Result;

/// Runs `op`, and if it fails with a store-contention error (SQLite busy/locked
/// or a lost optimistic update), runs it exactly once more.
///
/// Mutating operations are short single-row transactions, so one retry is
/// enough to ride out a concurrent writer. Any second failure is returned
/// as-is.
pub(crate) async fn retry_once_on_conflict<T, F, Fut>(mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    match op().await {
        Err(err) if err.is_conflict() => {
            tracing::debug!("retrying after store conflict: {err}");
            op().await
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use sea_orm::DbErr;

    use super::retry_once_on_conflict;
    use crate::errors::Error;

    #[tokio::test]
    async fn retries_once_after_conflict() {
        let calls = AtomicU32::new(0);
        let result = retry_once_on_conflict(|| {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err(Error::Database(DbErr::RecordNotUpdated))
                } else {
                    Ok(n)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn does_not_retry_other_errors() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = retry_once_on_conflict(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(Error::NotFound {
                    entity: "card",
                    id: 7,
                })
            }
        })
        .await;
        assert!(matches!(result, Err(Error::NotFound { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn second_conflict_is_returned() {
        let result: Result<(), _> = retry_once_on_conflict(|| async {
            Err(Error::Database(DbErr::RecordNotUpdated))
        })
        .await;
        assert!(matches!(result, Err(ref e) if e.is_conflict()));
    }
}
