//! Lending settlement tracking - partial returns against money lent out.
//!
//! The settled flag on a lending record is derived state: after every new
//! return the sum over *all* returns is recomputed inside the same
//! transaction that inserted the row, and the flag is written from that sum.
//! Two concurrent returns therefore cannot both decide the flag from a stale
//! sum; the loser of the race re-reads and recomputes on its retry.

use sea_orm::{Set, TransactionTrait, prelude::*};

use crate::{
    entities::{Lending, LendingReturn, lending, lending_return},
    errors::{Error, Result},
};

/// What [`add_return`] left behind: the inserted row plus the recomputed
/// settlement figures.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnOutcome {
    /// The newly inserted return
    pub entry: lending_return::Model,
    /// Sum over all returns, including the new one
    pub returned_amount: f64,
    /// `total_amount - returned_amount`; negative when over-returned
    pub pending_amount: f64,
    /// The settled flag as written to the lending record
    pub is_settled: bool,
}

/// Settlement figures for one lending record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SettlementStatus {
    /// Total amount lent
    pub total_amount: f64,
    /// Sum over all returns
    pub returned_amount: f64,
    /// `total_amount - returned_amount`, never clamped
    pub pending_amount: f64,
    /// True iff `pending_amount <= 0`
    pub is_settled: bool,
}

/// Records a partial return against an owned lending record and refreshes its
/// settled flag.
///
/// The flag is written from the full recomputed sum, so it tracks the current
/// state in both directions rather than ratcheting: a record can move back to
/// unsettled if the sum drops below the total again. Retries once on store
/// contention.
///
/// # Arguments
/// * `owner_id` - The user the lending record must belong to
/// * `lending_id` - The lending record being repaid
/// * `amount` - Non-negative amount returned
/// * `return_date` - When the money came back; defaults to now
/// * `proof` - Opaque reference to a proof attachment, if any
pub async fn add_return(
    db: &DatabaseConnection,
    owner_id: i64,
    lending_id: i64,
    amount: f64,
    return_date: Option<DateTimeUtc>,
    proof: Option<String>,
) -> Result<ReturnOutcome> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::InvalidAmount { amount });
    }

    super::retry_once_on_conflict(|| {
        add_return_once(db, owner_id, lending_id, amount, return_date, proof.clone())
    })
    .await
}

async fn add_return_once(
    db: &DatabaseConnection,
    owner_id: i64,
    lending_id: i64,
    amount: f64,
    return_date: Option<DateTimeUtc>,
    proof: Option<String>,
) -> Result<ReturnOutcome> {
    let txn = db.begin().await?;

    let lending = get_owned_lending(&txn, owner_id, lending_id).await?;

    let entry = lending_return::ActiveModel {
        lending_id: Set(lending_id),
        amount: Set(amount),
        return_date: Set(return_date.unwrap_or_else(chrono::Utc::now)),
        proof: Set(proof),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let returned_amount = sum_returns(&txn, lending_id).await?;
    let pending_amount = lending.total_amount - returned_amount;
    let is_settled = pending_amount <= 0.0;

    let mut active: lending::ActiveModel = lending.into();
    active.is_settled = Set(is_settled);
    active.update(&txn).await?;

    txn.commit().await?;

    Ok(ReturnOutcome {
        entry,
        returned_amount,
        pending_amount,
        is_settled,
    })
}

/// Sum of all returns recorded against an owned lending record.
pub async fn returned_amount(
    db: &DatabaseConnection,
    owner_id: i64,
    lending_id: i64,
) -> Result<f64> {
    get_owned_lending(db, owner_id, lending_id).await?;
    sum_returns(db, lending_id).await
}

/// Amount still outstanding on an owned lending record.
///
/// Never clamped: an over-returned record reports a negative figure, and
/// callers showing "pending" to a person should clamp for display only.
pub async fn pending_amount(
    db: &DatabaseConnection,
    owner_id: i64,
    lending_id: i64,
) -> Result<f64> {
    let status = settlement_status(db, owner_id, lending_id).await?;
    Ok(status.pending_amount)
}

/// Full settlement picture for an owned lending record, derived from the
/// current return rows.
pub async fn settlement_status(
    db: &DatabaseConnection,
    owner_id: i64,
    lending_id: i64,
) -> Result<SettlementStatus> {
    let lending = get_owned_lending(db, owner_id, lending_id).await?;
    let returned_amount = sum_returns(db, lending_id).await?;
    let pending_amount = lending.total_amount - returned_amount;

    Ok(SettlementStatus {
        total_amount: lending.total_amount,
        returned_amount,
        pending_amount,
        is_settled: pending_amount <= 0.0,
    })
}

/// Retrieves all of a user's lending records that are not yet settled.
pub async fn get_unsettled_lendings(
    db: &DatabaseConnection,
    owner_id: i64,
) -> Result<Vec<lending::Model>> {
    Lending::find()
        .filter(lending::Column::OwnerId.eq(owner_id))
        .filter(lending::Column::IsSettled.eq(false))
        .all(db)
        .await
        .map_err(Into::into)
}

/// Fetches a lending record, enforcing that it belongs to `owner_id`.
async fn get_owned_lending<C>(db: &C, owner_id: i64, lending_id: i64) -> Result<lending::Model>
where
    C: ConnectionTrait,
{
    Lending::find_by_id(lending_id)
        .filter(lending::Column::OwnerId.eq(owner_id))
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "lending",
            id: lending_id,
        })
}

async fn sum_returns<C>(db: &C, lending_id: i64) -> Result<f64>
where
    C: ConnectionTrait,
{
    let rows = LendingReturn::find()
        .filter(lending_return::Column::LendingId.eq(lending_id))
        .all(db)
        .await?;
    Ok(rows.iter().map(|row| row.amount).sum())
}
