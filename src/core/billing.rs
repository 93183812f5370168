//! Billing cycle tracking - statement lifecycle and due-date arithmetic.
//!
//! A statement moves `Unpaid -> Paid -> Unpaid` only through [`mark_paid`] and
//! [`mark_unpaid`]; both run as a single per-record transaction and retry once
//! on store contention, so a racing edit cannot produce a half-applied
//! transition. Due-date math is pure calendar arithmetic over `NaiveDate` and
//! takes the reference day as an argument, which keeps it testable for any
//! fixed date.

use chrono::{Datelike, NaiveDate};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};

use crate::{
    core::{balance::get_owned_card, dates},
    entities::{Card, Statement, card, statement},
    errors::{Error, Result},
    notify::Priority,
};

/// Upper bound of the "payment due" alert window, in days before the due date.
pub const ALERT_WINDOW_DAYS: i64 = 5;
/// At or below this many days out, a due alert escalates to urgent.
pub const URGENT_WINDOW_DAYS: i64 = 1;

/// The next occurrence of a card's due day, relative to a reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueDate {
    /// The resolved calendar date
    pub date: NaiveDate,
    /// Whole days from the reference date to [`DueDate::date`]; zero means due today
    pub days_until: i64,
}

/// True when `days_until` falls inside the due-date alert window.
///
/// The window alone is not sufficient to alert; the card must also have an
/// unpaid statement (see [`has_unpaid_statement`]).
#[must_use]
pub fn within_alert_window(days_until: i64) -> bool {
    (0..=ALERT_WINDOW_DAYS).contains(&days_until)
}

/// Severity of a due alert: urgent at one day out or less, high otherwise.
#[must_use]
pub fn due_alert_priority(days_until: i64) -> Priority {
    if days_until <= URGENT_WINDOW_DAYS {
        Priority::Urgent
    } else {
        Priority::High
    }
}

/// Computes the next occurrence of `due_day` on or after `today`.
///
/// The candidate is `today` with its day-of-month replaced by `due_day`; if
/// that already passed, the candidate moves one calendar month forward,
/// rolling December into January of the next year. In both months a day past
/// the month's end clamps to the month's last day, so a card due on the 31st
/// is due on April 30th and on February 28th (29th in leap years).
#[must_use]
pub fn next_due_date(due_day: i32, today: NaiveDate) -> DueDate {
    let day = due_day.clamp(1, 31).unsigned_abs();

    let mut candidate = dates::date_at_clamped_day(today.year(), today.month(), day, today);
    if candidate < today {
        let (year, month) = dates::next_month(today.year(), today.month());
        candidate = dates::date_at_clamped_day(year, month, day, today);
    }

    DueDate {
        date: candidate,
        days_until: (candidate - today).num_days(),
    }
}

/// Records a new unpaid statement for an owned card.
///
/// Repeated calls create independent records; duplicate detection is the
/// caller's concern. The statement amount must be finite and non-negative.
pub async fn record_statement(
    db: &DatabaseConnection,
    owner_id: i64,
    card_id: i64,
    issued_date: NaiveDate,
    amount: f64,
) -> Result<statement::Model> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::InvalidAmount { amount });
    }

    let txn = db.begin().await?;

    get_owned_card(&txn, owner_id, card_id).await?;

    let row = statement::ActiveModel {
        card_id: Set(card_id),
        amount: Set(amount),
        issued_date: Set(issued_date),
        is_paid: Set(false),
        ..Default::default()
    };
    let result = row.insert(&txn).await?;

    txn.commit().await?;

    Ok(result)
}

/// Marks a statement paid, recording when, how much, and against what
/// reference.
///
/// Fails with `NotFound` when the statement is missing or hangs off a card the
/// caller does not own; the two cases are indistinguishable. Retries once on
/// store contention.
pub async fn mark_paid(
    db: &DatabaseConnection,
    owner_id: i64,
    statement_id: i64,
    paid_amount: f64,
    payment_ref: Option<String>,
) -> Result<statement::Model> {
    if !paid_amount.is_finite() || paid_amount < 0.0 {
        return Err(Error::InvalidAmount {
            amount: paid_amount,
        });
    }

    super::retry_once_on_conflict(|| {
        mark_paid_once(db, owner_id, statement_id, paid_amount, payment_ref.clone())
    })
    .await
}

async fn mark_paid_once(
    db: &DatabaseConnection,
    owner_id: i64,
    statement_id: i64,
    paid_amount: f64,
    payment_ref: Option<String>,
) -> Result<statement::Model> {
    let txn = db.begin().await?;

    let stmt = get_owned_statement(&txn, owner_id, statement_id).await?;

    let mut active: statement::ActiveModel = stmt.into();
    active.is_paid = Set(true);
    active.paid_date = Set(Some(chrono::Utc::now()));
    active.paid_amount = Set(Some(paid_amount));
    active.payment_ref = Set(payment_ref);
    let updated = active.update(&txn).await?;

    txn.commit().await?;

    Ok(updated)
}

/// Reverts a statement to unpaid.
///
/// Only `is_paid` and `paid_date` are cleared; `paid_amount` and
/// `payment_ref` are kept as a trace of the reverted payment. Retries once on
/// store contention.
pub async fn mark_unpaid(
    db: &DatabaseConnection,
    owner_id: i64,
    statement_id: i64,
) -> Result<statement::Model> {
    super::retry_once_on_conflict(|| mark_unpaid_once(db, owner_id, statement_id)).await
}

async fn mark_unpaid_once(
    db: &DatabaseConnection,
    owner_id: i64,
    statement_id: i64,
) -> Result<statement::Model> {
    let txn = db.begin().await?;

    let stmt = get_owned_statement(&txn, owner_id, statement_id).await?;

    let mut active: statement::ActiveModel = stmt.into();
    active.is_paid = Set(false);
    active.paid_date = Set(None);
    let updated = active.update(&txn).await?;

    txn.commit().await?;

    Ok(updated)
}

/// True iff at least one statement for the card is unpaid.
///
/// This gates every "payment due" alert: a card with no unpaid statements is
/// current for the cycle even when its due day is inside the alert window.
pub async fn has_unpaid_statement(db: &DatabaseConnection, card_id: i64) -> Result<bool> {
    let count = Statement::find()
        .filter(statement::Column::CardId.eq(card_id))
        .filter(statement::Column::IsPaid.eq(false))
        .count(db)
        .await?;
    Ok(count > 0)
}

/// Retrieves all statements for an owned card, newest issue date first.
pub async fn get_statements_for_card(
    db: &DatabaseConnection,
    owner_id: i64,
    card_id: i64,
) -> Result<Vec<statement::Model>> {
    get_owned_card(db, owner_id, card_id).await?;

    Statement::find()
        .filter(statement::Column::CardId.eq(card_id))
        .order_by_desc(statement::Column::IssuedDate)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Fetches a statement, enforcing that its card belongs to `owner_id`.
async fn get_owned_statement<C>(
    db: &C,
    owner_id: i64,
    statement_id: i64,
) -> Result<statement::Model>
where
    C: ConnectionTrait,
{
    let not_found = || Error::NotFound {
        entity: "statement",
        id: statement_id,
    };

    let stmt = Statement::find_by_id(statement_id)
        .one(db)
        .await?
        .ok_or_else(not_found)?;

    Card::find_by_id(stmt.card_id)
        .filter(card::Column::OwnerId.eq(owner_id))
        .one(db)
        .await?
        .ok_or_else(not_found)?;

    Ok(stmt)
}
