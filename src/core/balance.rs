//! Card balance derivation and transaction recording.
//!
//! Balances are never stored: every call folds over the card's current
//! transaction rows, so a balance can never drift from the ledger that backs
//! it. Spending is the sum of debits minus the sum of credits, floored at
//! zero so that over-repayment shows up as extra headroom rather than as
//! negative spend.

use crate::{
    entities::{Card, Transaction, card, transaction},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};

/// Derived balance figures for one card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardBalance {
    /// Sum of debits minus sum of credits, floored at zero
    pub spent: f64,
    /// `active_limit - spent`; negative when the card is over its limit
    pub available: f64,
    /// The limit the figures above were computed against
    pub active_limit: f64,
}

/// The credit limit used for balance math.
///
/// A positive `manual_limit` overrides the bank-reported `total_limit`;
/// an unset or non-positive override is ignored.
#[must_use]
pub fn active_limit(card: &card::Model) -> f64 {
    match card.manual_limit {
        Some(limit) if limit > 0.0 => limit,
        _ => card.total_limit,
    }
}

/// Fetches a card, enforcing that it belongs to `owner_id`.
///
/// A card that exists but belongs to someone else is reported exactly like a
/// card that does not exist.
pub(crate) async fn get_owned_card<C>(db: &C, owner_id: i64, card_id: i64) -> Result<card::Model>
where
    C: ConnectionTrait,
{
    Card::find_by_id(card_id)
        .filter(card::Column::OwnerId.eq(owner_id))
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "card",
            id: card_id,
        })
}

/// Computes the current balance of a card from its full transaction history.
///
/// Rows whose `kind` is neither `DEBIT` nor `CREDIT` do not enter the sums;
/// [`record_transaction`] never writes such rows, so any that appear came from
/// outside the engine and are skipped rather than guessed at.
pub async fn compute_balance(
    db: &DatabaseConnection,
    owner_id: i64,
    card_id: i64,
) -> Result<CardBalance> {
    let card = get_owned_card(db, owner_id, card_id).await?;

    let rows = Transaction::find()
        .filter(transaction::Column::CardId.eq(card_id))
        .all(db)
        .await?;

    let mut debits = 0.0;
    let mut credits = 0.0;
    for row in &rows {
        match row.kind.as_str() {
            transaction::KIND_DEBIT => debits += row.amount,
            transaction::KIND_CREDIT => credits += row.amount,
            _ => {}
        }
    }

    let spent = (debits - credits).max(0.0);
    let active_limit = active_limit(&card);
    Ok(CardBalance {
        spent,
        available: active_limit - spent,
        active_limit,
    })
}

/// Records a new transaction against an owned card.
///
/// The amount must be finite and non-negative (direction lives in `kind`, not
/// in the sign), and `kind` must be `DEBIT` or `CREDIT`. A debit that pushes
/// the card past its limit is still recorded; the overdraft shows up as a
/// negative `available` on the next balance read.
///
/// Returns the card along with the inserted row so callers can build a
/// notification without a second fetch.
///
/// # Arguments
/// * `owner_id` - The user the card must belong to
/// * `card_id` - The card to record against
/// * `description` - Merchant or free-text description
/// * `amount` - Non-negative transaction amount
/// * `kind` - `DEBIT` or `CREDIT`
/// * `date` - When the transaction happened; defaults to now
pub async fn record_transaction(
    db: &DatabaseConnection,
    owner_id: i64,
    card_id: i64,
    description: String,
    amount: f64,
    kind: &str,
    date: Option<DateTimeUtc>,
) -> Result<(card::Model, transaction::Model)> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::InvalidAmount { amount });
    }

    if kind != transaction::KIND_DEBIT && kind != transaction::KIND_CREDIT {
        return Err(Error::InvalidKind {
            kind: kind.to_string(),
        });
    }

    // Hold the owner check and the insert in one unit so the card cannot be
    // deleted between them.
    let txn = db.begin().await?;

    let card = get_owned_card(&txn, owner_id, card_id).await?;

    let row = transaction::ActiveModel {
        card_id: Set(card_id),
        description: Set(description),
        amount: Set(amount),
        kind: Set(kind.to_string()),
        date: Set(date.unwrap_or_else(chrono::Utc::now)),
        ..Default::default()
    };
    let result = row.insert(&txn).await?;

    txn.commit().await?;

    Ok((card, result))
}

/// Retrieves all transactions for an owned card, newest first.
pub async fn get_transactions_for_card(
    db: &DatabaseConnection,
    owner_id: i64,
    card_id: i64,
) -> Result<Vec<transaction::Model>> {
    get_owned_card(db, owner_id, card_id).await?;

    Transaction::find()
        .filter(transaction::Column::CardId.eq(card_id))
        .order_by_desc(transaction::Column::Date)
        .all(db)
        .await
        .map_err(Into::into)
}
