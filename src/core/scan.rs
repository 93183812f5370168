//! Daily notification scan - one pass over every notification-enabled user.
//!
//! The scan takes the reference date as an argument instead of reading the
//! clock, so a single day's run can be replayed deterministically in tests.
//! There is no memory between runs: running the scan twice on the same day
//! sends everything twice. A failed item (one card, one lending record, one
//! delivery) is logged and counted, and the pass continues.
//!
//! All user-facing alert wording lives in this module's builder functions so
//! interactive paths and the scheduler send identical text.

use chrono::{Datelike, NaiveDate};
use sea_orm::prelude::*;

use crate::{
    core::{billing, lending},
    entities::{
        Card, CardColumn, CardModel, LendingModel, TransactionModel, User, UserColumn, user,
    },
    errors::Result,
    notify::{self, Notification, NotificationChannel, Priority},
};

/// Builds the "statement generated" alert for a card's statement day.
#[must_use]
pub fn statement_alert(card: &CardModel) -> Notification {
    Notification {
        title: format!("Statement: {}", card.name),
        body: "Statement likely generated today.".to_string(),
        priority: Priority::Default,
        tags: "page_facing_up".to_string(),
    }
}

/// Builds the "payment due" alert for a card due in `days_until` days.
///
/// At one day out or less the priority escalates to urgent.
#[must_use]
pub fn due_alert(card: &CardModel, days_until: i64) -> Notification {
    let when = if days_until == 0 {
        "due TODAY".to_string()
    } else {
        format!("due in {days_until} days")
    };
    Notification {
        title: format!("Payment Due: {}", card.name),
        body: format!("Reminder: Payment is {when}."),
        priority: billing::due_alert_priority(days_until),
        tags: "rotating_light".to_string(),
    }
}

/// Builds the reminder to chase a borrower for the outstanding amount.
#[must_use]
pub fn lending_reminder(
    lending: &LendingModel,
    currency: &str,
    pending_amount: f64,
) -> Notification {
    Notification {
        title: format!("Lending Reminder: {}", lending.borrower),
        body: format!(
            "Reminder to ask {} for {currency} {pending_amount}.",
            lending.borrower
        ),
        priority: Priority::High,
        tags: "handshake".to_string(),
    }
}

/// Builds the per-transaction alert sent when a user opts into them.
///
/// The daily scan never sends these; the layer recording a transaction
/// delivers one when `notify_transaction` is set, using the card that
/// [`crate::core::balance::record_transaction`] hands back.
#[must_use]
pub fn transaction_alert(card: &CardModel, currency: &str, txn: &TransactionModel) -> Notification {
    let tags = if txn.kind == crate::entities::transaction::KIND_DEBIT {
        "money_with_wings"
    } else {
        "moneybag"
    };
    Notification {
        title: format!("New {}", txn.kind),
        body: format!(
            "{}: {currency} {} at {}",
            card.name, txn.amount, txn.description
        ),
        priority: Priority::Default,
        tags: tags.to_string(),
    }
}

/// Builds the confirmation sent when a return is recorded against a lending.
///
/// Sent by the layer that called [`crate::core::lending::add_return`], not by
/// the daily scan.
#[must_use]
pub fn return_alert(lending: &LendingModel, currency: &str, amount: f64) -> Notification {
    Notification {
        title: format!("Return: {}", lending.borrower),
        body: format!("Received {currency} {amount} from {}.", lending.borrower),
        priority: Priority::Default,
        tags: "handshake".to_string(),
    }
}

/// What one scan pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanSummary {
    /// Users with a configured topic that were evaluated
    pub users_scanned: usize,
    /// Notifications handed to the channel successfully
    pub notifications_sent: usize,
    /// Items skipped because of a query or delivery failure
    pub failures: usize,
}

/// Runs one full scan pass for the given calendar date.
///
/// Evaluates, for every user with a configured ntfy topic: statement-day
/// alerts and due-date alerts per owned card, and reminders for unsettled
/// lending records whose reminder date is `today`. Per-item failures are
/// logged and counted in the summary; only a failure to enumerate users at
/// all is returned as an error.
pub async fn run_daily_scan<N>(
    db: &DatabaseConnection,
    channel: &N,
    default_server: &str,
    today: NaiveDate,
) -> Result<ScanSummary>
where
    N: NotificationChannel + ?Sized,
{
    let users = User::find()
        .filter(UserColumn::NtfyTopic.is_not_null())
        .all(db)
        .await?;

    let mut summary = ScanSummary::default();

    for user in users {
        let Some(topic) = user.ntfy_topic.as_deref().filter(|topic| !topic.is_empty()) else {
            continue;
        };
        summary.users_scanned += 1;

        let destination = notify::destination(user.ntfy_server.as_deref(), default_server, topic);

        scan_cards(db, channel, &destination, &user, today, &mut summary).await;
        scan_lendings(db, channel, &destination, &user, today, &mut summary).await;
    }

    tracing::info!(
        users = summary.users_scanned,
        sent = summary.notifications_sent,
        failures = summary.failures,
        "daily scan finished"
    );

    Ok(summary)
}

async fn scan_cards<N>(
    db: &DatabaseConnection,
    channel: &N,
    destination: &str,
    user: &user::Model,
    today: NaiveDate,
    summary: &mut ScanSummary,
) where
    N: NotificationChannel + ?Sized,
{
    let cards = match Card::find()
        .filter(CardColumn::OwnerId.eq(user.id))
        .all(db)
        .await
    {
        Ok(cards) => cards,
        Err(err) => {
            tracing::warn!(user = %user.username, "skipping card scan: {err}");
            summary.failures += 1;
            return;
        }
    };

    for card in cards {
        if user.notify_statement && i64::from(card.statement_day) == i64::from(today.day()) {
            dispatch(channel, destination, statement_alert(&card), summary).await;
        }

        if !user.notify_due_dates {
            continue;
        }
        let due = billing::next_due_date(card.due_day, today);
        if !billing::within_alert_window(due.days_until) {
            continue;
        }
        match billing::has_unpaid_statement(db, card.id).await {
            Ok(true) => {
                dispatch(channel, destination, due_alert(&card, due.days_until), summary).await;
            }
            Ok(false) => {}
            Err(err) => {
                tracing::warn!(card = %card.name, "skipping due-date check: {err}");
                summary.failures += 1;
            }
        }
    }
}

async fn scan_lendings<N>(
    db: &DatabaseConnection,
    channel: &N,
    destination: &str,
    user: &user::Model,
    today: NaiveDate,
    summary: &mut ScanSummary,
) where
    N: NotificationChannel + ?Sized,
{
    let lendings = match lending::get_unsettled_lendings(db, user.id).await {
        Ok(lendings) => lendings,
        Err(err) => {
            tracing::warn!(user = %user.username, "skipping lending scan: {err}");
            summary.failures += 1;
            return;
        }
    };

    for item in lendings {
        if item.reminder_date != Some(today) {
            continue;
        }
        let pending = match lending::settlement_status(db, user.id, item.id).await {
            Ok(status) => status.pending_amount,
            Err(err) => {
                tracing::warn!(borrower = %item.borrower, "skipping lending reminder: {err}");
                summary.failures += 1;
                continue;
            }
        };
        dispatch(
            channel,
            destination,
            lending_reminder(&item, &user.currency, pending),
            summary,
        )
        .await;
    }
}

async fn dispatch<N>(
    channel: &N,
    destination: &str,
    note: Notification,
    summary: &mut ScanSummary,
) where
    N: NotificationChannel + ?Sized,
{
    match channel.send(destination, &note).await {
        Ok(()) => summary.notifications_sent += 1,
        Err(err) => {
            tracing::warn!(title = %note.title, "delivery failed to {destination}: {err}");
            summary.failures += 1;
        }
    }
}
