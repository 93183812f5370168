//! Shared test utilities for `cardwatch`.
//!
//! This module provides helpers for setting up in-memory test databases,
//! creating test entities with sensible defaults, and capturing outbound
//! notifications without touching the network.

#![allow(clippy::unwrap_used)]

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{DatabaseConnection, Set, prelude::*};

use crate::{
    entities,
    errors::{Error, Result},
    notify::{Notification, NotificationChannel},
};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test user with notifications configured.
///
/// # Defaults
/// * `currency`: "INR"
/// * `ntfy_server`: None (falls back to the default server)
/// * `ntfy_topic`: `"{username}-alerts"`
/// * statement and due-date alerts on, transaction alerts off
pub async fn create_test_user(
    db: &DatabaseConnection,
    username: &str,
) -> Result<entities::user::Model> {
    let user = entities::user::ActiveModel {
        username: Set(username.to_string()),
        currency: Set("INR".to_string()),
        ntfy_server: Set(None),
        ntfy_topic: Set(Some(format!("{username}-alerts"))),
        notify_statement: Set(true),
        notify_due_dates: Set(true),
        notify_transaction: Set(false),
        ..Default::default()
    };
    Ok(user.insert(db).await?)
}

/// Creates a test user with no ntfy topic; the daily scan must skip them.
pub async fn create_silent_user(
    db: &DatabaseConnection,
    username: &str,
) -> Result<entities::user::Model> {
    let user = entities::user::ActiveModel {
        username: Set(username.to_string()),
        currency: Set("INR".to_string()),
        ntfy_server: Set(None),
        ntfy_topic: Set(None),
        notify_statement: Set(true),
        notify_due_dates: Set(true),
        notify_transaction: Set(false),
        ..Default::default()
    };
    Ok(user.insert(db).await?)
}

/// Overwrites a user's per-alert opt-in flags.
pub async fn set_notify_flags(
    db: &DatabaseConnection,
    user_id: i64,
    statement: bool,
    due_dates: bool,
    transaction: bool,
) -> Result<entities::user::Model> {
    let update = entities::user::ActiveModel {
        id: Set(user_id),
        notify_statement: Set(statement),
        notify_due_dates: Set(due_dates),
        notify_transaction: Set(transaction),
        ..Default::default()
    };
    Ok(update.update(db).await?)
}

/// Points a user at a custom ntfy server (or back to the default with None).
pub async fn set_ntfy_server(
    db: &DatabaseConnection,
    user_id: i64,
    server: Option<String>,
) -> Result<entities::user::Model> {
    let update = entities::user::ActiveModel {
        id: Set(user_id),
        ntfy_server: Set(server),
        ..Default::default()
    };
    Ok(update.update(db).await?)
}

/// Creates a test card with sensible defaults.
///
/// # Defaults
/// * `bank`: "Test Bank"
/// * `total_limit`: 100 000, no manual override
/// * `statement_day`: 1, `due_day`: 10
pub async fn create_test_card(
    db: &DatabaseConnection,
    owner_id: i64,
    name: &str,
) -> Result<entities::card::Model> {
    create_custom_card(db, owner_id, name, 100_000.0, None, 1, 10).await
}

/// Creates a test card with custom limits and cycle days.
pub async fn create_custom_card(
    db: &DatabaseConnection,
    owner_id: i64,
    name: &str,
    total_limit: f64,
    manual_limit: Option<f64>,
    statement_day: i32,
    due_day: i32,
) -> Result<entities::card::Model> {
    let card = entities::card::ActiveModel {
        owner_id: Set(owner_id),
        name: Set(name.to_string()),
        bank: Set("Test Bank".to_string()),
        total_limit: Set(total_limit),
        manual_limit: Set(manual_limit),
        statement_day: Set(statement_day),
        due_day: Set(due_day),
        ..Default::default()
    };
    Ok(card.insert(db).await?)
}

/// Inserts a transaction row directly, bypassing validation.
///
/// # Defaults
/// * `description`: `"Test transaction"`
/// * `date`: now
pub async fn create_test_transaction(
    db: &DatabaseConnection,
    card_id: i64,
    kind: &str,
    amount: f64,
) -> Result<entities::transaction::Model> {
    let row = entities::transaction::ActiveModel {
        card_id: Set(card_id),
        description: Set("Test transaction".to_string()),
        amount: Set(amount),
        kind: Set(kind.to_string()),
        date: Set(chrono::Utc::now()),
        ..Default::default()
    };
    Ok(row.insert(db).await?)
}

/// Creates a lending record with no reminder date.
pub async fn create_test_lending(
    db: &DatabaseConnection,
    owner_id: i64,
    borrower: &str,
    total_amount: f64,
) -> Result<entities::lending::Model> {
    create_custom_lending(db, owner_id, borrower, total_amount, None).await
}

/// Creates a lending record with a specific reminder date.
pub async fn create_custom_lending(
    db: &DatabaseConnection,
    owner_id: i64,
    borrower: &str,
    total_amount: f64,
    reminder_date: Option<NaiveDate>,
) -> Result<entities::lending::Model> {
    let lending = entities::lending::ActiveModel {
        owner_id: Set(owner_id),
        borrower: Set(borrower.to_string()),
        total_amount: Set(total_amount),
        lent_date: Set(chrono::Utc::now()),
        reminder_date: Set(reminder_date),
        is_settled: Set(false),
        ..Default::default()
    };
    Ok(lending.insert(db).await?)
}

/// Sets up a complete test environment with one user and one card.
/// Returns (db, user, card) for common test scenarios.
pub async fn setup_with_card() -> Result<(
    DatabaseConnection,
    entities::user::Model,
    entities::card::Model,
)> {
    let db = setup_test_db().await?;
    let user = create_test_user(&db, "alice").await?;
    let card = create_test_card(&db, user.id, "Test Card").await?;
    Ok((db, user, card))
}

/// A [`NotificationChannel`] that records every send and always succeeds.
#[derive(Debug, Default)]
pub struct RecordingChannel {
    sent: Mutex<Vec<(String, Notification)>>,
}

impl RecordingChannel {
    /// All sends so far as `(destination, notification)` pairs, oldest first.
    pub fn sent(&self) -> Vec<(String, Notification)> {
        self.sent.lock().unwrap().clone()
    }

    /// Number of sends so far.
    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl NotificationChannel for RecordingChannel {
    async fn send(&self, destination: &str, note: &Notification) -> Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((destination.to_string(), note.clone()));
        Ok(())
    }
}

/// A [`NotificationChannel`] that fails for matching destinations and records
/// the rest, for exercising per-item error isolation.
#[derive(Debug)]
pub struct FailingChannel {
    fail_when_destination_contains: String,
    inner: RecordingChannel,
}

impl FailingChannel {
    /// Fails every send whose destination contains `pattern`.
    pub fn failing_for(pattern: &str) -> Self {
        Self {
            fail_when_destination_contains: pattern.to_string(),
            inner: RecordingChannel::default(),
        }
    }

    /// The sends that did *not* fail.
    pub fn delivered(&self) -> Vec<(String, Notification)> {
        self.inner.sent()
    }
}

#[async_trait]
impl NotificationChannel for FailingChannel {
    async fn send(&self, destination: &str, note: &Notification) -> Result<()> {
        if destination.contains(&self.fail_when_destination_contains) {
            return Err(Error::NotificationDelivery {
                reason: "synthetic delivery failure".to_string(),
            });
        }
        self.inner.send(destination, note).await
    }
}
