//! User entity - The owner of every card and lending record.
//!
//! Only the fields the engine consumes live here: the display currency, the
//! ntfy destination (`ntfy_server` + `ntfy_topic`) and the per-alert opt-in
//! flags the daily scan honors. Account management (passwords, sessions) is
//! handled by an external layer and has no columns in this model.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Login name, unique across the system
    #[sea_orm(unique)]
    pub username: String,
    /// Display currency used in notification bodies (e.g. "INR", "EUR")
    pub currency: String,
    /// Base URL of the user's ntfy server; None falls back to the configured default
    pub ntfy_server: Option<String>,
    /// ntfy topic to publish to; None means the user receives no notifications
    pub ntfy_topic: Option<String>,
    /// Opt-in for "statement generated" alerts
    pub notify_statement: bool,
    /// Opt-in for "payment due" alerts
    pub notify_due_dates: bool,
    /// Opt-in for per-transaction alerts
    pub notify_transaction: bool,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One user owns many cards
    #[sea_orm(has_many = "super::card::Entity")]
    Cards,
    /// One user owns many lending records
    #[sea_orm(has_many = "super::lending::Entity")]
    Lendings,
}

impl Related<super::card::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cards.def()
    }
}

impl Related<super::lending::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lendings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
