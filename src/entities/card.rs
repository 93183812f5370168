//! Card entity - A credit card whose balance and billing cycle the engine tracks.
//!
//! The two limit fields implement the *active limit* rule: `manual_limit`
//! overrides `total_limit` when it is set and positive (banks often report a
//! combined limit across cards, so users can pin the real per-card figure).
//! `statement_day` and `due_day` are days of month (1-31); days past the end
//! of a short month clamp to that month's last day during due-date math.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Card database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cards")]
pub struct Model {
    /// Unique identifier for the card
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the user who owns this card
    pub owner_id: i64,
    /// Human-readable name (e.g. "Amex Gold")
    pub name: String,
    /// Issuing bank
    pub bank: String,
    /// Credit limit as reported by the bank
    pub total_limit: f64,
    /// Optional user-set override; wins over `total_limit` when positive
    pub manual_limit: Option<f64>,
    /// Day of month the statement is generated (1-31)
    pub statement_day: i32,
    /// Day of month the payment falls due (1-31)
    pub due_day: i32,
}

/// Defines relationships between Card and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each card belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id"
    )]
    Owner,
    /// One card has many transactions
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
    /// One card has many billing statements
    #[sea_orm(has_many = "super::statement::Entity")]
    Statements,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl Related<super::statement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Statements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
