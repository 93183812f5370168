//! Statement entity - One billing statement in a card's cycle.
//!
//! The state machine is `Unpaid -> Paid` (sets `paid_date`, `paid_amount`,
//! `payment_ref`) and `Paid -> Unpaid` (clears `paid_date` only). Both
//! transitions are explicit user actions; nothing in the engine flips a
//! statement automatically. The daily scan only *reads* the unpaid flag: a
//! card with zero unpaid statements never produces a "payment due" alert.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Statement database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "statements")]
pub struct Model {
    /// Unique identifier for the statement
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the card this statement belongs to
    pub card_id: i64,
    /// Statement total
    pub amount: f64,
    /// Calendar date the statement was issued
    pub issued_date: Date,
    /// Whether the statement has been paid
    pub is_paid: bool,
    /// When the payment was recorded; set iff `is_paid`
    pub paid_date: Option<DateTimeUtc>,
    /// Amount actually paid (partial payments allowed)
    pub paid_amount: Option<f64>,
    /// Free-text payment reference (UPI ref, cheque number, ...)
    pub payment_ref: Option<String>,
}

/// Defines relationships between Statement and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each statement belongs to one card and dies with it
    #[sea_orm(
        belongs_to = "super::card::Entity",
        from = "Column::CardId",
        to = "super::card::Column::Id",
        on_delete = "Cascade"
    )]
    Card,
}

impl Related<super::card::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Card.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
