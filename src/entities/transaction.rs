//! Transaction entity - A single debit or credit against one card.
//!
//! `amount` is always non-negative; direction lives in `kind` (`"DEBIT"` or
//! `"CREDIT"`). Balance derivation folds over the current rows on every call,
//! so there is no cached balance column anywhere.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// `kind` value for money leaving the card
pub const KIND_DEBIT: &str = "DEBIT";
/// `kind` value for repayments/refunds onto the card
pub const KIND_CREDIT: &str = "CREDIT";

/// Transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Unique identifier for the transaction
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the card this transaction belongs to
    pub card_id: i64,
    /// Merchant or free-text description
    pub description: String,
    /// Transaction amount, always >= 0
    pub amount: f64,
    /// Direction of the money: [`KIND_DEBIT`] or [`KIND_CREDIT`]
    pub kind: String,
    /// When the transaction happened
    pub date: DateTimeUtc,
}

/// Defines relationships between Transaction and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each transaction belongs to one card and dies with it
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
