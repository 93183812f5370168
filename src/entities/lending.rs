//! Lending entity - Money lent to a third party, repaid in parts.
//!
//! `is_settled` is derived state persisted for query convenience: it is
//! recomputed from the sum of returns after every insert and always reflects
//! the current computation (it can flip back to unsettled, it is not a
//! ratchet). `reminder_date` drives the daily scan's lending reminders.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lending database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "lendings")]
pub struct Model {
    /// Unique identifier for the lending record
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the user who lent the money
    pub owner_id: i64,
    /// Who the money went to
    pub borrower: String,
    /// Total amount lent
    pub total_amount: f64,
    /// When the money was lent
    pub lent_date: DateTimeUtc,
    /// Calendar date to nudge the owner about this loan, if any
    pub reminder_date: Option<Date>,
    /// Derived: all money returned (pending <= 0)
    pub is_settled: bool,
}

/// Defines relationships between Lending and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each lending record belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id"
    )]
    Owner,
    /// One lending record has many partial returns
    #[sea_orm(has_many = "super::lending_return::Entity")]
    Returns,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::lending_return::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Returns.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
