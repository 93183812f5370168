//! LendingReturn entity - One partial repayment of a lending record.
//!
//! Returns are append-only; there is no edit or delete path. `proof` is an
//! opaque reference to an attachment stored by an external layer.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lending return database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "lending_returns")]
pub struct Model {
    /// Unique identifier for the return
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the lending record this return repays
    pub lending_id: i64,
    /// Amount returned, always >= 0
    pub amount: f64,
    /// When the money came back
    pub return_date: DateTimeUtc,
    /// Opaque reference to a proof attachment, if any
    pub proof: Option<String>,
}

/// Defines relationships between LendingReturn and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each return belongs to one lending record and dies with it
    #[sea_orm(
        belongs_to = "super::lending::Entity",
        from = "Column::LendingId",
        to = "super::lending::Column::Id",
        on_delete = "Cascade"
    )]
    Lending,
}

impl Related<super::lending::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lending.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
