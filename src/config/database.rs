//! Database connection and table creation using `SeaORM`.
//!
//! Tables are generated from the entity definitions via
//! `Schema::create_table_from_entity`, so the schema always matches the Rust
//! structs without hand-written SQL. Creation is idempotent (`IF NOT EXISTS`)
//! so the daemon can run against a fresh or an existing database file.

use crate::entities::{Card, Lending, LendingReturn, Statement, Transaction, User};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Establishes a connection to the database at `url`.
pub async fn connect(url: &str) -> Result<DatabaseConnection> {
    Database::connect(url).await.map_err(Into::into)
}

/// Creates all engine tables from the entity definitions.
///
/// Parents come before children so the generated foreign keys (including the
/// cascade deletes carrying the ownership rule) resolve on strict backends.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut statements = [
        schema.create_table_from_entity(User),
        schema.create_table_from_entity(Card),
        schema.create_table_from_entity(Transaction),
        schema.create_table_from_entity(Statement),
        schema.create_table_from_entity(Lending),
        schema.create_table_from_entity(LendingReturn),
    ];

    for statement in &mut statements {
        statement.if_not_exists();
        db.execute(builder.build(&*statement)).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{CardModel, LendingModel, StatementModel, UserModel};
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables_in_memory() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Every table answers a trivial query once created.
        let _: Vec<UserModel> = User::find().limit(1).all(&db).await?;
        let _: Vec<CardModel> = Card::find().limit(1).all(&db).await?;
        let _: Vec<StatementModel> = Statement::find().limit(1).all(&db).await?;
        let _: Vec<LendingModel> = Lending::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }
}
