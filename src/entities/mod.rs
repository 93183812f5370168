//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod card;
pub mod lending;
pub mod lending_return;
pub mod statement;
pub mod transaction;
pub mod user;

// Re-export specific types to avoid conflicts
pub use card::{Column as CardColumn, Entity as Card, Model as CardModel};
pub use lending::{Column as LendingColumn, Entity as Lending, Model as LendingModel};
pub use lending_return::{
    Column as LendingReturnColumn, Entity as LendingReturn, Model as LendingReturnModel,
};
pub use statement::{Column as StatementColumn, Entity as Statement, Model as StatementModel};
pub use transaction::{
    Column as TransactionColumn, Entity as Transaction, Model as TransactionModel,
};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
