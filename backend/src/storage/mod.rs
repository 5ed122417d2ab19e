//! # Storage Module
//!
//! Persistence for bills. The domain layer only sees the [`BillStorage`] and
//! [`Connection`] traits; SQLite (via sqlx) is the production backend.

pub mod sqlite;
pub mod traits;

#[cfg(test)]
pub mod memory;

pub use sqlite::{DbConnection, SqliteBillRepository};
pub use traits::{BillStorage, Connection};
