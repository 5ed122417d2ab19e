//! # Domain Module
//!
//! Bill rules and orchestration. Nothing here knows about HTTP; storage is
//! reached only through the [`crate::storage::BillStorage`] trait.

pub mod bill_service;
pub mod bill_validator;
pub mod csv_ingestion;
pub mod error;
pub mod models;

pub use bill_service::BillService;
pub use bill_validator::BillValidator;
pub use csv_ingestion::CsvIngestion;
pub use error::BillError;
