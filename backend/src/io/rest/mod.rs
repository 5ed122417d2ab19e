//! # REST API
//!
//! Routes under `/payments`, DTO mapping and the error body shared by all
//! endpoints.

pub mod bill_apis;
pub mod error;
pub mod mappers;

pub use error::ApiError;
