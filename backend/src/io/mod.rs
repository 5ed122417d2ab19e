//! # IO Module
//!
//! HTTP surface of the payment service. Handlers translate JSON requests into
//! [`crate::domain::BillService`] calls and domain errors into status codes.

pub mod rest;
