//! # Payment Backend
//!
//! Bill management service: single-bill CRUD, filtered listing, the paid
//! amount total for a period and bulk import from base64-encoded CSV.
//!
//! ```text
//! IO Layer (axum REST handlers)
//!     ↓
//! Domain Layer (BillService, BillValidator, CsvIngestion)
//!     ↓
//! Storage Layer (BillStorage over SQLite)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::Result;
use axum::{
    http::{header, Method},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::config::Config;
use crate::domain::BillService;
use crate::storage::DbConnection;

/// Main application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub bill_service: BillService<DbConnection>,
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &Config) -> Result<AppState> {
    info!("Setting up database at {}", config.database_url);
    let db_conn = Arc::new(DbConnection::new(&config.database_url).await?);

    info!("Setting up domain model");
    let bill_service = BillService::new(db_conn);

    Ok(AppState { bill_service })
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, config: &Config) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(config.cors_origin.clone())
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH])
        .allow_headers([header::CONTENT_TYPE])
        .expose_headers([header::LOCATION]);

    Router::new()
        .nest("/payments", io::rest::bill_apis::router())
        .layer(cors)
        .with_state(app_state)
}
