//! Error body and status mapping shared by every endpoint.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    extract::{FromRequest, FromRequestParts},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shared::ErrorResponse;
use tracing::{error, warn};

use crate::domain::BillError;

/// An HTTP error rendered as `{ "status": .., "mensagem": .. }`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<BillError> for ApiError {
    fn from(err: BillError) -> Self {
        let status = match &err {
            BillError::DuplicateBill { .. } => StatusCode::CONFLICT,
            BillError::BillNotFound => StatusCode::NOT_FOUND,
            BillError::InvalidPeriod | BillError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            BillError::InvalidCsvField { .. } | BillError::MalformedCsvPayload(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            BillError::Storage(source) => {
                error!("Storage failure: {:#}", source);
                return Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Erro interno do servidor");
            }
        };
        warn!("Request rejected with {}: {}", status, err);
        Self::new(status, err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!("Invalid JSON body: {}", rejection.body_text());
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        warn!("Invalid query string: {}", rejection.body_text());
        Self::new(StatusCode::BAD_REQUEST, rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        warn!("Invalid path parameter: {}", rejection.body_text());
        Self::new(StatusCode::BAD_REQUEST, rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse::new(self.status.as_u16(), self.message);
        (self.status, Json(body)).into_response()
    }
}

/// `axum::Json` whose rejection uses the API error body
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// `axum::extract::Query` whose rejection uses the API error body
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// `axum::extract::Path` whose rejection uses the API error body
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn status_of(err: BillError) -> StatusCode {
        ApiError::from(err).status()
    }

    #[test]
    fn test_domain_errors_map_to_status_codes() {
        let duplicate = BillError::DuplicateBill {
            due_date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            amount: dec!(10),
            status: "PAGO".to_string(),
        };
        assert_eq!(status_of(duplicate), StatusCode::CONFLICT);
        assert_eq!(status_of(BillError::BillNotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_of(BillError::InvalidPeriod), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(BillError::InvalidInput("status é obrigatório".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(BillError::invalid_format(1, crate::domain::error::CsvColumn::DueDate)),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(BillError::Storage(anyhow::anyhow!("disk full"))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_storage_error_does_not_leak_details() {
        let response = ApiError::from(BillError::Storage(anyhow::anyhow!("disk full"))).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.status, 500);
        assert!(!error.mensagem.contains("disk full"));
    }
}
