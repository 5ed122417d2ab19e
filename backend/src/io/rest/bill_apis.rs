//! # REST API for Bills
//!
//! Endpoints nested under `/payments`: create, update, status change, lookup,
//! filtered listing, the paid-amount total and CSV upload.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, patch, post},
    Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::{BillListRequest, SaveBillRequest, UpdateBillRequest, UpdateBillStatusRequest, UploadCsvRequest};
use tracing::info;
use uuid::Uuid;

use crate::io::rest::error::{ApiError, ApiJson, ApiPath, ApiQuery};
use crate::io::rest::mappers::BillMapper;
use crate::AppState;

const DEFAULT_PAGE_SIZE: u32 = 10;

/// Create the bill API router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(find_bills).post(save_bill))
        .route("/total", get(sum_amount_by_payment_date))
        .route("/uploads", post(upload_csv))
        .route("/:id", get(find_bill_by_id).put(update_bill))
        .route("/:id/status", patch(update_bill_status))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillListQuery {
    pub due_date: Option<NaiveDate>,
    pub description: Option<String>,
    #[serde(default)]
    pub page_number: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPeriodQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

pub async fn save_bill(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SaveBillRequest>,
) -> Result<Response, ApiError> {
    info!("POST /payments - request: {:?}", request);

    let bill = state.bill_service.save(request).await?;
    let location = format!("/payments/{}", bill.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(BillMapper::to_dto(bill)),
    )
        .into_response())
}

pub async fn update_bill(
    State(state): State<AppState>,
    ApiPath(bill_id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<UpdateBillRequest>,
) -> Result<StatusCode, ApiError> {
    info!("PUT /payments/{} - request: {:?}", bill_id, request);

    state.bill_service.update(bill_id, request).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn update_bill_status(
    State(state): State<AppState>,
    ApiPath(bill_id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<UpdateBillStatusRequest>,
) -> Result<StatusCode, ApiError> {
    info!("PATCH /payments/{}/status - request: {:?}", bill_id, request);

    state.bill_service.update_status(bill_id, request.status).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn find_bill_by_id(
    State(state): State<AppState>,
    ApiPath(bill_id): ApiPath<Uuid>,
) -> Result<Json<shared::Bill>, ApiError> {
    info!("GET /payments/{}", bill_id);

    let bill = state.bill_service.find_by_id(bill_id).await?;
    Ok(Json(BillMapper::to_dto(bill)))
}

pub async fn find_bills(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<BillListQuery>,
) -> Result<Json<shared::BillPage>, ApiError> {
    info!("GET /payments - query: {:?}", query);

    let request = BillListRequest {
        due_date: query.due_date,
        description: query.description,
        page_number: query.page_number,
        page_size: query.page_size,
    };
    let page = state.bill_service.find_bills(request).await?;
    Ok(Json(BillMapper::to_page_dto(page)))
}

pub async fn sum_amount_by_payment_date(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PaymentPeriodQuery>,
) -> Result<Json<Decimal>, ApiError> {
    info!("GET /payments/total - query: {:?}", query);

    let total = state
        .bill_service
        .sum_amount_by_payment_date_between(query.start_date, query.end_date)
        .await?;
    Ok(Json(total))
}

pub async fn upload_csv(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<UploadCsvRequest>,
) -> Result<StatusCode, ApiError> {
    info!("POST /payments/uploads - payload of {} bytes", request.file_base64.len());

    let stored = state.bill_service.ingest_csv(&request.file_base64).await?;
    info!("CSV upload stored {} bills", stored.len());
    Ok(StatusCode::CREATED)
}
