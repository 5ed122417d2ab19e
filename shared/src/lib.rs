use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A bill as exposed over the REST API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: Uuid,
    pub due_date: NaiveDate,
    pub payment_date: Option<NaiveDate>,
    /// Serialized as a decimal string, e.g. "150.00"
    pub amount: Decimal,
    pub description: String,
    pub status: String,
}

/// Body of POST /payments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveBillRequest {
    pub due_date: NaiveDate,
    pub payment_date: NaiveDate,
    /// Must be at least 0.01
    pub amount: Decimal,
    /// Description of the bill (max 255 characters)
    pub description: String,
    /// Free-form status (max 50 characters)
    pub status: String,
}

/// Body of PUT /payments/{id}. Only the fields present are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBillRequest {
    pub due_date: Option<NaiveDate>,
    pub amount: Option<Decimal>,
    pub description: Option<String>,
}

/// Body of PATCH /payments/{id}/status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBillStatusRequest {
    pub status: String,
}

/// Body of POST /payments/uploads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadCsvRequest {
    /// CSV file contents, standard base64
    pub file_base64: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillListRequest {
    /// Exact due date match
    pub due_date: Option<NaiveDate>,
    /// Case-insensitive substring of the description
    pub description: Option<String>,
    /// Zero-based page index
    pub page_number: u32,
    pub page_size: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillPage {
    pub content: Vec<Bill>,
    pub page_number: u32,
    pub page_size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
}

/// Error body returned by every failing endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub mensagem: String,
}

impl ErrorResponse {
    pub fn new(status: u16, mensagem: impl Into<String>) -> Self {
        Self {
            status,
            mensagem: mensagem.into(),
        }
    }
}
