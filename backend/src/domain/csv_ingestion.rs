//! CSV ingestion for bills.
//!
//! The payload is a base64-encoded text file with one bill per line and the
//! fixed column layout `dueDate,paymentDate,amount,description,status`:
//!
//! ```text
//! 2025-07-01,2025-07-02,150.00,Conta de energia,PENDENTE
//! 2025-07-05,2025-07-06,220.75,Conta de água,pago
//! ```
//!
//! Lines with fewer than five fields are skipped. Any other problem, including
//! a bill that is already registered or repeated within the file, rejects the
//! whole file. Nothing is
//! persisted here; the caller stores the returned bills.

use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::domain::bill_validator::BillValidator;
use crate::domain::error::{BillError, CsvColumn};
use crate::domain::models::bill::{BillStatus, NewBill, MINIMUM_AMOUNT};
use crate::storage::BillStorage;

const COLUMNS_NUMBER: usize = 5;
const DUE_DATE_COLUMN: usize = 0;
const PAYMENT_DATE_COLUMN: usize = 1;
const AMOUNT_COLUMN: usize = 2;
const DESCRIPTION_COLUMN: usize = 3;
const STATUS_COLUMN: usize = 4;

/// Standard alphabet; trailing `=` padding may be present or omitted
const CSV_PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Clone)]
pub struct CsvIngestion<S: BillStorage> {
    bill_validator: BillValidator<S>,
}

impl<S: BillStorage> CsvIngestion<S> {
    pub fn new(bill_validator: BillValidator<S>) -> Self {
        Self { bill_validator }
    }

    /// Decode, validate and build the bills described by a base64 CSV payload.
    ///
    /// Each built bill is checked against the store and against the earlier
    /// lines of the same file before the next line is read, so the first
    /// offending line aborts the ingestion.
    pub async fn process_csv_base64(&self, base64_csv: &str) -> Result<Vec<NewBill>, BillError> {
        let decoded_csv = decode_payload(base64_csv)?;
        let mut bills = Vec::new();

        for (index, line) in decoded_csv.lines().enumerate() {
            let line_number = index + 1;
            let columns = split_columns(line);
            if columns.len() < COLUMNS_NUMBER {
                debug!("Skipping CSV line {} with {} columns", line_number, columns.len());
                continue;
            }

            let bill = parse_bill(line_number, &columns)?;
            self.bill_validator.check_bill_already_registered(&bill).await?;

            let key = bill.duplicate_key();
            if bills.iter().any(|earlier: &NewBill| earlier.duplicate_key() == key) {
                warn!("CSV line {} repeats an earlier line of the same file", line_number);
                return Err(BillError::duplicate(key));
            }

            bills.push(bill);
        }

        info!("CSV payload produced {} bills", bills.len());
        Ok(bills)
    }
}

fn decode_payload(base64_csv: &str) -> Result<String, BillError> {
    let bytes = CSV_PAYLOAD_ENGINE.decode(base64_csv)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Comma-separated fields of one line. Trailing empty fields do not count
/// toward the column total, so `a,b,c,d,` has four columns.
fn split_columns(line: &str) -> Vec<&str> {
    let mut columns: Vec<&str> = line.split(',').collect();
    while columns.last().is_some_and(|column| column.is_empty()) {
        columns.pop();
    }
    columns
}

fn parse_bill(line_number: usize, columns: &[&str]) -> Result<NewBill, BillError> {
    let due_date = parse_date(line_number, CsvColumn::DueDate, columns[DUE_DATE_COLUMN])?;
    let payment_date = parse_date(line_number, CsvColumn::PaymentDate, columns[PAYMENT_DATE_COLUMN])?;
    let amount = parse_amount(line_number, columns[AMOUNT_COLUMN])?;
    let description = columns[DESCRIPTION_COLUMN].trim().to_string();
    let status = parse_status(line_number, columns[STATUS_COLUMN])?;

    Ok(NewBill {
        due_date,
        payment_date: Some(payment_date),
        amount,
        description,
        status: status.as_str().to_string(),
    })
}

/// Strict ISO `YYYY-MM-DD`: zero-padded, no sign, no extra characters
fn parse_date(line_number: usize, column: CsvColumn, raw: &str) -> Result<NaiveDate, BillError> {
    let trimmed = raw.trim();
    if !is_iso_date_shape(trimmed) {
        return Err(BillError::invalid_format(line_number, column));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|_| BillError::invalid_format(line_number, column))
}

fn is_iso_date_shape(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

fn parse_amount(line_number: usize, raw: &str) -> Result<Decimal, BillError> {
    let trimmed = raw.trim();
    // Decimal's parser tolerates `_` digit separators; bill amounts never carry them
    if trimmed.contains('_') {
        return Err(BillError::invalid_format(line_number, CsvColumn::Amount));
    }
    let amount = trimmed
        .parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| BillError::invalid_format(line_number, CsvColumn::Amount))?;

    if amount < MINIMUM_AMOUNT {
        return Err(BillError::invalid_value(line_number, CsvColumn::Amount, raw));
    }
    Ok(amount)
}

fn parse_status(line_number: usize, raw: &str) -> Result<BillStatus, BillError> {
    BillStatus::parse(raw.trim())
        .ok_or_else(|| BillError::invalid_value(line_number, CsvColumn::Status, raw))
}
