//! Bill service domain logic: single-bill CRUD, listing, the payment-period
//! total and CSV bulk ingestion.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use shared::{BillListRequest, SaveBillRequest, UpdateBillRequest};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::domain::bill_validator::BillValidator;
use crate::domain::csv_ingestion::CsvIngestion;
use crate::domain::error::BillError;
use crate::domain::models::bill::{
    Bill, BillFilter, NewBill, Page, PageRequest, MAX_DESCRIPTION_LENGTH, MAX_STATUS_LENGTH,
    MINIMUM_AMOUNT,
};
use crate::storage::{BillStorage, Connection};

#[derive(Clone)]
pub struct BillService<C: Connection> {
    bill_repository: C::BillRepository,
    bill_validator: BillValidator<C::BillRepository>,
    csv_ingestion: CsvIngestion<C::BillRepository>,
}

impl<C: Connection> BillService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        let bill_repository = connection.create_bill_repository();
        let bill_validator = BillValidator::new(bill_repository.clone());
        let csv_ingestion = CsvIngestion::new(bill_validator.clone());
        Self {
            bill_repository,
            bill_validator,
            csv_ingestion,
        }
    }

    pub async fn save(&self, request: SaveBillRequest) -> Result<Bill, BillError> {
        validate_amount(&request.amount)?;
        validate_description(&request.description, true)?;
        validate_status(&request.status)?;

        let bill = NewBill {
            due_date: request.due_date,
            payment_date: Some(request.payment_date),
            amount: request.amount,
            description: request.description,
            status: request.status,
        };
        self.bill_validator.check_bill_already_registered(&bill).await?;

        let stored = self.bill_repository.store_bill(&bill).await?;
        info!("Saved bill {}", stored.id);
        Ok(stored)
    }

    /// Apply the fields present in the request, then re-check the duplicate rule
    pub async fn update(&self, bill_id: Uuid, request: UpdateBillRequest) -> Result<Bill, BillError> {
        if let Some(amount) = &request.amount {
            validate_amount(amount)?;
        }
        if let Some(description) = &request.description {
            validate_description(description, false)?;
        }

        let mut bill = self.bill_validator.check_existing_bill(bill_id).await?;
        if let Some(due_date) = request.due_date {
            bill.due_date = due_date;
        }
        if let Some(amount) = request.amount {
            bill.amount = amount;
        }
        if let Some(description) = request.description {
            bill.description = description;
        }
        self.bill_validator.check_updated_bill_not_registered(&bill).await?;

        self.bill_repository.update_bill(&bill).await?;
        info!("Updated bill {}", bill.id);
        Ok(bill)
    }

    /// Status changes are not checked against the duplicate rule nor the CSV vocabulary
    pub async fn update_status(&self, bill_id: Uuid, status: String) -> Result<Bill, BillError> {
        validate_status(&status)?;

        let mut bill = self.bill_validator.check_existing_bill(bill_id).await?;
        bill.status = status;

        self.bill_repository.update_bill(&bill).await?;
        info!("Updated status of bill {} to {}", bill.id, bill.status);
        Ok(bill)
    }

    pub async fn find_by_id(&self, bill_id: Uuid) -> Result<Bill, BillError> {
        self.bill_validator.check_existing_bill(bill_id).await
    }

    pub async fn find_bills(&self, request: BillListRequest) -> Result<Page<Bill>, BillError> {
        if request.page_size == 0 {
            return Err(BillError::InvalidInput(
                "pageSize deve ser maior que zero".to_string(),
            ));
        }

        let filter = BillFilter {
            due_date: request.due_date,
            description: request.description,
        };
        let page = PageRequest {
            page_number: request.page_number,
            page_size: request.page_size,
        };

        Ok(self.bill_repository.list_bills(&filter, page).await?)
    }

    /// Total amount of bills paid within `[start_date, end_date]`, zero when none
    pub async fn sum_amount_by_payment_date_between(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Decimal, BillError> {
        self.bill_validator
            .validate_search_period_for_sum_of_bills(start_date, end_date)?;

        let total = self
            .bill_repository
            .sum_amount_by_payment_date_between(start_date, end_date)
            .await?;
        Ok(total.unwrap_or(Decimal::ZERO))
    }

    /// Validate every line of the payload first, then store all bills at once
    pub async fn ingest_csv(&self, file_base64: &str) -> Result<Vec<Bill>, BillError> {
        let bills = self.csv_ingestion.process_csv_base64(file_base64).await?;
        if bills.is_empty() {
            info!("CSV payload had no bill lines; nothing stored");
            return Ok(Vec::new());
        }

        let stored = self.bill_repository.store_bills(&bills).await?;
        info!("Stored {} bills from CSV payload", stored.len());
        Ok(stored)
    }
}

fn validate_amount(amount: &Decimal) -> Result<(), BillError> {
    if *amount < MINIMUM_AMOUNT {
        return Err(BillError::InvalidInput("amount deve ser maior que zero".to_string()));
    }
    Ok(())
}

fn validate_description(description: &str, required: bool) -> Result<(), BillError> {
    if required && description.trim().is_empty() {
        return Err(BillError::InvalidInput("description é obrigatória".to_string()));
    }
    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(BillError::InvalidInput(format!(
            "description deve ter no máximo {} caracteres",
            MAX_DESCRIPTION_LENGTH
        )));
    }
    Ok(())
}

fn validate_status(status: &str) -> Result<(), BillError> {
    if status.trim().is_empty() {
        return Err(BillError::InvalidInput("status é obrigatório".to_string()));
    }
    if status.chars().count() > MAX_STATUS_LENGTH {
        return Err(BillError::InvalidInput(format!(
            "status deve ter no máximo {} caracteres",
            MAX_STATUS_LENGTH
        )));
    }
    Ok(())
}
