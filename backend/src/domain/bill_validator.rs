//! Domain rules shared by single-bill operations and CSV ingestion.

use chrono::NaiveDate;
use tracing::warn;
use uuid::Uuid;

use crate::domain::error::BillError;
use crate::domain::models::bill::{Bill, DuplicateKey, NewBill};
use crate::storage::BillStorage;

#[derive(Clone)]
pub struct BillValidator<S: BillStorage> {
    bill_repository: S,
}

impl<S: BillStorage> BillValidator<S> {
    pub fn new(bill_repository: S) -> Self {
        Self { bill_repository }
    }

    /// Fails with `DuplicateBill` when a stored bill already has the same
    /// (due date, amount, status).
    pub async fn check_bill_already_registered(&self, bill: &NewBill) -> Result<(), BillError> {
        self.ensure_key_is_free(bill.duplicate_key(), None).await
    }

    /// Same as [`Self::check_bill_already_registered`] for a bill that is
    /// being updated; the bill's own stored row does not count.
    pub async fn check_updated_bill_not_registered(&self, bill: &Bill) -> Result<(), BillError> {
        self.ensure_key_is_free(bill.duplicate_key(), Some(bill.id)).await
    }

    async fn ensure_key_is_free(&self, key: DuplicateKey, own_id: Option<Uuid>) -> Result<(), BillError> {
        let conflict = self
            .bill_repository
            .find_bills_by_duplicate_key(&key)
            .await?
            .into_iter()
            .any(|existing| Some(existing.id) != own_id);

        if conflict {
            warn!(
                "Bill already registered: due {} amount {} status {}",
                key.due_date, key.amount, key.status
            );
            return Err(BillError::duplicate(key));
        }
        Ok(())
    }

    pub async fn check_existing_bill(&self, bill_id: Uuid) -> Result<Bill, BillError> {
        self.bill_repository
            .get_bill(bill_id)
            .await?
            .ok_or(BillError::BillNotFound)
    }

    /// A zero-length window (start == end) is valid
    pub fn validate_search_period_for_sum_of_bills(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<(), BillError> {
        if start_date > end_date {
            return Err(BillError::InvalidPeriod);
        }
        Ok(())
    }
}
