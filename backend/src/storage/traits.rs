//! # Storage Traits
//!
//! Storage abstraction the domain layer depends on. The SQLite repository is
//! used in production and an in-memory repository backs the domain tests.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::models::bill::{Bill, BillFilter, DuplicateKey, NewBill, Page, PageRequest};

/// Trait defining the interface for bill storage operations
#[async_trait]
pub trait BillStorage: Send + Sync {
    /// Store a new bill, assigning its id
    async fn store_bill(&self, bill: &NewBill) -> Result<Bill>;

    /// Store several bills at once. Either every bill is stored or none is.
    async fn store_bills(&self, bills: &[NewBill]) -> Result<Vec<Bill>>;

    /// Overwrite every mutable field of an existing bill (last write wins)
    async fn update_bill(&self, bill: &Bill) -> Result<()>;

    /// Retrieve a specific bill by ID
    async fn get_bill(&self, bill_id: Uuid) -> Result<Option<Bill>>;

    /// All bills sharing the given (due date, amount, status) triple
    async fn find_bills_by_duplicate_key(&self, key: &DuplicateKey) -> Result<Vec<Bill>>;

    /// One page of bills matching the filter, in insertion order
    async fn list_bills(&self, filter: &BillFilter, page: PageRequest) -> Result<Page<Bill>>;

    /// Sum of amounts whose payment date lies in `[start_date, end_date]`.
    /// Returns `None` when no bill falls in the range.
    async fn sum_amount_by_payment_date_between(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Option<Decimal>>;
}

/// Trait defining the interface for storage connections
///
/// Provides a factory for repositories so services can be built against any
/// backend without knowing the implementation details.
pub trait Connection: Send + Sync + Clone {
    /// The type of BillStorage this connection creates
    type BillRepository: BillStorage + Clone;

    /// Create a new bill repository for this connection
    fn create_bill_repository(&self) -> Self::BillRepository;
}
