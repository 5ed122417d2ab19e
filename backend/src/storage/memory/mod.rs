//! In-memory bill store used by the domain tests.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::models::bill::{Bill, BillFilter, DuplicateKey, NewBill, Page, PageRequest};
use crate::storage::{BillStorage, Connection};

#[derive(Clone, Default)]
pub struct MemoryConnection {
    bills: Arc<RwLock<Vec<Bill>>>,
}

impl MemoryConnection {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Connection for MemoryConnection {
    type BillRepository = MemoryBillRepository;

    fn create_bill_repository(&self) -> Self::BillRepository {
        MemoryBillRepository {
            bills: self.bills.clone(),
        }
    }
}

/// Bills kept in insertion order behind a lock
#[derive(Clone)]
pub struct MemoryBillRepository {
    bills: Arc<RwLock<Vec<Bill>>>,
}

impl MemoryBillRepository {
    pub async fn len(&self) -> usize {
        self.bills.read().await.len()
    }
}

#[async_trait]
impl BillStorage for MemoryBillRepository {
    async fn store_bill(&self, bill: &NewBill) -> Result<Bill> {
        let bill = Bill::from_new(Uuid::new_v4(), bill.clone());
        self.bills.write().await.push(bill.clone());
        Ok(bill)
    }

    async fn store_bills(&self, bills: &[NewBill]) -> Result<Vec<Bill>> {
        let stored: Vec<Bill> = bills
            .iter()
            .map(|bill| Bill::from_new(Uuid::new_v4(), bill.clone()))
            .collect();
        self.bills.write().await.extend(stored.iter().cloned());
        Ok(stored)
    }

    async fn update_bill(&self, bill: &Bill) -> Result<()> {
        let mut bills = self.bills.write().await;
        if let Some(existing) = bills.iter_mut().find(|b| b.id == bill.id) {
            *existing = bill.clone();
        }
        Ok(())
    }

    async fn get_bill(&self, bill_id: Uuid) -> Result<Option<Bill>> {
        Ok(self.bills.read().await.iter().find(|b| b.id == bill_id).cloned())
    }

    async fn find_bills_by_duplicate_key(&self, key: &DuplicateKey) -> Result<Vec<Bill>> {
        Ok(self
            .bills
            .read()
            .await
            .iter()
            .filter(|b| key.matches(b))
            .cloned()
            .collect())
    }

    async fn list_bills(&self, filter: &BillFilter, page: PageRequest) -> Result<Page<Bill>> {
        let bills = self.bills.read().await;
        let matching: Vec<&Bill> = bills.iter().filter(|b| filter.matches(b)).collect();
        let content = matching
            .iter()
            .skip(page.offset() as usize)
            .take(page.page_size as usize)
            .map(|b| (*b).clone())
            .collect();

        Ok(Page {
            content,
            page_number: page.page_number,
            page_size: page.page_size,
            total_elements: matching.len() as u64,
        })
    }

    async fn sum_amount_by_payment_date_between(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Option<Decimal>> {
        let bills = self.bills.read().await;
        let amounts: Vec<Decimal> = bills
            .iter()
            .filter(|b| {
                b.payment_date
                    .is_some_and(|paid| paid >= start_date && paid <= end_date)
            })
            .map(|b| b.amount)
            .collect();

        if amounts.is_empty() {
            return Ok(None);
        }
        amounts
            .into_iter()
            .try_fold(Decimal::ZERO, |total, amount| total.checked_add(amount))
            .map(Some)
            .ok_or_else(|| anyhow!("sum of bill amounts overflowed"))
    }
}
