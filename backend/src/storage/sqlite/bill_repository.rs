use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{sqlite::SqliteRow, QueryBuilder, Row, Sqlite};
use tracing::debug;
use uuid::Uuid;

use super::connection::DbConnection;
use crate::domain::models::bill::{Bill, BillFilter, DuplicateKey, NewBill, Page, PageRequest};
use crate::storage::BillStorage;

const BILL_COLUMNS: &str = "id, due_date, payment_date, amount, description, status";

/// SQLite-backed repository for bills
#[derive(Clone)]
pub struct SqliteBillRepository {
    db: DbConnection,
}

impl SqliteBillRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    async fn insert_bill<'e, E>(executor: E, bill: &Bill) -> Result<()>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            r#"
            INSERT INTO bills (id, due_date, payment_date, amount, amount_key, description, status)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(bill.id)
        .bind(bill.due_date)
        .bind(bill.payment_date)
        .bind(bill.amount.to_string())
        .bind(amount_key(&bill.amount))
        .bind(&bill.description)
        .bind(&bill.status)
        .execute(executor)
        .await?;
        Ok(())
    }
}

/// Normalized text form used for equality lookups on amounts
fn amount_key(amount: &Decimal) -> String {
    amount.normalize().to_string()
}

fn bill_from_row(row: &SqliteRow) -> Result<Bill> {
    let amount: String = row.try_get("amount")?;
    let description: Option<String> = row.try_get("description")?;
    let status: Option<String> = row.try_get("status")?;

    Ok(Bill {
        id: row.try_get("id")?,
        due_date: row.try_get("due_date")?,
        payment_date: row.try_get("payment_date")?,
        amount: amount.parse()?,
        description: description.unwrap_or_default(),
        status: status.unwrap_or_default(),
    })
}

fn push_filter(builder: &mut QueryBuilder<'_, Sqlite>, filter: &BillFilter) {
    if let Some(due_date) = filter.due_date {
        builder.push(" AND due_date = ").push_bind(due_date);
    }
    if let Some(description) = &filter.description {
        // LIKE is case-insensitive for ASCII in SQLite
        builder
            .push(" AND description LIKE ")
            .push_bind(format!("%{}%", escape_like(description)))
            .push(" ESCAPE '\\'");
    }
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[async_trait]
impl BillStorage for SqliteBillRepository {
    async fn store_bill(&self, bill: &NewBill) -> Result<Bill> {
        let bill = Bill::from_new(Uuid::new_v4(), bill.clone());
        Self::insert_bill(self.db.pool(), &bill).await?;
        debug!("Stored bill {}", bill.id);
        Ok(bill)
    }

    async fn store_bills(&self, bills: &[NewBill]) -> Result<Vec<Bill>> {
        let mut tx = self.db.pool().begin().await?;
        let mut stored = Vec::with_capacity(bills.len());

        for new_bill in bills {
            let bill = Bill::from_new(Uuid::new_v4(), new_bill.clone());
            Self::insert_bill(&mut *tx, &bill).await?;
            stored.push(bill);
        }

        tx.commit().await?;
        debug!("Stored {} bills in one transaction", stored.len());
        Ok(stored)
    }

    async fn update_bill(&self, bill: &Bill) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE bills
            SET due_date = ?, payment_date = ?, amount = ?, amount_key = ?, description = ?, status = ?
            WHERE id = ?
            "#,
        )
        .bind(bill.due_date)
        .bind(bill.payment_date)
        .bind(bill.amount.to_string())
        .bind(amount_key(&bill.amount))
        .bind(&bill.description)
        .bind(&bill.status)
        .bind(bill.id)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn get_bill(&self, bill_id: Uuid) -> Result<Option<Bill>> {
        let row = sqlx::query(&format!("SELECT {} FROM bills WHERE id = ?", BILL_COLUMNS))
            .bind(bill_id)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(bill_from_row).transpose()
    }

    async fn find_bills_by_duplicate_key(&self, key: &DuplicateKey) -> Result<Vec<Bill>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM bills WHERE due_date = ? AND amount_key = ? AND status = ?",
            BILL_COLUMNS
        ))
        .bind(key.due_date)
        .bind(amount_key(&key.amount))
        .bind(&key.status)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(bill_from_row).collect()
    }

    async fn list_bills(&self, filter: &BillFilter, page: PageRequest) -> Result<Page<Bill>> {
        let mut count_query: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT COUNT(*) FROM bills WHERE 1 = 1");
        push_filter(&mut count_query, filter);
        let total_elements: i64 = count_query
            .build_query_scalar::<i64>()
            .fetch_one(self.db.pool())
            .await?;

        let mut select_query: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {} FROM bills WHERE 1 = 1", BILL_COLUMNS));
        push_filter(&mut select_query, filter);
        select_query
            .push(" ORDER BY rowid ASC LIMIT ")
            .push_bind(i64::from(page.page_size))
            .push(" OFFSET ")
            .push_bind(i64::try_from(page.offset())?);

        let rows = select_query.build().fetch_all(self.db.pool()).await?;
        let content = rows.iter().map(bill_from_row).collect::<Result<Vec<_>>>()?;

        Ok(Page {
            content,
            page_number: page.page_number,
            page_size: page.page_size,
            total_elements: u64::try_from(total_elements)?,
        })
    }

    async fn sum_amount_by_payment_date_between(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Option<Decimal>> {
        // Amounts are stored as text, so they are summed here to keep full precision
        let amounts: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT amount FROM bills
            WHERE payment_date BETWEEN ? AND ?
            "#,
        )
        .bind(start_date)
        .bind(end_date)
        .fetch_all(self.db.pool())
        .await?;

        if amounts.is_empty() {
            return Ok(None);
        }

        let mut total = Decimal::ZERO;
        for amount in amounts {
            total = total
                .checked_add(amount.parse::<Decimal>()?)
                .ok_or_else(|| anyhow!("sum of bill amounts between {} and {} overflowed", start_date, end_date))?;
        }
        Ok(Some(total))
    }
}
