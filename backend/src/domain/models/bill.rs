use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt;
use uuid::Uuid;

/// Smallest amount a bill may carry (0.01)
pub const MINIMUM_AMOUNT: Decimal = Decimal::from_parts(1, 0, 0, false, 2);
pub const MAX_DESCRIPTION_LENGTH: usize = 255;
pub const MAX_STATUS_LENGTH: usize = 50;

/// A bill that has not been persisted yet and therefore has no id
#[derive(Debug, Clone, PartialEq)]
pub struct NewBill {
    pub due_date: NaiveDate,
    pub payment_date: Option<NaiveDate>,
    pub amount: Decimal,
    pub description: String,
    pub status: String,
}

impl NewBill {
    pub fn duplicate_key(&self) -> DuplicateKey {
        DuplicateKey {
            due_date: self.due_date,
            amount: self.amount,
            status: self.status.clone(),
        }
    }
}

/// A persisted bill. The id is assigned by the store on insert.
#[derive(Debug, Clone, PartialEq)]
pub struct Bill {
    pub id: Uuid,
    pub due_date: NaiveDate,
    pub payment_date: Option<NaiveDate>,
    pub amount: Decimal,
    pub description: String,
    pub status: String,
}

impl Bill {
    pub fn from_new(id: Uuid, bill: NewBill) -> Self {
        Self {
            id,
            due_date: bill.due_date,
            payment_date: bill.payment_date,
            amount: bill.amount,
            description: bill.description,
            status: bill.status,
        }
    }

    pub fn duplicate_key(&self) -> DuplicateKey {
        DuplicateKey {
            due_date: self.due_date,
            amount: self.amount,
            status: self.status.clone(),
        }
    }
}

/// The (due date, amount, status) triple that must be unique across bills.
/// Description and payment date are deliberately not part of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateKey {
    pub due_date: NaiveDate,
    pub amount: Decimal,
    pub status: String,
}

impl DuplicateKey {
    pub fn matches(&self, bill: &Bill) -> bool {
        // Decimal equality is numeric, so 150.00 matches 150
        bill.due_date == self.due_date && bill.amount == self.amount && bill.status == self.status
    }
}

/// Status vocabulary accepted by CSV ingestion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillStatus {
    Pago,
    Pendente,
    Atrasado,
}

impl BillStatus {
    /// Case-insensitive lookup of an already trimmed value
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_uppercase().as_str() {
            "PAGO" => Some(Self::Pago),
            "PENDENTE" => Some(Self::Pendente),
            "ATRASADO" => Some(Self::Atrasado),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pago => "PAGO",
            Self::Pendente => "PENDENTE",
            Self::Atrasado => "ATRASADO",
        }
    }
}

impl fmt::Display for BillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional criteria for listing bills. `None` fields are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BillFilter {
    pub due_date: Option<NaiveDate>,
    /// Case-insensitive substring of the description
    pub description: Option<String>,
}

impl BillFilter {
    pub fn matches(&self, bill: &Bill) -> bool {
        if let Some(due_date) = self.due_date {
            if bill.due_date != due_date {
                return false;
            }
        }
        if let Some(description) = &self.description {
            if !bill
                .description
                .to_lowercase()
                .contains(&description.to_lowercase())
            {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Zero-based
    pub page_number: u32,
    pub page_size: u32,
}

impl PageRequest {
    pub fn offset(&self) -> u64 {
        u64::from(self.page_number) * u64::from(self.page_size)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page_number: u32,
    pub page_size: u32,
    pub total_elements: u64,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> u32 {
        if self.page_size == 0 {
            return 0;
        }
        u32::try_from(self.total_elements.div_ceil(u64::from(self.page_size))).unwrap_or(u32::MAX)
    }
}
