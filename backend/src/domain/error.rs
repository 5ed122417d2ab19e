use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt;
use thiserror::Error;

use crate::domain::models::bill::DuplicateKey;

/// Domain errors raised by the validator, the CSV ingestion and the bill service
#[derive(Debug, Error)]
pub enum BillError {
    #[error("A conta com a data de vencimento {due_date}, valor {}, e status '{status}' já foi cadastrada!", two_decimals(.amount))]
    DuplicateBill {
        due_date: NaiveDate,
        amount: Decimal,
        status: String,
    },

    #[error("Conta não encontrada")]
    BillNotFound,

    #[error("A data inicial deve ser menor do que a data final.")]
    InvalidPeriod,

    #[error("A linha {line} coluna {column} possui {problem}")]
    InvalidCsvField {
        line: usize,
        column: CsvColumn,
        problem: FieldProblem,
    },

    #[error("Arquivo CSV em base64 inválido: {0}")]
    MalformedCsvPayload(#[from] base64::DecodeError),

    #[error("{0}")]
    InvalidInput(String),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl BillError {
    pub fn duplicate(key: DuplicateKey) -> Self {
        Self::DuplicateBill {
            due_date: key.due_date,
            amount: key.amount,
            status: key.status,
        }
    }

    pub fn invalid_format(line: usize, column: CsvColumn) -> Self {
        Self::InvalidCsvField {
            line,
            column,
            problem: FieldProblem::Format,
        }
    }

    pub fn invalid_value(line: usize, column: CsvColumn, raw: &str) -> Self {
        Self::InvalidCsvField {
            line,
            column,
            problem: FieldProblem::Value(raw.to_string()),
        }
    }
}

fn two_decimals(amount: &Decimal) -> Decimal {
    let mut shown = *amount;
    shown.rescale(2);
    shown
}

/// Columns of the bill CSV layout, labelled the way users see them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvColumn {
    DueDate,
    PaymentDate,
    Amount,
    Status,
}

impl CsvColumn {
    pub fn label(&self) -> &'static str {
        match self {
            Self::DueDate => "Data Vencimento",
            Self::PaymentDate => "Data Pagamento",
            Self::Amount => "Total",
            Self::Status => "Status",
        }
    }
}

impl fmt::Display for CsvColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldProblem {
    /// The text could not be parsed into the column's type
    Format,
    /// The text parsed but is not an accepted value; holds the raw field
    Value(String),
}

impl fmt::Display for FieldProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Format => f.write_str("formato inválido."),
            Self::Value(raw) => write!(f, "valor inválido: {}", raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_duplicate_message_formats_amount_with_two_decimals() {
        let error = BillError::DuplicateBill {
            due_date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            amount: dec!(100),
            status: "PAGO".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "A conta com a data de vencimento 2025-07-01, valor 100.00, e status 'PAGO' já foi cadastrada!"
        );
    }

    #[test]
    fn test_duplicate_message_rounds_extra_precision() {
        let error = BillError::DuplicateBill {
            due_date: NaiveDate::from_ymd_opt(2025, 7, 5).unwrap(),
            amount: dec!(220.755),
            status: "PENDENTE".to_string(),
        };
        assert!(error.to_string().contains("valor 220.76,"));
    }

    #[test]
    fn test_csv_field_messages() {
        assert_eq!(
            BillError::invalid_format(1, CsvColumn::DueDate).to_string(),
            "A linha 1 coluna Data Vencimento possui formato inválido."
        );
        assert_eq!(
            BillError::invalid_format(3, CsvColumn::PaymentDate).to_string(),
            "A linha 3 coluna Data Pagamento possui formato inválido."
        );
        assert_eq!(
            BillError::invalid_value(2, CsvColumn::Status, " pagx ").to_string(),
            "A linha 2 coluna Status possui valor inválido:  pagx "
        );
    }

    #[test]
    fn test_fixed_messages() {
        assert_eq!(BillError::BillNotFound.to_string(), "Conta não encontrada");
        assert_eq!(
            BillError::InvalidPeriod.to_string(),
            "A data inicial deve ser menor do que a data final."
        );
    }
}
