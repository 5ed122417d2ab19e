use crate::domain::models::bill::{Bill as DomainBill, Page};
use shared::{Bill as SharedBill, BillPage};

pub struct BillMapper;

impl BillMapper {
    pub fn to_dto(domain: DomainBill) -> SharedBill {
        SharedBill {
            id: domain.id,
            due_date: domain.due_date,
            payment_date: domain.payment_date,
            amount: domain.amount,
            description: domain.description,
            status: domain.status,
        }
    }

    pub fn to_page_dto(page: Page<DomainBill>) -> BillPage {
        let total_pages = page.total_pages();
        BillPage {
            content: page.content.into_iter().map(Self::to_dto).collect(),
            page_number: page.page_number,
            page_size: page.page_size,
            total_elements: page.total_elements,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn domain_bill(description: &str) -> DomainBill {
        DomainBill {
            id: Uuid::new_v4(),
            due_date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            payment_date: None,
            amount: dec!(42.50),
            description: description.to_string(),
            status: "PAGO".to_string(),
        }
    }

    #[test]
    fn test_to_dto_copies_every_field() {
        let bill = domain_bill("Internet");
        let dto = BillMapper::to_dto(bill.clone());

        assert_eq!(dto.id, bill.id);
        assert_eq!(dto.due_date, bill.due_date);
        assert_eq!(dto.payment_date, None);
        assert_eq!(dto.amount, dec!(42.50));
        assert_eq!(dto.description, "Internet");
        assert_eq!(dto.status, "PAGO");
    }

    #[test]
    fn test_to_page_dto_computes_total_pages() {
        let page = Page {
            content: vec![domain_bill("a"), domain_bill("b")],
            page_number: 1,
            page_size: 2,
            total_elements: 5,
        };

        let dto = BillMapper::to_page_dto(page);

        assert_eq!(dto.content.len(), 2);
        assert_eq!(dto.page_number, 1);
        assert_eq!(dto.total_elements, 5);
        assert_eq!(dto.total_pages, 3);
    }
}
