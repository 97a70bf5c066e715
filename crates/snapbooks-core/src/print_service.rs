use chrono::NaiveDate;
use snapbooks_domain::{Books, Print};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{validate, CoreError, ServiceResult};

pub struct PrintService;

impl PrintService {
    pub fn add(books: &mut Books, print: Print) -> ServiceResult<Uuid> {
        Self::validate(&print)?;
        if print.actual_cost > print.amount_charged {
            warn!(
                client = %print.client_name,
                cost = %print.actual_cost,
                charged = %print.amount_charged,
                "print cost exceeds amount charged"
            );
        }
        Ok(books.add_print(print))
    }

    /// Updates a print. Once delivered, its amounts are settled and may not change.
    pub fn edit(books: &mut Books, id: Uuid, changes: Print) -> ServiceResult<()> {
        Self::validate(&changes)?;
        let print = books.print_mut(id).ok_or(CoreError::PrintNotFound(id))?;
        if print.is_delivered()
            && (changes.amount_charged != print.amount_charged
                || changes.actual_cost != print.actual_cost)
        {
            return Err(CoreError::InvalidOperation(
                "amounts of a delivered print cannot be changed".into(),
            ));
        }
        print.client_name = changes.client_name;
        print.charge_date = changes.charge_date;
        print.delivery_date = changes.delivery_date;
        print.amount_charged = changes.amount_charged;
        print.actual_cost = changes.actual_cost;
        books.touch();
        debug!(%id, "print updated");
        Ok(())
    }

    pub fn deliver(books: &mut Books, id: Uuid, date: NaiveDate) -> ServiceResult<()> {
        let print = books.print_mut(id).ok_or(CoreError::PrintNotFound(id))?;
        if print.is_delivered() {
            return Err(CoreError::InvalidOperation(format!(
                "print for {} is already delivered",
                print.client_name
            )));
        }
        print.mark_delivered(date);
        books.touch();
        debug!(%id, %date, "print delivered");
        Ok(())
    }

    pub fn remove(books: &mut Books, id: Uuid) -> ServiceResult<Print> {
        books.remove_print(id).ok_or(CoreError::PrintNotFound(id))
    }

    pub fn list(books: &Books) -> Vec<&Print> {
        books.prints.iter().collect()
    }

    fn validate(print: &Print) -> ServiceResult<()> {
        validate::require_name("client name", &print.client_name)?;
        validate::non_negative("amount charged", print.amount_charged)?;
        validate::non_negative("actual cost", print.actual_cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapbooks_domain::Money;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, d).unwrap()
    }

    #[test]
    fn delivered_print_amounts_are_locked() {
        let mut books = Books::new("Prints");
        let id = PrintService::add(
            &mut books,
            Print::new("Eva", day(1), Money::from_major(50), Money::from_major(20)),
        )
        .expect("add print");

        let mut changes = books.print(id).cloned().unwrap();
        changes.actual_cost = Money::from_major(22);
        PrintService::edit(&mut books, id, changes.clone()).expect("edit before delivery");

        PrintService::deliver(&mut books, id, day(4)).expect("deliver");
        assert_eq!(books.print(id).unwrap().delivery_date, Some(day(4)));

        changes.amount_charged = Money::from_major(70);
        assert!(matches!(
            PrintService::edit(&mut books, id, changes),
            Err(CoreError::InvalidOperation(_))
        ));
    }

    #[test]
    fn deliver_twice_is_rejected() {
        let mut books = Books::new("Prints");
        let id = books.add_print(Print::new("Eva", day(1), Money::from_major(50), Money::ZERO));
        PrintService::deliver(&mut books, id, day(2)).unwrap();
        assert!(PrintService::deliver(&mut books, id, day(3)).is_err());
        assert_eq!(books.print(id).unwrap().delivery_date, Some(day(2)));
    }

    #[test]
    fn cost_above_charge_is_accepted() {
        let mut books = Books::new("Prints");
        let print = Print::new("Eva", day(1), Money::from_major(10), Money::from_major(12));
        assert!(PrintService::add(&mut books, print).is_ok());
    }
}
