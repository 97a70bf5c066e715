use chrono::NaiveDate;
use snapbooks_domain::{Books, Debt};
use uuid::Uuid;

use crate::{validate, CoreError, ServiceResult};

pub struct DebtService;

impl DebtService {
    pub fn add(books: &mut Books, mut debt: Debt) -> ServiceResult<Uuid> {
        Self::validate(&debt)?;
        validate::paid_state(debt.paid, debt.paid_date)?;
        if !debt.paid {
            debt.paid_date = None;
        }
        Ok(books.add_debt(debt))
    }

    pub fn edit(books: &mut Books, id: Uuid, changes: Debt) -> ServiceResult<()> {
        Self::validate(&changes)?;
        let debt = books.debt_mut(id).ok_or(CoreError::DebtNotFound(id))?;
        debt.person_name = changes.person_name;
        debt.amount = changes.amount;
        debt.reason = changes.reason;
        debt.date = changes.date;
        books.touch();
        Ok(())
    }

    pub fn mark_paid(books: &mut Books, id: Uuid, date: NaiveDate) -> ServiceResult<()> {
        let debt = books.debt_mut(id).ok_or(CoreError::DebtNotFound(id))?;
        debt.mark_paid(date);
        books.touch();
        Ok(())
    }

    pub fn mark_unpaid(books: &mut Books, id: Uuid) -> ServiceResult<()> {
        let debt = books.debt_mut(id).ok_or(CoreError::DebtNotFound(id))?;
        debt.mark_unpaid();
        books.touch();
        Ok(())
    }

    pub fn remove(books: &mut Books, id: Uuid) -> ServiceResult<Debt> {
        books.remove_debt(id).ok_or(CoreError::DebtNotFound(id))
    }

    pub fn list(books: &Books) -> Vec<&Debt> {
        books.debts.iter().collect()
    }

    fn validate(debt: &Debt) -> ServiceResult<()> {
        validate::require_name("person name", &debt.person_name)?;
        validate::non_negative("amount", debt.amount)
    }
}
