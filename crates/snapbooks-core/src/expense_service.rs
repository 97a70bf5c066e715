use snapbooks_domain::{Books, Expense};
use tracing::debug;
use uuid::Uuid;

use crate::{validate, CoreError, ServiceResult};

pub struct ExpenseService;

impl ExpenseService {
    pub fn add(books: &mut Books, expense: Expense) -> ServiceResult<Uuid> {
        Self::validate(books, &expense)?;
        debug!(category = %expense.category, amount = %expense.amount, "adding expense");
        Ok(books.add_expense(expense))
    }

    pub fn edit(books: &mut Books, id: Uuid, changes: Expense) -> ServiceResult<()> {
        Self::validate(books, &changes)?;
        let expense = books
            .expense_mut(id)
            .ok_or(CoreError::ExpenseNotFound(id))?;
        expense.date = changes.date;
        expense.category = changes.category;
        expense.amount = changes.amount;
        expense.session_id = changes.session_id;
        expense.paid_by = changes.paid_by;
        expense.notes = changes.notes;
        books.touch();
        Ok(())
    }

    pub fn remove(books: &mut Books, id: Uuid) -> ServiceResult<Expense> {
        books
            .remove_expense(id)
            .ok_or(CoreError::ExpenseNotFound(id))
    }

    pub fn list(books: &Books) -> Vec<&Expense> {
        books.expenses.iter().collect()
    }

    fn validate(books: &Books, expense: &Expense) -> ServiceResult<()> {
        validate::non_negative("amount", expense.amount)?;
        if let Some(session_id) = expense.session_id {
            validate::session_exists(books, session_id)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use snapbooks_domain::{ExpenseCategory, Money};

    #[test]
    fn linked_session_must_exist() {
        let mut books = Books::new("Expenses");
        let date = NaiveDate::from_ymd_opt(2025, 2, 2).unwrap();
        let expense = Expense::new(date, ExpenseCategory::Fuel, Money::from_major(30))
            .for_session(Uuid::new_v4());
        assert!(matches!(
            ExpenseService::add(&mut books, expense),
            Err(CoreError::SessionNotFound(_))
        ));

        let id = ExpenseService::add(
            &mut books,
            Expense::new(date, ExpenseCategory::Fuel, Money::from_major(30)),
        )
        .expect("unlinked expense");
        let mut changes = books.expense(id).cloned().unwrap();
        changes.amount = Money::from_cents(-100);
        assert!(ExpenseService::edit(&mut books, id, changes).is_err());
        assert_eq!(ExpenseService::list(&books).len(), 1);
    }
}
