use snapbooks_domain::{Books, Session, SessionStatus};
use tracing::debug;
use uuid::Uuid;

use crate::{validate, CoreError, ServiceResult};

pub struct SessionService;

impl SessionService {
    pub fn add(books: &mut Books, session: Session) -> ServiceResult<Uuid> {
        Self::validate(&session)?;
        debug!(client = %session.client_name, date = ?session.date, "adding session");
        Ok(books.add_session(session))
    }

    /// Replaces the editable fields of a session. The agreed price is fixed at booking.
    pub fn edit(books: &mut Books, id: Uuid, changes: Session) -> ServiceResult<()> {
        Self::validate(&changes)?;
        let session = books
            .session_mut(id)
            .ok_or(CoreError::SessionNotFound(id))?;
        if changes.price != session.price {
            return Err(CoreError::InvalidOperation(format!(
                "session price is fixed at {} and cannot be changed",
                session.price
            )));
        }
        session.client_name = changes.client_name;
        session.date = changes.date;
        session.session_type = changes.session_type;
        session.photo_count = changes.photo_count;
        session.photographer = changes.photographer;
        session.decoration_cost = changes.decoration_cost;
        session.status = changes.status;
        session.includes_print = changes.includes_print;
        session.notes = changes.notes;
        books.touch();
        debug!(%id, "session updated");
        Ok(())
    }

    /// Deletes the session and detaches any expenses that pointed at it.
    pub fn remove(books: &mut Books, id: Uuid) -> ServiceResult<Session> {
        let removed = books
            .remove_session(id)
            .ok_or(CoreError::SessionNotFound(id))?;
        let mut detached = 0usize;
        for expense in books
            .expenses
            .iter_mut()
            .filter(|expense| expense.session_id == Some(id))
        {
            expense.session_id = None;
            detached += 1;
        }
        debug!(%id, detached, "session removed");
        Ok(removed)
    }

    pub fn advance(books: &mut Books, id: Uuid) -> ServiceResult<SessionStatus> {
        let session = books
            .session_mut(id)
            .ok_or(CoreError::SessionNotFound(id))?;
        let status = session.advance();
        books.touch();
        Ok(status)
    }

    pub fn set_status(books: &mut Books, id: Uuid, status: SessionStatus) -> ServiceResult<()> {
        let session = books
            .session_mut(id)
            .ok_or(CoreError::SessionNotFound(id))?;
        session.set_status(status);
        books.touch();
        Ok(())
    }

    pub fn list(books: &Books) -> Vec<&Session> {
        books.sessions.iter().collect()
    }

    fn validate(session: &Session) -> ServiceResult<()> {
        validate::require_name("client name", &session.client_name)?;
        validate::non_negative("price", session.price)?;
        validate::non_negative("decoration cost", session.decoration_cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use snapbooks_domain::{Expense, ExpenseCategory, Money};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    #[test]
    fn add_rejects_blank_client_and_negative_price() {
        let mut books = Books::new("Sessions");
        let blank = Session::new("  ", date(), Money::from_major(10));
        assert!(matches!(
            SessionService::add(&mut books, blank),
            Err(CoreError::Validation(_))
        ));
        let negative = Session::new("Ana", date(), Money::from_cents(-1));
        assert!(matches!(
            SessionService::add(&mut books, negative),
            Err(CoreError::Validation(_))
        ));
        assert!(books.sessions.is_empty());
    }

    #[test]
    fn edit_keeps_price_fixed() {
        let mut books = Books::new("Sessions");
        let id = SessionService::add(&mut books, Session::new("Ana", date(), Money::from_major(90)))
            .expect("add session");

        let mut changes = books.session(id).cloned().expect("session");
        changes.photographer = "Leo".into();
        SessionService::edit(&mut books, id, changes.clone()).expect("edit session");
        assert_eq!(books.session(id).unwrap().photographer, "Leo");

        changes.price = Money::from_major(120);
        let err = SessionService::edit(&mut books, id, changes).unwrap_err();
        assert!(matches!(err, CoreError::InvalidOperation(_)));
        assert_eq!(books.session(id).unwrap().price, Money::from_major(90));
    }

    #[test]
    fn remove_detaches_linked_expenses() {
        let mut books = Books::new("Sessions");
        let id = SessionService::add(&mut books, Session::new("Ana", date(), Money::from_major(90)))
            .expect("add session");
        let expense_id = books.add_expense(
            Expense::new(date(), ExpenseCategory::Props, Money::from_major(5)).for_session(id),
        );

        SessionService::remove(&mut books, id).expect("remove session");
        assert_eq!(books.expense(expense_id).unwrap().session_id, None);
        assert!(matches!(
            SessionService::remove(&mut books, id),
            Err(CoreError::SessionNotFound(_))
        ));
    }

    #[test]
    fn advance_reports_new_status() {
        let mut books = Books::new("Sessions");
        let id = books.add_session(Session::new("Ana", date(), Money::from_major(90)));
        assert_eq!(SessionService::advance(&mut books, id).unwrap(), SessionStatus::Done);
        SessionService::set_status(&mut books, id, SessionStatus::Pending).unwrap();
        assert_eq!(books.session(id).unwrap().status, SessionStatus::Pending);
    }
}
