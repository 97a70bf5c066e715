//! The owned application state: every record collection of a studio.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    common::*, debt::Debt, expense::Expense, print::Print, salary::WeeklySalaryEntry,
    session::Session, worker::Worker,
};

pub const CURRENT_SCHEMA_VERSION: u8 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Books {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub sessions: Vec<Session>,
    #[serde(default)]
    pub prints: Vec<Print>,
    #[serde(default)]
    pub workers: Vec<Worker>,
    #[serde(default)]
    pub salaries: Vec<WeeklySalaryEntry>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
    #[serde(default)]
    pub debts: Vec<Debt>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "Books::schema_version_default")]
    pub schema_version: u8,
}

impl Books {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            sessions: Vec::new(),
            prints: Vec::new(),
            workers: Vec::new(),
            salaries: Vec::new(),
            expenses: Vec::new(),
            debts: Vec::new(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    pub fn add_session(&mut self, session: Session) -> Uuid {
        let id = session.id;
        self.sessions.push(session);
        self.touch();
        id
    }

    pub fn add_print(&mut self, print: Print) -> Uuid {
        let id = print.id;
        self.prints.push(print);
        self.touch();
        id
    }

    pub fn add_worker(&mut self, worker: Worker) -> Uuid {
        let id = worker.id;
        self.workers.push(worker);
        self.touch();
        id
    }

    pub fn add_salary(&mut self, entry: WeeklySalaryEntry) -> Uuid {
        let id = entry.id;
        self.salaries.push(entry);
        self.touch();
        id
    }

    pub fn add_expense(&mut self, expense: Expense) -> Uuid {
        let id = expense.id;
        self.expenses.push(expense);
        self.touch();
        id
    }

    pub fn add_debt(&mut self, debt: Debt) -> Uuid {
        let id = debt.id;
        self.debts.push(debt);
        self.touch();
        id
    }

    pub fn session(&self, id: Uuid) -> Option<&Session> {
        find_by_id(&self.sessions, id)
    }

    pub fn session_mut(&mut self, id: Uuid) -> Option<&mut Session> {
        find_by_id_mut(&mut self.sessions, id)
    }

    pub fn print(&self, id: Uuid) -> Option<&Print> {
        find_by_id(&self.prints, id)
    }

    pub fn print_mut(&mut self, id: Uuid) -> Option<&mut Print> {
        find_by_id_mut(&mut self.prints, id)
    }

    pub fn worker(&self, id: Uuid) -> Option<&Worker> {
        find_by_id(&self.workers, id)
    }

    pub fn worker_mut(&mut self, id: Uuid) -> Option<&mut Worker> {
        find_by_id_mut(&mut self.workers, id)
    }

    pub fn salary(&self, id: Uuid) -> Option<&WeeklySalaryEntry> {
        find_by_id(&self.salaries, id)
    }

    pub fn salary_mut(&mut self, id: Uuid) -> Option<&mut WeeklySalaryEntry> {
        find_by_id_mut(&mut self.salaries, id)
    }

    pub fn expense(&self, id: Uuid) -> Option<&Expense> {
        find_by_id(&self.expenses, id)
    }

    pub fn expense_mut(&mut self, id: Uuid) -> Option<&mut Expense> {
        find_by_id_mut(&mut self.expenses, id)
    }

    pub fn debt(&self, id: Uuid) -> Option<&Debt> {
        find_by_id(&self.debts, id)
    }

    pub fn debt_mut(&mut self, id: Uuid) -> Option<&mut Debt> {
        find_by_id_mut(&mut self.debts, id)
    }

    pub fn remove_session(&mut self, id: Uuid) -> Option<Session> {
        let removed = take_by_id(&mut self.sessions, id)?;
        self.touch();
        Some(removed)
    }

    pub fn remove_print(&mut self, id: Uuid) -> Option<Print> {
        let removed = take_by_id(&mut self.prints, id)?;
        self.touch();
        Some(removed)
    }

    pub fn remove_worker(&mut self, id: Uuid) -> Option<Worker> {
        let removed = take_by_id(&mut self.workers, id)?;
        self.touch();
        Some(removed)
    }

    pub fn remove_salary(&mut self, id: Uuid) -> Option<WeeklySalaryEntry> {
        let removed = take_by_id(&mut self.salaries, id)?;
        self.touch();
        Some(removed)
    }

    pub fn remove_expense(&mut self, id: Uuid) -> Option<Expense> {
        let removed = take_by_id(&mut self.expenses, id)?;
        self.touch();
        Some(removed)
    }

    pub fn remove_debt(&mut self, id: Uuid) -> Option<Debt> {
        let removed = take_by_id(&mut self.debts, id)?;
        self.touch();
        Some(removed)
    }

    pub fn record_count(&self) -> usize {
        self.sessions.len()
            + self.prints.len()
            + self.workers.len()
            + self.salaries.len()
            + self.expenses.len()
            + self.debts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.record_count() == 0
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }
}

impl Default for Books {
    fn default() -> Self {
        Self::new("studio")
    }
}

fn take_by_id<T: Identifiable>(items: &mut Vec<T>, id: Uuid) -> Option<T> {
    let index = items.iter().position(|item| item.id() == id)?;
    Some(items.remove(index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{money::Money, session::Session};
    use chrono::NaiveDate;

    #[test]
    fn add_and_remove_touch_books() {
        let mut books = Books::new("Studio");
        let before = books.updated_at;
        let date = NaiveDate::from_ymd_opt(2025, 2, 3).unwrap();
        let id = books.add_session(Session::new("Ana", date, Money::from_major(80)));
        assert!(books.updated_at >= before);
        assert_eq!(books.session(id).map(|s| s.client_name.as_str()), Some("Ana"));
        assert_eq!(books.record_count(), 1);

        let removed = books.remove_session(id).expect("session removed");
        assert_eq!(removed.id, id);
        assert!(books.is_empty());
        assert!(books.remove_session(id).is_none());
    }

    #[test]
    fn missing_collections_deserialize_as_empty() {
        let json = r#"{
            "id": "6f1c3e64-4c8b-4f5e-9d0a-6f5b2e9f0a11",
            "name": "Legacy",
            "created_at": "2025-01-01T00:00:00Z",
            "updated_at": "2025-01-01T00:00:00Z"
        }"#;
        let books: Books = serde_json::from_str(json).expect("parse books");
        assert!(books.is_empty());
        assert_eq!(books.schema_version, CURRENT_SCHEMA_VERSION);
    }
}
