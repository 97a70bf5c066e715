use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use snapbooks_domain::Books;

use crate::CoreError;

/// Describes a persisted backup artifact for a set of books.
#[derive(Debug, Clone)]
pub struct BackupInfo {
    pub books: String,
    pub id: String,
    pub created_at: String,
    pub path: PathBuf,
}

/// Abstraction over persistence backends capable of storing books and backups.
pub trait BooksStorage: Send + Sync {
    fn save_books(&self, name: &str, books: &Books) -> Result<(), CoreError>;
    fn load_books(&self, name: &str) -> Result<Books, CoreError>;
    fn list_books(&self) -> Result<Vec<String>, CoreError>;
    fn delete_books(&self, name: &str) -> Result<(), CoreError>;
    fn save_books_to_path(&self, books: &Books, path: &Path) -> Result<(), CoreError>;
    fn load_books_from_path(&self, path: &Path) -> Result<Books, CoreError>;
    fn backup_books(
        &self,
        name: &str,
        books: &Books,
        note: Option<&str>,
    ) -> Result<BackupInfo, CoreError>;
    fn list_backups(&self, name: &str) -> Result<Vec<BackupInfo>, CoreError>;
    fn restore_backup(&self, backup: &BackupInfo) -> Result<Books, CoreError>;
}

/// Detects dangling references and other anomalies within a books snapshot.
pub fn books_warnings(books: &Books) -> Vec<String> {
    let session_ids: HashSet<_> = books.sessions.iter().map(|s| s.id).collect();
    let worker_ids: HashSet<_> = books.workers.iter().map(|w| w.id).collect();
    let mut warnings = Vec::new();

    for session in books.sessions.iter().filter(|session| session.date.is_none()) {
        warnings.push(format!(
            "session {} for {} has no date; it is left out of weekly and monthly figures",
            session.id, session.client_name
        ));
    }
    for print in &books.prints {
        if print.actual_cost > print.amount_charged {
            warnings.push(format!(
                "print {} for {} costs {} but was charged {}",
                print.id, print.client_name, print.actual_cost, print.amount_charged
            ));
        }
    }
    for expense in &books.expenses {
        if expense.date.is_none() {
            warnings.push(format!(
                "expense {} has no date; it is left out of weekly and monthly figures",
                expense.id
            ));
        }
        if let Some(session) = expense.session_id {
            if !session_ids.contains(&session) {
                warnings.push(format!(
                    "expense {} references unknown session {}",
                    expense.id, session
                ));
            }
        }
    }
    for entry in &books.salaries {
        if !worker_ids.contains(&entry.worker_id) {
            warnings.push(format!(
                "salary entry {} references unknown worker {} ({})",
                entry.id, entry.worker_id, entry.worker_name
            ));
        }
        if entry.paid && entry.paid_date.is_none() {
            warnings.push(format!("salary entry {} is paid but has no paid date", entry.id));
        }
        if entry.week_start.is_none() {
            warnings.push(format!(
                "salary entry {} has no week; it is left out of weekly and monthly figures",
                entry.id
            ));
        }
    }
    for debt in &books.debts {
        if debt.paid && debt.paid_date.is_none() {
            warnings.push(format!("debt {} is settled but has no paid date", debt.id));
        }
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use snapbooks_domain::{Expense, ExpenseCategory, Money, Print, Session, WeeklySalaryEntry};
    use uuid::Uuid;

    #[test]
    fn clean_books_have_no_warnings() {
        assert!(books_warnings(&Books::new("Clean")).is_empty());
    }

    #[test]
    fn reports_dangling_links_and_loss_making_prints() {
        let day = NaiveDate::from_ymd_opt(2025, 4, 7).unwrap();
        let mut books = Books::new("Warnings");
        books.add_print(Print::new("Eva", day, Money::from_major(10), Money::from_major(12)));
        books.add_expense(
            Expense::new(day, ExpenseCategory::Other, Money::from_major(1)).for_session(Uuid::new_v4()),
        );
        let mut entry = WeeklySalaryEntry::new(Uuid::new_v4(), "Ghost", day, day);
        entry.paid = true;
        books.add_salary(entry);

        let warnings = books_warnings(&books);
        assert_eq!(warnings.len(), 4);
        assert!(warnings[0].contains("costs $12.00 but was charged $10.00"));
        assert!(warnings.iter().any(|w| w.contains("unknown session")));
        assert!(warnings.iter().any(|w| w.contains("unknown worker")));
        assert!(warnings.iter().any(|w| w.contains("no paid date")));
    }

    #[test]
    fn undated_records_are_flagged() {
        let day = NaiveDate::from_ymd_opt(2025, 4, 7).unwrap();
        let mut books = Books::new("Undated");
        let mut session = Session::new("Ana", day, Money::from_major(90));
        session.date = None;
        books.add_session(session);
        let mut expense = Expense::new(day, ExpenseCategory::Fuel, Money::from_major(5));
        expense.date = None;
        books.add_expense(expense);

        let warnings = books_warnings(&books);
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().all(|w| w.contains("left out of weekly and monthly figures")));
    }
}
