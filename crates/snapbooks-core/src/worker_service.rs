use snapbooks_domain::{Books, Worker};
use tracing::debug;
use uuid::Uuid;

use crate::{validate, CoreError, ServiceResult};

pub struct WorkerService;

impl WorkerService {
    pub fn add(books: &mut Books, worker: Worker) -> ServiceResult<Uuid> {
        Self::validate(books, None, &worker)?;
        debug!(name = %worker.name, "adding worker");
        Ok(books.add_worker(worker))
    }

    pub fn edit(books: &mut Books, id: Uuid, changes: Worker) -> ServiceResult<()> {
        Self::validate(books, Some(id), &changes)?;
        let worker = books.worker_mut(id).ok_or(CoreError::WorkerNotFound(id))?;
        worker.name = changes.name;
        worker.role = changes.role;
        worker.payment_type = changes.payment_type;
        worker.amount = changes.amount;
        books.touch();
        Ok(())
    }

    /// Removes the worker. Salary entries already recorded keep their name snapshot.
    pub fn remove(books: &mut Books, id: Uuid) -> ServiceResult<Worker> {
        books.remove_worker(id).ok_or(CoreError::WorkerNotFound(id))
    }

    pub fn list(books: &Books) -> Vec<&Worker> {
        books.workers.iter().collect()
    }

    pub fn find_by_name<'a>(books: &'a Books, name: &str) -> Option<&'a Worker> {
        let needle = name.trim();
        books
            .workers
            .iter()
            .find(|worker| worker.name.trim().eq_ignore_ascii_case(needle))
    }

    fn validate(books: &Books, exclude: Option<Uuid>, worker: &Worker) -> ServiceResult<()> {
        validate::require_name("worker name", &worker.name)?;
        validate::non_negative("rate", worker.amount)?;
        let normalized = worker.name.trim().to_ascii_lowercase();
        let duplicate = books.workers.iter().any(|existing| {
            existing.name.trim().to_ascii_lowercase() == normalized
                && exclude.map_or(true, |id| existing.id != id)
        });
        if duplicate {
            return Err(CoreError::Validation(format!(
                "worker `{}` already exists",
                worker.name.trim()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use snapbooks_domain::{Money, PaymentType, WeeklySalaryEntry};

    #[test]
    fn duplicate_names_are_rejected() {
        let mut books = Books::new("Staff");
        WorkerService::add(
            &mut books,
            Worker::new("Marta", PaymentType::PerSession, Money::from_major(20)),
        )
        .expect("add worker");
        let dup = Worker::new(" marta ", PaymentType::PerPhoto, Money::from_major(1));
        assert!(matches!(
            WorkerService::add(&mut books, dup),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn edit_may_keep_own_name() {
        let mut books = Books::new("Staff");
        let id = WorkerService::add(
            &mut books,
            Worker::new("Marta", PaymentType::PerSession, Money::from_major(20)),
        )
        .unwrap();
        let mut changes = books.worker(id).cloned().unwrap();
        changes.amount = Money::from_major(25);
        WorkerService::edit(&mut books, id, changes).expect("edit worker");
        assert_eq!(books.worker(id).unwrap().amount, Money::from_major(25));
    }

    #[test]
    fn removing_worker_keeps_salary_history() {
        let mut books = Books::new("Staff");
        let id = books.add_worker(Worker::new(
            "Marta",
            PaymentType::FixedWeekly,
            Money::from_major(300),
        ));
        let start = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 1, 12).unwrap();
        books.add_salary(WeeklySalaryEntry::new(id, "Marta", start, end));

        WorkerService::remove(&mut books, id).expect("remove worker");
        assert_eq!(books.salaries.len(), 1);
        assert_eq!(books.salaries[0].worker_name, "Marta");
        assert!(WorkerService::find_by_name(&books, "marta").is_none());
    }
}
