//! Weekly salary entries and drafting them from recorded sessions.

use std::collections::HashSet;

use chrono::NaiveDate;
use snapbooks_domain::{Books, DateWindow, Money, PaymentType, WeeklySalaryEntry};
use tracing::debug;
use uuid::Uuid;

use crate::{validate, CoreError, ServiceResult};

pub struct PayrollService;

impl PayrollService {
    /// Records `entry`. Unpaid entries lose any stray paid date; paid ones must carry one.
    pub fn add(books: &mut Books, mut entry: WeeklySalaryEntry) -> ServiceResult<Uuid> {
        Self::validate(&entry)?;
        validate::worker_exists(books, entry.worker_id)?;
        validate::paid_state(entry.paid, entry.paid_date)?;
        if !entry.paid {
            entry.paid_date = None;
        }
        debug!(worker = %entry.worker_name, week = ?entry.week_start, "adding salary entry");
        Ok(books.add_salary(entry))
    }

    /// Builds an unpaid entry for `worker_id` covering `week`.
    ///
    /// Fixed-weekly workers get their rate as the fixed salary. Everyone else
    /// earns rate × units over the sessions they photographed that week, where
    /// a unit is a session, a photo, or a distinct client depending on how the
    /// worker is paid.
    pub fn draft_entry(
        books: &Books,
        worker_id: Uuid,
        week: DateWindow,
    ) -> ServiceResult<WeeklySalaryEntry> {
        let worker = books
            .worker(worker_id)
            .ok_or(CoreError::WorkerNotFound(worker_id))?;
        let sessions = books.sessions.iter().filter(|session| {
            week.contains_opt(session.date)
                && session.photographer.trim().eq_ignore_ascii_case(worker.name.trim())
        });

        let (fixed_salary, generated_amount) = match worker.payment_type {
            PaymentType::FixedWeekly => (worker.amount, Money::ZERO),
            PaymentType::PerSession => (Money::ZERO, worker.amount * sessions.count() as i64),
            PaymentType::PerPhoto => {
                let photos: i64 = sessions.map(|session| i64::from(session.photo_count)).sum();
                (Money::ZERO, worker.amount * photos)
            }
            PaymentType::PerClient => {
                let clients: HashSet<String> = sessions
                    .map(|session| session.client_name.trim().to_lowercase())
                    .collect();
                (Money::ZERO, worker.amount * clients.len() as i64)
            }
        };

        Ok(
            WeeklySalaryEntry::new(worker.id, worker.name.clone(), week.start, week.end)
                .with_amounts(fixed_salary, generated_amount),
        )
    }

    /// Updates worker, week and amounts. The worker must exist only when it changes,
    /// so entries of removed workers stay editable.
    pub fn edit(books: &mut Books, id: Uuid, changes: WeeklySalaryEntry) -> ServiceResult<()> {
        Self::validate(&changes)?;
        let current = books.salary(id).ok_or(CoreError::SalaryNotFound(id))?;
        if current.worker_id != changes.worker_id {
            validate::worker_exists(books, changes.worker_id)?;
        }
        let entry = books.salary_mut(id).ok_or(CoreError::SalaryNotFound(id))?;
        entry.worker_id = changes.worker_id;
        entry.worker_name = changes.worker_name;
        entry.week_start = changes.week_start;
        entry.week_end = changes.week_end;
        entry.fixed_salary = changes.fixed_salary;
        entry.generated_amount = changes.generated_amount;
        books.touch();
        Ok(())
    }

    pub fn mark_paid(books: &mut Books, id: Uuid, date: NaiveDate) -> ServiceResult<()> {
        let entry = books.salary_mut(id).ok_or(CoreError::SalaryNotFound(id))?;
        entry.mark_paid(date);
        books.touch();
        Ok(())
    }

    pub fn mark_unpaid(books: &mut Books, id: Uuid) -> ServiceResult<()> {
        let entry = books.salary_mut(id).ok_or(CoreError::SalaryNotFound(id))?;
        entry.mark_unpaid();
        books.touch();
        Ok(())
    }

    pub fn remove(books: &mut Books, id: Uuid) -> ServiceResult<WeeklySalaryEntry> {
        books.remove_salary(id).ok_or(CoreError::SalaryNotFound(id))
    }

    pub fn list(books: &Books) -> Vec<&WeeklySalaryEntry> {
        books.salaries.iter().collect()
    }

    fn validate(entry: &WeeklySalaryEntry) -> ServiceResult<()> {
        validate::require_name("worker name", &entry.worker_name)?;
        validate::week_range(entry.week_start, entry.week_end)?;
        validate::non_negative("fixed salary", entry.fixed_salary)?;
        validate::non_negative("generated amount", entry.generated_amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapbooks_domain::{Session, Worker};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    fn week() -> DateWindow {
        DateWindow::week_containing(day(8))
    }

    fn books_with_sessions() -> Books {
        let mut books = Books::new("Payroll");
        books.add_session(
            Session::new("Ana", day(6), Money::from_major(100))
                .with_photographer("Leo")
                .with_photo_count(20),
        );
        books.add_session(
            Session::new("ana", day(9), Money::from_major(80))
                .with_photographer("leo")
                .with_photo_count(5),
        );
        books.add_session(
            Session::new("Bruno", day(12), Money::from_major(80))
                .with_photographer("Leo")
                .with_photo_count(10),
        );
        // Outside the week.
        books.add_session(
            Session::new("Carla", day(13), Money::from_major(80))
                .with_photographer("Leo")
                .with_photo_count(50),
        );
        books.add_session(
            Session::new("Dani", day(7), Money::from_major(80))
                .with_photographer("Marta")
                .with_photo_count(7),
        );
        books
    }

    fn draft(payment_type: PaymentType, rate: Money) -> WeeklySalaryEntry {
        let mut books = books_with_sessions();
        let id = books.add_worker(Worker::new("Leo", payment_type, rate));
        PayrollService::draft_entry(&books, id, week()).expect("draft entry")
    }

    #[test]
    fn fixed_weekly_uses_rate_as_fixed_salary() {
        let entry = draft(PaymentType::FixedWeekly, Money::from_major(300));
        assert_eq!(entry.fixed_salary, Money::from_major(300));
        assert_eq!(entry.generated_amount, Money::ZERO);
        assert_eq!(entry.week_start, Some(day(6)));
        assert_eq!(entry.week_end, Some(day(12)));
        assert!(!entry.paid);
    }

    #[test]
    fn per_session_counts_sessions_in_week() {
        let entry = draft(PaymentType::PerSession, Money::from_major(15));
        assert_eq!(entry.generated_amount, Money::from_major(45));
    }

    #[test]
    fn per_photo_sums_photo_counts() {
        let entry = draft(PaymentType::PerPhoto, Money::from_cents(150));
        assert_eq!(entry.generated_amount, Money::from_cents(150 * 35));
    }

    #[test]
    fn per_client_counts_distinct_clients() {
        let entry = draft(PaymentType::PerClient, Money::from_major(10));
        assert_eq!(entry.generated_amount, Money::from_major(20));
    }

    #[test]
    fn add_rejects_unknown_worker_and_inverted_week() {
        let mut books = Books::new("Payroll");
        let orphan = WeeklySalaryEntry::new(Uuid::new_v4(), "Ghost", day(6), day(12));
        assert!(matches!(
            PayrollService::add(&mut books, orphan),
            Err(CoreError::WorkerNotFound(_))
        ));

        let id = books.add_worker(Worker::new("Leo", PaymentType::FixedWeekly, Money::ZERO));
        let inverted = WeeklySalaryEntry::new(id, "Leo", day(12), day(6));
        assert!(matches!(
            PayrollService::add(&mut books, inverted),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn pay_and_unpay_toggle_paid_date() {
        let mut books = Books::new("Payroll");
        let worker = books.add_worker(Worker::new("Leo", PaymentType::FixedWeekly, Money::ZERO));
        let id = PayrollService::add(
            &mut books,
            WeeklySalaryEntry::new(worker, "Leo", day(6), day(12)),
        )
        .unwrap();
        PayrollService::mark_paid(&mut books, id, day(13)).unwrap();
        assert_eq!(books.salary(id).unwrap().paid_date, Some(day(13)));
        PayrollService::mark_unpaid(&mut books, id).unwrap();
        assert_eq!(books.salary(id).unwrap().paid_date, None);
        assert!(!books.salary(id).unwrap().paid);
    }

    #[test]
    fn add_requires_a_date_on_paid_entries() {
        let mut books = Books::new("Payroll");
        let worker = books.add_worker(Worker::new("Leo", PaymentType::FixedWeekly, Money::ZERO));

        let mut undated = WeeklySalaryEntry::new(worker, "Leo", day(6), day(12));
        undated.paid = true;
        assert!(matches!(
            PayrollService::add(&mut books, undated),
            Err(CoreError::Validation(_))
        ));
        assert!(books.salaries.is_empty());

        let mut stray = WeeklySalaryEntry::new(worker, "Leo", day(6), day(12));
        stray.paid_date = Some(day(13));
        let id = PayrollService::add(&mut books, stray).unwrap();
        assert_eq!(books.salary(id).unwrap().paid_date, None);
    }

    #[test]
    fn entries_of_a_removed_worker_stay_editable() {
        let mut books = Books::new("Payroll");
        let worker = books.add_worker(Worker::new("Leo", PaymentType::FixedWeekly, Money::ZERO));
        let id = PayrollService::add(
            &mut books,
            WeeklySalaryEntry::new(worker, "Leo", day(6), day(12)),
        )
        .unwrap();
        books.remove_worker(worker).expect("worker removed");

        let mut changes = books.salary(id).unwrap().clone();
        changes.fixed_salary = Money::from_major(250);
        PayrollService::edit(&mut books, id, changes).expect("edit keeps orphaned worker");
        assert_eq!(books.salary(id).unwrap().fixed_salary, Money::from_major(250));
        assert_eq!(books.salary(id).unwrap().worker_name, "Leo");

        let mut moved = books.salary(id).unwrap().clone();
        moved.worker_id = Uuid::new_v4();
        assert!(matches!(
            PayrollService::edit(&mut books, id, moved),
            Err(CoreError::WorkerNotFound(_))
        ));
    }
}
