//! Weekly payroll entries.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{common::*, money::Money};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeeklySalaryEntry {
    pub id: Uuid,
    pub worker_id: Uuid,
    /// Name at the time the entry was recorded; survives worker removal.
    pub worker_name: String,
    /// Both bounds are set, or both are `None` for an entry imported without a usable week.
    #[serde(default)]
    pub week_start: Option<NaiveDate>,
    #[serde(default)]
    pub week_end: Option<NaiveDate>,
    #[serde(default)]
    pub fixed_salary: Money,
    #[serde(default)]
    pub generated_amount: Money,
    #[serde(default)]
    pub paid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl WeeklySalaryEntry {
    pub fn new(
        worker_id: Uuid,
        worker_name: impl Into<String>,
        week_start: impl Into<Option<NaiveDate>>,
        week_end: impl Into<Option<NaiveDate>>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            worker_id,
            worker_name: worker_name.into(),
            week_start: week_start.into(),
            week_end: week_end.into(),
            fixed_salary: Money::ZERO,
            generated_amount: Money::ZERO,
            paid: false,
            paid_date: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_amounts(mut self, fixed_salary: Money, generated_amount: Money) -> Self {
        self.fixed_salary = fixed_salary;
        self.generated_amount = generated_amount;
        self
    }

    pub fn total(&self) -> Money {
        self.fixed_salary + self.generated_amount
    }

    pub fn week(&self) -> Option<DateWindow> {
        DateWindow::new(self.week_start?, self.week_end?).ok()
    }

    pub fn mark_paid(&mut self, date: NaiveDate) {
        self.paid = true;
        self.paid_date = Some(date);
    }

    pub fn mark_unpaid(&mut self) {
        self.paid = false;
        self.paid_date = None;
    }
}

impl Identifiable for WeeklySalaryEntry {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for WeeklySalaryEntry {
    fn display_label(&self) -> String {
        let state = if self.paid { "paid" } else { "pending" };
        format!(
            "{} {}..{} {} ({state})",
            self.worker_name,
            date_label(self.week_start),
            date_label(self.week_end),
            self.total()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paid_date_tracks_paid_flag() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 1, 12).unwrap();
        let mut entry = WeeklySalaryEntry::new(Uuid::new_v4(), "Marta", start, end)
            .with_amounts(Money::from_major(300), Money::from_cents(4_550));
        assert_eq!(entry.total(), Money::from_cents(34_550));

        entry.mark_paid(end);
        assert!(entry.paid);
        assert_eq!(entry.paid_date, Some(end));

        entry.mark_unpaid();
        assert!(!entry.paid);
        assert_eq!(entry.paid_date, None);
    }

    #[test]
    fn undated_entry_has_no_week() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        let mut entry = WeeklySalaryEntry::new(Uuid::new_v4(), "Marta", start, start);
        assert!(entry.week().is_some());

        entry.week_start = None;
        entry.week_end = None;
        assert!(entry.week().is_none());
        assert!(entry.display_label().contains("undated..undated"));
    }
}
