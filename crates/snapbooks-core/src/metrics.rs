//! Derived business metrics.
//!
//! Revenue is recognised on delivery: a session counts once it reaches
//! [`SessionStatus::Delivered`], a print once it is handed over. Cash that has
//! been collected but not yet earned shows up in `total_received` and, for
//! prints, in `print_reserve`.
//!
//! Every figure is recomputed from the books on each call; nothing is cached.

use chrono::NaiveDate;
use serde::Serialize;
use snapbooks_domain::{Books, DateWindow, Money, Period, Print};

use crate::time::Clock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Metrics {
    pub total_received: Money,
    pub total_expenses: Money,
    pub total_salaries: Money,
    pub print_reserve: Money,
    /// Accrual view: delivered revenue minus expenses, paid salaries and delivered print costs.
    pub real_profit: Money,
    /// Cash view: everything collected minus expenses, paid salaries and all print costs.
    pub expected_bank_balance: Money,
    pub weekly_profit: Money,
    pub monthly_profit: Money,
    pub delivered_revenue: Money,
}

/// Delivered activity inside one window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PeriodTotals {
    pub session_revenue: Money,
    pub print_revenue: Money,
    pub expenses: Money,
    pub salaries: Money,
    pub print_costs: Money,
    pub profit: Money,
}

impl PeriodTotals {
    pub fn revenue(&self) -> Money {
        self.session_revenue + self.print_revenue
    }
}

/// Aggregates the books into [`Metrics`] as seen on `reference`.
pub fn calculate_metrics(books: &Books, reference: NaiveDate) -> Metrics {
    let delivered_sessions: Money = books
        .sessions
        .iter()
        .filter(|session| session.is_delivered())
        .map(|session| session.price)
        .sum();
    let delivered_prints: Money = books
        .prints
        .iter()
        .filter(|print| print.is_delivered())
        .map(|print| print.amount_charged)
        .sum();
    let delivered_revenue = delivered_sessions + delivered_prints;

    let session_receipts: Money = books.sessions.iter().map(|session| session.price).sum();
    let print_receipts: Money = books.prints.iter().map(|print| print.amount_charged).sum();
    let total_received = session_receipts + print_receipts;

    let print_reserve: Money = books
        .prints
        .iter()
        .filter(|print| !print.is_delivered())
        .map(Print::margin)
        .sum();

    let total_expenses: Money = books.expenses.iter().map(|expense| expense.amount).sum();
    let total_salaries: Money = books
        .salaries
        .iter()
        .filter(|entry| entry.paid)
        .map(|entry| entry.total())
        .sum();

    let delivered_print_costs: Money = books
        .prints
        .iter()
        .filter(|print| print.is_delivered())
        .map(|print| print.actual_cost)
        .sum();
    let all_print_costs: Money = books.prints.iter().map(|print| print.actual_cost).sum();

    let real_profit = delivered_revenue - total_expenses - total_salaries - delivered_print_costs;
    let expected_bank_balance = total_received - total_expenses - total_salaries - all_print_costs;

    let weekly_profit = period_totals(books, Period::Week.window_containing(reference)).profit;
    let monthly_profit = period_totals(books, Period::Month.window_containing(reference)).profit;

    Metrics {
        total_received,
        total_expenses,
        total_salaries,
        print_reserve,
        real_profit,
        expected_bank_balance,
        weekly_profit,
        monthly_profit,
        delivered_revenue,
    }
}

/// Delivered activity dated inside `window`.
///
/// Sessions are placed by their session date, prints by their delivery date
/// (prints without one never match), expenses by date, and paid salary entries
/// by the start of the week they cover. Undated records fall in no window.
pub fn period_totals(books: &Books, window: DateWindow) -> PeriodTotals {
    let session_revenue: Money = books
        .sessions
        .iter()
        .filter(|session| session.is_delivered() && window.contains_opt(session.date))
        .map(|session| session.price)
        .sum();

    let delivered_prints = || {
        books
            .prints
            .iter()
            .filter(|print| print.is_delivered() && window.contains_opt(print.delivery_date))
    };
    let print_revenue: Money = delivered_prints().map(|print| print.amount_charged).sum();
    let print_costs: Money = delivered_prints().map(|print| print.actual_cost).sum();

    let expenses: Money = books
        .expenses
        .iter()
        .filter(|expense| window.contains_opt(expense.date))
        .map(|expense| expense.amount)
        .sum();
    let salaries: Money = books
        .salaries
        .iter()
        .filter(|entry| entry.paid && window.contains_opt(entry.week_start))
        .map(|entry| entry.total())
        .sum();

    let profit = session_revenue + print_revenue - expenses - salaries - print_costs;
    PeriodTotals {
        session_revenue,
        print_revenue,
        expenses,
        salaries,
        print_costs,
        profit,
    }
}

pub struct MetricsEngine;

impl MetricsEngine {
    /// Metrics as of the clock's current date.
    pub fn current(books: &Books, clock: &dyn Clock) -> Metrics {
        calculate_metrics(books, clock.today())
    }

    pub fn at(books: &Books, reference: NaiveDate) -> Metrics {
        calculate_metrics(books, reference)
    }

    pub fn period(books: &Books, period: Period, reference: NaiveDate) -> PeriodTotals {
        period_totals(books, period.window_containing(reference))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::FixedClock;
    use snapbooks_domain::{Session, SessionStatus};

    #[test]
    fn current_uses_clock_date() {
        let today = NaiveDate::from_ymd_opt(2025, 5, 14).unwrap();
        let mut books = Books::new("Clock");
        books.add_session(
            Session::new("Ana", today, Money::from_major(100)).with_status(SessionStatus::Delivered),
        );

        let metrics = MetricsEngine::current(&books, &FixedClock(today));
        assert_eq!(metrics.weekly_profit, Money::from_major(100));

        let later = MetricsEngine::current(&books, &FixedClock(today + chrono::Duration::days(30)));
        assert_eq!(later.weekly_profit, Money::ZERO);
        assert_eq!(later.real_profit, Money::from_major(100));
    }

    #[test]
    fn period_totals_split_revenue_and_costs() {
        let day = NaiveDate::from_ymd_opt(2025, 5, 14).unwrap();
        let mut books = Books::new("Split");
        let mut print = Print::new("Eva", day, Money::from_major(60), Money::from_major(20));
        print.mark_delivered(day);
        books.add_print(print);

        let totals = MetricsEngine::period(&books, Period::Month, day);
        assert_eq!(totals.print_revenue, Money::from_major(60));
        assert_eq!(totals.print_costs, Money::from_major(20));
        assert_eq!(totals.revenue(), Money::from_major(60));
        assert_eq!(totals.profit, Money::from_major(40));
    }
}
