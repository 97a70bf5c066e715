//! Read-only views over the books used by reports and the dashboard.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use snapbooks_domain::{Books, DateWindow, Expense, ExpenseCategory, Money, Session};

use crate::metrics::calculate_metrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeekProfit {
    pub window: DateWindow,
    pub profit: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhotographerPerformance {
    pub photographer: String,
    pub sessions: usize,
    pub delivered: usize,
    pub revenue: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RevenueBreakdown {
    pub delivered_sessions: Money,
    pub delivered_prints: Money,
    pub delivered_print_costs: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DebtSummary {
    pub outstanding: Money,
    pub outstanding_count: usize,
    pub settled: Money,
    pub settled_count: usize,
    pub total: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PayrollSummary {
    pub pending: Money,
    pub pending_count: usize,
    pub paid: Money,
    pub paid_count: usize,
    pub total: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DashboardCounts {
    pub delivered_sessions: usize,
    pub undelivered_prints: usize,
    pub open_debts: usize,
}

pub struct ReportService;

impl ReportService {
    /// Profit of every Monday-start week that touches the month of `reference`.
    ///
    /// Each entry is the weekly profit as seen from that week's Monday, so the
    /// first and last weeks may include days from neighbouring months.
    pub fn weekly_breakdown(books: &Books, reference: NaiveDate) -> Vec<WeekProfit> {
        DateWindow::month_containing(reference)
            .overlapping_weeks()
            .into_iter()
            .map(|window| WeekProfit {
                window,
                profit: calculate_metrics(books, window.start).weekly_profit,
            })
            .collect()
    }

    /// Session counts and delivered revenue per photographer, in first-seen order.
    pub fn photographer_performance(books: &Books) -> Vec<PhotographerPerformance> {
        let mut rows: Vec<PhotographerPerformance> = Vec::new();
        for session in &books.sessions {
            let index = match rows
                .iter()
                .position(|row| row.photographer == session.photographer)
            {
                Some(index) => index,
                None => {
                    rows.push(PhotographerPerformance {
                        photographer: session.photographer.clone(),
                        sessions: 0,
                        delivered: 0,
                        revenue: Money::ZERO,
                    });
                    rows.len() - 1
                }
            };
            let row = &mut rows[index];
            row.sessions += 1;
            if session.is_delivered() {
                row.delivered += 1;
                row.revenue += session.price;
            }
        }
        rows
    }

    /// Sessions of any status dated inside `window`.
    pub fn sessions_in_window(books: &Books, window: DateWindow) -> usize {
        books
            .sessions
            .iter()
            .filter(|session| window.contains_opt(session.date))
            .count()
    }

    pub fn revenue_breakdown(books: &Books) -> RevenueBreakdown {
        let delivered_sessions = books
            .sessions
            .iter()
            .filter(|session| session.is_delivered())
            .map(|session| session.price)
            .sum();
        let mut breakdown = RevenueBreakdown {
            delivered_sessions,
            ..RevenueBreakdown::default()
        };
        for print in books.prints.iter().filter(|print| print.is_delivered()) {
            breakdown.delivered_prints += print.amount_charged;
            breakdown.delivered_print_costs += print.actual_cost;
        }
        breakdown
    }

    pub fn debt_summary(books: &Books) -> DebtSummary {
        let mut summary = DebtSummary::default();
        for debt in &books.debts {
            if debt.paid {
                summary.settled += debt.amount;
                summary.settled_count += 1;
            } else {
                summary.outstanding += debt.amount;
                summary.outstanding_count += 1;
            }
            summary.total += debt.amount;
        }
        summary
    }

    pub fn payroll_summary(books: &Books) -> PayrollSummary {
        let mut summary = PayrollSummary::default();
        for entry in &books.salaries {
            let amount = entry.total();
            if entry.paid {
                summary.paid += amount;
                summary.paid_count += 1;
            } else {
                summary.pending += amount;
                summary.pending_count += 1;
            }
            summary.total += amount;
        }
        summary
    }

    /// Spending per category; categories without expenses are omitted.
    pub fn expense_totals_by_category(books: &Books) -> BTreeMap<ExpenseCategory, Money> {
        let mut totals = BTreeMap::new();
        for expense in &books.expenses {
            *totals.entry(expense.category).or_insert(Money::ZERO) += expense.amount;
        }
        totals
    }

    pub fn expenses_in_category(books: &Books, category: ExpenseCategory) -> Vec<&Expense> {
        books
            .expenses
            .iter()
            .filter(|expense| expense.category == category)
            .collect()
    }

    pub fn dashboard_counts(books: &Books) -> DashboardCounts {
        DashboardCounts {
            delivered_sessions: books.sessions.iter().filter(|s| s.is_delivered()).count(),
            undelivered_prints: books.prints.iter().filter(|p| !p.is_delivered()).count(),
            open_debts: books.debts.iter().filter(|d| !d.paid).count(),
        }
    }

    /// Case-insensitive substring match on client name or photographer.
    /// A blank term matches every session.
    pub fn session_search<'a>(books: &'a Books, term: &str) -> Vec<&'a Session> {
        let needle = term.trim().to_lowercase();
        books
            .sessions
            .iter()
            .filter(|session| {
                needle.is_empty()
                    || session.client_name.to_lowercase().contains(&needle)
                    || session.photographer.to_lowercase().contains(&needle)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapbooks_domain::{Debt, Print, SessionStatus, WeeklySalaryEntry};
    use uuid::Uuid;

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn delivered(client: &str, photographer: &str, date: NaiveDate, price: i64) -> Session {
        Session::new(client, date, Money::from_major(price))
            .with_photographer(photographer)
            .with_status(SessionStatus::Delivered)
    }

    #[test]
    fn weekly_breakdown_covers_partial_weeks() {
        let mut books = Books::new("Report");
        // Belongs to the week of Feb 24, which overlaps March.
        books.add_session(delivered("Ana", "Leo", day(2, 26), 100));
        books.add_session(delivered("Bea", "Leo", day(3, 31), 70));

        let weeks = ReportService::weekly_breakdown(&books, day(3, 15));
        assert_eq!(weeks.len(), 6);
        assert_eq!(weeks[0].window.start, day(2, 24));
        assert_eq!(weeks[0].profit, Money::from_major(100));
        assert_eq!(weeks[5].profit, Money::from_major(70));
        assert!(weeks[1..5].iter().all(|week| week.profit == Money::ZERO));
    }

    #[test]
    fn photographer_performance_keeps_first_seen_order() {
        let mut books = Books::new("Report");
        books.add_session(Session::new("Ana", day(1, 2), Money::from_major(50)).with_photographer("Zoe"));
        books.add_session(delivered("Bea", "Leo", day(1, 3), 80));
        books.add_session(delivered("Cris", "Zoe", day(1, 4), 60));

        let rows = ReportService::photographer_performance(&books);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].photographer, "Zoe");
        assert_eq!(rows[0].sessions, 2);
        assert_eq!(rows[0].delivered, 1);
        assert_eq!(rows[0].revenue, Money::from_major(60));
        assert_eq!(rows[1].photographer, "Leo");
    }

    #[test]
    fn summaries_split_paid_and_open() {
        let mut books = Books::new("Report");
        let mut settled = Debt::new("Rosa", Money::from_major(20), day(1, 1));
        settled.mark_paid(day(1, 5));
        books.add_debt(settled);
        books.add_debt(Debt::new("Tom", Money::from_major(35), day(1, 2)));

        let mut paid = WeeklySalaryEntry::new(Uuid::new_v4(), "Leo", day(1, 6), day(1, 12))
            .with_amounts(Money::from_major(100), Money::from_major(15));
        paid.mark_paid(day(1, 12));
        books.add_salary(paid);
        books.add_salary(
            WeeklySalaryEntry::new(Uuid::new_v4(), "Leo", day(1, 13), day(1, 19))
                .with_amounts(Money::from_major(100), Money::ZERO),
        );

        let debts = ReportService::debt_summary(&books);
        assert_eq!(debts.outstanding, Money::from_major(35));
        assert_eq!(debts.settled_count, 1);
        assert_eq!(debts.total, Money::from_major(55));

        let payroll = ReportService::payroll_summary(&books);
        assert_eq!(payroll.paid, Money::from_major(115));
        assert_eq!(payroll.pending, Money::from_major(100));
        assert_eq!(payroll.total, Money::from_major(215));
    }

    #[test]
    fn dashboard_counts_and_search() {
        let mut books = Books::new("Report");
        books.add_session(delivered("Ana Ruiz", "Leo", day(1, 3), 80));
        books.add_session(Session::new("Bea", day(1, 4), Money::from_major(80)).with_photographer("Leonor"));
        books.add_print(Print::new("Ana Ruiz", day(1, 3), Money::from_major(30), Money::from_major(10)));
        books.add_debt(Debt::new("Tom", Money::from_major(5), day(1, 2)));

        let counts = ReportService::dashboard_counts(&books);
        assert_eq!(counts.delivered_sessions, 1);
        assert_eq!(counts.undelivered_prints, 1);
        assert_eq!(counts.open_debts, 1);

        assert_eq!(ReportService::session_search(&books, "ruiz").len(), 1);
        assert_eq!(ReportService::session_search(&books, "LEO").len(), 2);
        assert_eq!(ReportService::session_search(&books, "").len(), 2);
        assert_eq!(
            ReportService::sessions_in_window(&books, DateWindow::week_containing(day(1, 3))),
            2
        );
    }

    #[test]
    fn expense_totals_omit_empty_categories() {
        let mut books = Books::new("Report");
        books.add_expense(Expense::new(day(1, 1), ExpenseCategory::Fuel, Money::from_major(10)));
        books.add_expense(Expense::new(day(1, 2), ExpenseCategory::Fuel, Money::from_cents(550)));
        books.add_expense(Expense::new(day(1, 3), ExpenseCategory::Props, Money::from_major(3)));

        let totals = ReportService::expense_totals_by_category(&books);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[&ExpenseCategory::Fuel], Money::from_cents(1_550));
        assert!(!totals.contains_key(&ExpenseCategory::Makeup));
        assert_eq!(
            ReportService::expenses_in_category(&books, ExpenseCategory::Props).len(),
            1
        );
    }
}
