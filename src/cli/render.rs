//! Text renderings of metrics and period totals shared by the `metrics` and
//! `report` commands.

use snapbooks_core::{format::CurrencyFormatter, DashboardCounts, Metrics, PeriodTotals};

const LABEL_WIDTH: usize = 22;

fn row(label: &str, value: String) -> String {
    format!("{label:<width$}{value:>14}", width = LABEL_WIDTH)
}

/// One line per metric, in dashboard order.
pub fn metrics_lines(metrics: &Metrics, currency: &dyn CurrencyFormatter) -> Vec<String> {
    [
        ("Total received", metrics.total_received),
        ("Delivered revenue", metrics.delivered_revenue),
        ("Total expenses", metrics.total_expenses),
        ("Paid salaries", metrics.total_salaries),
        ("Print reserve", metrics.print_reserve),
        ("Real profit", metrics.real_profit),
        ("Expected bank balance", metrics.expected_bank_balance),
        ("Weekly profit", metrics.weekly_profit),
        ("Monthly profit", metrics.monthly_profit),
    ]
    .into_iter()
    .map(|(label, amount)| row(label, currency.format_amount(amount)))
    .collect()
}

pub fn counts_lines(counts: &DashboardCounts) -> Vec<String> {
    vec![
        row("Delivered sessions", counts.delivered_sessions.to_string()),
        row("Prints to deliver", counts.undelivered_prints.to_string()),
        row("Open debts", counts.open_debts.to_string()),
    ]
}

pub fn period_lines(totals: &PeriodTotals, currency: &dyn CurrencyFormatter) -> Vec<String> {
    [
        ("Session revenue", totals.session_revenue),
        ("Print revenue", totals.print_revenue),
        ("Expenses", totals.expenses),
        ("Paid salaries", totals.salaries),
        ("Print costs", totals.print_costs),
        ("Profit", totals.profit),
    ]
    .into_iter()
    .map(|(label, amount)| row(label, currency.format_amount(amount)))
    .collect()
}
