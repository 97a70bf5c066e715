use chrono::NaiveDate;
use snapbooks_domain::Money;

/// Formats currency amounts for presentation.
pub trait CurrencyFormatter: Send + Sync {
    fn format_amount(&self, amount: Money) -> String;
}

/// Formats dates for presentation.
pub trait DateFormatter: Send + Sync {
    fn format_date(&self, date: NaiveDate) -> String;

    /// Records imported without a readable date show as `undated`.
    fn format_optional_date(&self, date: Option<NaiveDate>) -> String {
        date.map_or_else(|| "undated".to_string(), |value| self.format_date(value))
    }
}
