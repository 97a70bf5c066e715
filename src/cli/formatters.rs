use chrono::NaiveDate;
use snapbooks_config::Config;
use snapbooks_core::format::{CurrencyFormatter, DateFormatter};
use snapbooks_domain::Money;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Formatter implementations driven by the active configuration.
#[derive(Debug, Clone)]
pub struct CliFormatters {
    currency_symbol: String,
}

impl Default for CliFormatters {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl CliFormatters {
    pub fn from_config(config: &Config) -> Self {
        Self {
            currency_symbol: config.currency_symbol.clone(),
        }
    }
}

impl CurrencyFormatter for CliFormatters {
    fn format_amount(&self, amount: Money) -> String {
        format!("{}{}", self.currency_symbol, amount.to_decimal_string())
    }
}

impl DateFormatter for CliFormatters {
    fn format_date(&self, date: NaiveDate) -> String {
        date.format(DATE_FORMAT).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_use_the_configured_symbol() {
        let formatters = CliFormatters::default();
        assert_eq!(formatters.format_amount(Money::from_cents(123_450)), "$1234.50");
        assert_eq!(formatters.format_amount(Money::from_cents(-1_200)), "$-12.00");

        let mut config = Config::default();
        config.currency_symbol = "€".into();
        let euro = CliFormatters::from_config(&config);
        assert_eq!(euro.format_amount(Money::from_cents(5)), "€0.05");
    }

    #[test]
    fn dates_are_iso() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        assert_eq!(CliFormatters::default().format_date(date), "2025-03-09");
    }
}
