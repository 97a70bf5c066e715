//! `key=value` argument handling and record references for shell commands.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use snapbooks_domain::{Identifiable, Money};
use uuid::Uuid;

use crate::cli::core::CommandError;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Named `key=value` arguments. Keys are case-insensitive; each may be read once.
#[derive(Debug, Default)]
pub struct Fields {
    values: BTreeMap<String, String>,
}

/// Splits raw arguments into positional tokens and named fields.
pub fn split_args<'a>(args: &[&'a str]) -> Result<(Vec<&'a str>, Fields), CommandError> {
    let mut positional = Vec::new();
    let mut fields = Fields::default();
    for arg in args {
        match arg.split_once('=') {
            Some((key, value)) => {
                let key = key.trim().to_ascii_lowercase();
                if key.is_empty() {
                    return Err(invalid(format!("missing field name in `{arg}`")));
                }
                if fields.values.insert(key.clone(), value.to_string()).is_some() {
                    return Err(invalid(format!("field `{key}` given more than once")));
                }
            }
            None => positional.push(*arg),
        }
    }
    Ok((positional, fields))
}

impl Fields {
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn text(&mut self, key: &str) -> Option<String> {
        self.values.remove(key).map(|value| value.trim().to_string())
    }

    pub fn required_text(&mut self, key: &str) -> Result<String, CommandError> {
        self.text(key)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| missing(key))
    }

    pub fn money(&mut self, key: &str) -> Result<Option<Money>, CommandError> {
        self.text(key)
            .map(|raw| {
                Money::parse(&raw)
                    .map_err(|_| invalid(format!("`{key}` expects an amount such as 150 or 12.50")))
            })
            .transpose()
    }

    pub fn required_money(&mut self, key: &str) -> Result<Money, CommandError> {
        self.money(key)?.ok_or_else(|| missing(key))
    }

    /// Accepts `YYYY-MM-DD` or `today`.
    pub fn date(&mut self, key: &str, today: NaiveDate) -> Result<Option<NaiveDate>, CommandError> {
        self.text(key)
            .map(|raw| {
                parse_date(&raw, today)
                    .ok_or_else(|| invalid(format!("`{key}` expects a date as YYYY-MM-DD")))
            })
            .transpose()
    }

    pub fn count(&mut self, key: &str) -> Result<Option<u32>, CommandError> {
        self.text(key)
            .map(|raw| {
                raw.parse::<u32>()
                    .map_err(|_| invalid(format!("`{key}` expects a whole number")))
            })
            .transpose()
    }

    pub fn flag(&mut self, key: &str) -> Result<Option<bool>, CommandError> {
        self.text(key)
            .map(|raw| parse_flag(&raw).ok_or_else(|| invalid(format!("`{key}` expects yes or no"))))
            .transpose()
    }

    /// Fails on any field no handler consumed.
    pub fn finish(self) -> Result<(), CommandError> {
        if self.values.is_empty() {
            return Ok(());
        }
        let unknown: Vec<_> = self.values.into_keys().collect();
        Err(invalid(format!("unknown field(s): {}", unknown.join(", "))))
    }
}

pub fn parse_date(raw: &str, today: NaiveDate) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("today") {
        return Some(today);
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).ok()
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" | "1" => Some(true),
        "no" | "n" | "false" | "0" => Some(false),
        _ => None,
    }
}

/// Resolves a 1-based list position or a record id against `items`.
pub fn resolve<T: Identifiable>(items: &[&T], token: &str, kind: &str) -> Result<Uuid, CommandError> {
    let token = token.trim();
    if let Ok(position) = token.parse::<usize>() {
        return position
            .checked_sub(1)
            .and_then(|index| items.get(index))
            .map(|item| item.id())
            .ok_or_else(|| {
                invalid(format!(
                    "no {kind} #{position} (there are {} {kind} records)",
                    items.len()
                ))
            });
    }
    let id = Uuid::parse_str(token)
        .map_err(|_| invalid(format!("`{token}` is neither a {kind} number nor an id")))?;
    items
        .iter()
        .map(|item| item.id())
        .find(|candidate| *candidate == id)
        .ok_or_else(|| invalid(format!("no {kind} with id {id}")))
}

/// The positional argument at `index`, or a usage error naming `what`.
pub fn positional<'a>(args: &[&'a str], index: usize, what: &str) -> Result<&'a str, CommandError> {
    args.get(index)
        .copied()
        .ok_or_else(|| invalid(format!("missing {what}")))
}

fn missing(key: &str) -> CommandError {
    invalid(format!("missing required field `{key}=`"))
}

fn invalid(message: String) -> CommandError {
    CommandError::InvalidArguments(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapbooks_domain::Session;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 7).unwrap()
    }

    #[test]
    fn fields_and_positionals_are_separated() {
        let (positional, mut fields) =
            split_args(&["3", "Price=12.50", "notes=a=b", "date=today"]).unwrap();
        assert_eq!(positional, vec!["3"]);
        assert_eq!(fields.money("price").unwrap(), Some(Money::from_cents(1_250)));
        assert_eq!(fields.text("notes").as_deref(), Some("a=b"));
        assert_eq!(fields.date("date", today()).unwrap(), Some(today()));
        assert!(fields.finish().is_ok());
    }

    #[test]
    fn leftover_and_duplicate_fields_are_rejected() {
        let (_, fields) = split_args(&["colour=red"]).unwrap();
        assert!(fields.finish().is_err());
        assert!(split_args(&["a=1", "A=2"]).is_err());
    }

    #[test]
    fn bad_values_are_reported() {
        let (_, mut fields) = split_args(&["price=lots", "date=07/05/2025", "print=maybe"]).unwrap();
        assert!(fields.money("price").is_err());
        assert!(fields.date("date", today()).is_err());
        assert!(fields.flag("print").is_err());
        assert!(fields.required_text("client").is_err());
    }

    #[test]
    fn references_accept_positions_and_ids() {
        let first = Session::new("Ana", today(), Money::from_cents(100));
        let second = Session::new("Bo", today(), Money::from_cents(200));
        let items = vec![&first, &second];

        assert_eq!(resolve(&items, "2", "session").unwrap(), second.id);
        assert_eq!(resolve(&items, &first.id.to_string(), "session").unwrap(), first.id);
        assert!(resolve(&items, "0", "session").is_err());
        assert!(resolve(&items, "3", "session").is_err());
        assert!(resolve(&items, "abc", "session").is_err());
    }
}
