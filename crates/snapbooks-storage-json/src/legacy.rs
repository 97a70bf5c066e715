//! Import of the `snapbooks_data` document written by the browser application.
//!
//! That format uses camelCase keys, Spanish status literals, floating-point
//! amounts and short random string ids. Records are converted into native
//! entities with fresh UUIDs; links between records are remapped. Unreadable
//! dates become `None` rather than costing the record.

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Deserialize;
use snapbooks_core::CoreError;
use snapbooks_domain::{
    Books, Debt, Expense, ExpenseCategory, Money, PaymentType, Print, PrintStatus, Session,
    SessionStatus, WeeklySalaryEntry, Worker,
};
use tracing::{info, warn};
use uuid::Uuid;

/// Books rebuilt from a legacy export plus everything that could not be carried over.
#[derive(Debug, Clone)]
pub struct LegacyImport {
    pub books: Books,
    pub warnings: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct LegacyData {
    sessions: Vec<LegacySession>,
    prints: Vec<LegacyPrint>,
    workers: Vec<LegacyWorker>,
    weekly_salaries: Vec<LegacySalary>,
    expenses: Vec<LegacyExpense>,
    debts: Vec<LegacyDebt>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct LegacySession {
    id: String,
    client_name: String,
    date: String,
    session_type: String,
    price: f64,
    includes_print: bool,
    photo_count: f64,
    photographer: String,
    decoration_cost: f64,
    notes: Option<String>,
    status: String,
    created_at: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct LegacyPrint {
    client_name: String,
    charge_date: String,
    delivery_date: Option<String>,
    amount_charged: f64,
    actual_cost: f64,
    status: String,
    created_at: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct LegacyWorker {
    id: String,
    name: String,
    role: String,
    payment_type: String,
    amount: f64,
    created_at: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct LegacySalary {
    worker_id: String,
    worker_name: String,
    week_start: String,
    week_end: String,
    fixed_salary: f64,
    generated_amount: f64,
    paid: bool,
    paid_date: Option<String>,
    created_at: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct LegacyExpense {
    date: String,
    #[serde(rename = "type")]
    kind: String,
    amount: f64,
    session_id: Option<String>,
    paid_by: String,
    notes: Option<String>,
    created_at: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct LegacyDebt {
    person_name: String,
    amount: f64,
    reason: String,
    date: String,
    paid: bool,
    paid_date: Option<String>,
    created_at: Option<String>,
}

/// Parses a legacy export into fresh books named `name`.
///
/// Amounts are rounded to cents. A date that cannot be parsed is dropped and
/// reported; the record itself is kept so its money still counts in the
/// all-time totals, but it falls in no weekly or monthly window.
pub fn import_legacy_export(json: &str, name: &str) -> Result<LegacyImport, CoreError> {
    let data: LegacyData =
        serde_json::from_str(json).map_err(|err| CoreError::Serde(err.to_string()))?;
    let mut importer = Importer {
        books: Books::new(name),
        warnings: Vec::new(),
        session_ids: HashMap::new(),
        worker_ids: HashMap::new(),
    };

    for (index, raw) in data.sessions.into_iter().enumerate() {
        importer.session(index, raw);
    }
    for (index, raw) in data.prints.into_iter().enumerate() {
        importer.print(index, raw);
    }
    for (index, raw) in data.workers.into_iter().enumerate() {
        importer.worker(index, raw);
    }
    for (index, raw) in data.weekly_salaries.into_iter().enumerate() {
        importer.salary(index, raw);
    }
    for (index, raw) in data.expenses.into_iter().enumerate() {
        importer.expense(index, raw);
    }
    for (index, raw) in data.debts.into_iter().enumerate() {
        importer.debt(index, raw);
    }

    for message in &importer.warnings {
        warn!("legacy import: {message}");
    }
    info!(
        records = importer.books.record_count(),
        warnings = importer.warnings.len(),
        "legacy export imported"
    );
    Ok(LegacyImport {
        books: importer.books,
        warnings: importer.warnings,
    })
}

struct Importer {
    books: Books,
    warnings: Vec<String>,
    session_ids: HashMap<String, Uuid>,
    worker_ids: HashMap<String, Uuid>,
}

impl Importer {
    fn warn(&mut self, kind: &str, index: usize, message: impl AsRef<str>) {
        self.warnings
            .push(format!("{kind} #{} {}", index + 1, message.as_ref()));
    }

    /// Parses `raw`, recording a warning and returning `None` when it is not a date.
    fn date(&mut self, kind: &str, index: usize, field: &str, raw: &str) -> Option<NaiveDate> {
        let parsed = parse_date(raw);
        if parsed.is_none() {
            self.warn(kind, index, format!("has invalid {field} `{raw}`; kept undated"));
        }
        parsed
    }

    /// The recorded paid date, or `fallback` when a paid record lacks one.
    fn paid_on(
        &mut self,
        kind: &str,
        index: usize,
        raw: Option<&str>,
        fallback: NaiveDate,
    ) -> NaiveDate {
        match raw.and_then(parse_date) {
            Some(date) => date,
            None => {
                self.warn(kind, index, format!("is paid without a paid date; using {fallback}"));
                fallback
            }
        }
    }

    fn session(&mut self, index: usize, raw: LegacySession) {
        let date = self.date("session", index, "date", &raw.date);
        let status = session_status(&raw.status).unwrap_or_else(|| {
            self.warn(
                "session",
                index,
                format!("has unknown status `{}`; imported as pending", raw.status),
            );
            SessionStatus::Pending
        });

        let mut session = Session::new(raw.client_name, date, Money::from_f64_rounded(raw.price));
        session.session_type = raw.session_type;
        session.includes_print = raw.includes_print;
        session.photo_count = raw.photo_count.max(0.0).round() as u32;
        session.photographer = raw.photographer;
        session.decoration_cost = Money::from_f64_rounded(raw.decoration_cost);
        session.notes = raw.notes.filter(|notes| !notes.trim().is_empty());
        session.status = status;
        session.created_at = created_at(raw.created_at.as_deref());
        if !raw.id.is_empty() {
            self.session_ids.insert(raw.id, session.id);
        }
        self.books.sessions.push(session);
    }

    fn print(&mut self, index: usize, raw: LegacyPrint) {
        let charge_date = self.date("print", index, "charge date", &raw.charge_date);
        let status = match raw.status.as_str() {
            "entregada" => PrintStatus::Delivered,
            "pagada" => PrintStatus::Charged,
            other => {
                self.warn(
                    "print",
                    index,
                    format!("has unknown status `{other}`; imported as charged"),
                );
                PrintStatus::Charged
            }
        };

        let mut print = Print::new(
            raw.client_name,
            charge_date,
            Money::from_f64_rounded(raw.amount_charged),
            Money::from_f64_rounded(raw.actual_cost),
        );
        print.delivery_date = raw.delivery_date.as_deref().and_then(parse_date);
        print.status = status;
        print.created_at = created_at(raw.created_at.as_deref());
        self.books.prints.push(print);
    }

    fn worker(&mut self, index: usize, raw: LegacyWorker) {
        let payment_type = match raw.payment_type.as_str() {
            "salario_semanal" => PaymentType::FixedWeekly,
            "por_sesion" => PaymentType::PerSession,
            "por_foto" => PaymentType::PerPhoto,
            "comision_cliente" => PaymentType::PerClient,
            other => {
                self.warn(
                    "worker",
                    index,
                    format!("skipped: unknown payment type `{other}`"),
                );
                return;
            }
        };
        let mut worker = Worker::new(raw.name, payment_type, Money::from_f64_rounded(raw.amount))
            .with_role(raw.role);
        worker.created_at = created_at(raw.created_at.as_deref());
        if !raw.id.is_empty() {
            self.worker_ids.insert(raw.id, worker.id);
        }
        self.books.workers.push(worker);
    }

    fn salary(&mut self, index: usize, raw: LegacySalary) {
        const KIND: &str = "salary entry";
        // Windows place an entry by its week start; a bad end is rebuilt from it.
        let week_start = self.date(KIND, index, "week start", &raw.week_start);
        let week_end = match (week_start, parse_date(&raw.week_end)) {
            (Some(start), Some(end)) if end >= start => Some(end),
            (Some(start), _) => {
                let end = start + Duration::days(6);
                self.warn(
                    KIND,
                    index,
                    format!("has invalid week end `{}`; using {end}", raw.week_end),
                );
                Some(end)
            }
            (None, _) => None,
        };

        let worker_id = match self.worker_ids.get(&raw.worker_id).copied() {
            Some(id) => id,
            None => {
                self.warn(
                    KIND,
                    index,
                    format!(
                        "references unknown worker `{}` ({})",
                        raw.worker_id, raw.worker_name
                    ),
                );
                *self
                    .worker_ids
                    .entry(raw.worker_id.clone())
                    .or_insert_with(Uuid::new_v4)
            }
        };

        let created = created_at(raw.created_at.as_deref());
        let mut entry = WeeklySalaryEntry::new(worker_id, raw.worker_name, week_start, week_end)
            .with_amounts(
                Money::from_f64_rounded(raw.fixed_salary),
                Money::from_f64_rounded(raw.generated_amount),
            );
        if raw.paid {
            let fallback = week_end.unwrap_or_else(|| created.date_naive());
            let paid_on = self.paid_on(KIND, index, raw.paid_date.as_deref(), fallback);
            entry.mark_paid(paid_on);
        }
        entry.created_at = created;
        self.books.salaries.push(entry);
    }

    fn expense(&mut self, index: usize, raw: LegacyExpense) {
        let date = self.date("expense", index, "date", &raw.date);
        let mut expense = Expense::new(
            date,
            expense_category(&raw.kind),
            Money::from_f64_rounded(raw.amount),
        );
        if let Some(link) = raw.session_id.filter(|link| !link.is_empty()) {
            match self.session_ids.get(&link) {
                Some(id) => expense.session_id = Some(*id),
                None => self.warn(
                    "expense",
                    index,
                    format!("link to unknown session `{link}` dropped"),
                ),
            }
        }
        expense.paid_by = raw.paid_by;
        expense.notes = raw.notes.filter(|notes| !notes.trim().is_empty());
        expense.created_at = created_at(raw.created_at.as_deref());
        self.books.expenses.push(expense);
    }

    fn debt(&mut self, index: usize, raw: LegacyDebt) {
        let date = self.date("debt", index, "date", &raw.date);
        let created = created_at(raw.created_at.as_deref());
        let mut debt = Debt::new(raw.person_name, Money::from_f64_rounded(raw.amount), date)
            .with_reason(raw.reason);
        if raw.paid {
            let fallback = date.unwrap_or_else(|| created.date_naive());
            let paid_on = self.paid_on("debt", index, raw.paid_date.as_deref(), fallback);
            debt.mark_paid(paid_on);
        }
        debt.created_at = created;
        self.books.debts.push(debt);
    }
}

fn session_status(raw: &str) -> Option<SessionStatus> {
    match raw {
        "pendiente" => Some(SessionStatus::Pending),
        "realizada" => Some(SessionStatus::Done),
        "entregada" => Some(SessionStatus::Delivered),
        _ => None,
    }
}

fn expense_category(raw: &str) -> ExpenseCategory {
    match raw {
        "decoracion" => ExpenseCategory::Decoration,
        "gasolina" => ExpenseCategory::Fuel,
        "impresion" => ExpenseCategory::Printing,
        "maquillaje" => ExpenseCategory::Makeup,
        "ropa" => ExpenseCategory::Wardrobe,
        "props" => ExpenseCategory::Props,
        _ => ExpenseCategory::Other,
    }
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|ts| ts.with_timezone(&Utc).date_naive())
        })
}

fn created_at(raw: Option<&str>) -> DateTime<Utc> {
    raw.and_then(|value| DateTime::parse_from_rfc3339(value).ok())
        .map(|ts| ts.with_timezone(&Utc))
        .unwrap_or_else(Utc::now)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_plain_and_timestamp_forms() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 14);
        assert_eq!(parse_date("2025-03-14"), expected);
        assert_eq!(parse_date("2025-03-14T10:30:00.000Z"), expected);
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("14/03/2025"), None);
    }

    #[test]
    fn unknown_expense_type_maps_to_other() {
        assert_eq!(expense_category("gasolina"), ExpenseCategory::Fuel);
        assert_eq!(expense_category("alquiler"), ExpenseCategory::Other);
    }
}
