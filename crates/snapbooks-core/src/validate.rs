use chrono::NaiveDate;
use snapbooks_domain::{Books, Money};
use uuid::Uuid;

use crate::{CoreError, ServiceResult};

pub(crate) fn require_name(field: &str, value: &str) -> ServiceResult<()> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be blank")));
    }
    Ok(())
}

pub(crate) fn non_negative(field: &str, amount: Money) -> ServiceResult<()> {
    if amount.is_negative() {
        return Err(CoreError::Validation(format!(
            "{field} must not be negative (got {amount})"
        )));
    }
    Ok(())
}

/// Week bounds are either both set and ordered, or both missing.
pub(crate) fn week_range(start: Option<NaiveDate>, end: Option<NaiveDate>) -> ServiceResult<()> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => Err(CoreError::Validation(format!(
            "week end {end} precedes week start {start}"
        ))),
        (Some(_), None) | (None, Some(_)) => Err(CoreError::Validation(
            "week start and week end must be given together".into(),
        )),
        _ => Ok(()),
    }
}

/// A record marked paid must say when.
pub(crate) fn paid_state(paid: bool, paid_date: Option<NaiveDate>) -> ServiceResult<()> {
    if paid && paid_date.is_none() {
        return Err(CoreError::Validation(
            "a paid record needs a paid date".into(),
        ));
    }
    Ok(())
}

pub(crate) fn session_exists(books: &Books, id: Uuid) -> ServiceResult<()> {
    books
        .session(id)
        .map(|_| ())
        .ok_or(CoreError::SessionNotFound(id))
}

pub(crate) fn worker_exists(books: &Books, id: Uuid) -> ServiceResult<()> {
    books
        .worker(id)
        .map(|_| ())
        .ok_or(CoreError::WorkerNotFound(id))
}
