//! Client photo sessions and their delivery lifecycle.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{common::*, money::Money};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub id: Uuid,
    pub client_name: String,
    /// `None` only for sessions imported without a readable date.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub session_type: String,
    /// Agreed price, fixed when the session is booked.
    pub price: Money,
    #[serde(default)]
    pub photo_count: u32,
    #[serde(default)]
    pub photographer: String,
    #[serde(default)]
    pub decoration_cost: Money,
    #[serde(default)]
    pub status: SessionStatus,
    #[serde(default)]
    pub includes_print: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(
        client_name: impl Into<String>,
        date: impl Into<Option<NaiveDate>>,
        price: Money,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            client_name: client_name.into(),
            date: date.into(),
            session_type: String::new(),
            price,
            photo_count: 0,
            photographer: String::new(),
            decoration_cost: Money::ZERO,
            status: SessionStatus::Pending,
            includes_print: false,
            notes: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_photographer(mut self, photographer: impl Into<String>) -> Self {
        self.photographer = photographer.into();
        self
    }

    pub fn with_status(mut self, status: SessionStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_photo_count(mut self, photo_count: u32) -> Self {
        self.photo_count = photo_count;
        self
    }

    pub fn is_delivered(&self) -> bool {
        self.status == SessionStatus::Delivered
    }

    /// Moves the session one step forward; delivered sessions stay delivered.
    pub fn advance(&mut self) -> SessionStatus {
        self.status = self.status.next();
        self.status
    }

    pub fn set_status(&mut self, status: SessionStatus) {
        self.status = status;
    }
}

impl Identifiable for Session {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for Session {
    fn name(&self) -> &str {
        &self.client_name
    }
}

impl Displayable for Session {
    fn display_label(&self) -> String {
        format!(
            "{} on {} [{}]",
            self.client_name,
            date_label(self.date),
            self.status
        )
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
/// Where a session stands between booking and hand-over.
pub enum SessionStatus {
    #[default]
    Pending,
    Done,
    Delivered,
}

impl SessionStatus {
    pub const ALL: [SessionStatus; 3] = [
        SessionStatus::Pending,
        SessionStatus::Done,
        SessionStatus::Delivered,
    ];

    pub fn next(self) -> Self {
        match self {
            SessionStatus::Pending => SessionStatus::Done,
            SessionStatus::Done | SessionStatus::Delivered => SessionStatus::Delivered,
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(SessionStatus::Pending),
            "done" => Some(SessionStatus::Done),
            "delivered" => Some(SessionStatus::Delivered),
            _ => None,
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionStatus::Pending => "Pending",
            SessionStatus::Done => "Done",
            SessionStatus::Delivered => "Delivered",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_walks_lifecycle_and_stops_at_delivered() {
        let date = NaiveDate::from_ymd_opt(2025, 4, 2).unwrap();
        let mut session = Session::new("Ana", date, Money::from_major(150));
        assert_eq!(session.status, SessionStatus::Pending);
        assert_eq!(session.advance(), SessionStatus::Done);
        assert_eq!(session.advance(), SessionStatus::Delivered);
        assert_eq!(session.advance(), SessionStatus::Delivered);
        assert!(session.is_delivered());
    }

    #[test]
    fn status_labels_round_trip() {
        for status in SessionStatus::ALL {
            assert_eq!(SessionStatus::from_label(&status.to_string()), Some(status));
        }
        assert_eq!(SessionStatus::from_label("shipped"), None);
    }
}
