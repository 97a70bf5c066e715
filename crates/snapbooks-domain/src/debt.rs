//! Money owed to the studio by individuals.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{common::*, money::Money};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Debt {
    pub id: Uuid,
    pub person_name: String,
    pub amount: Money,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub paid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Debt {
    pub fn new(
        person_name: impl Into<String>,
        amount: Money,
        date: impl Into<Option<NaiveDate>>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            person_name: person_name.into(),
            amount,
            reason: String::new(),
            date: date.into(),
            paid: false,
            paid_date: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
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

impl Identifiable for Debt {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for Debt {
    fn name(&self) -> &str {
        &self.person_name
    }
}

impl Displayable for Debt {
    fn display_label(&self) -> String {
        let state = if self.paid { "settled" } else { "open" };
        format!("{} owes {} ({state})", self.person_name, self.amount)
    }
}
