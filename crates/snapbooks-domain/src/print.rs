//! Print orders: charged up front, recognised as revenue on hand-over.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{common::*, money::Money};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Print {
    pub id: Uuid,
    pub client_name: String,
    #[serde(default)]
    pub charge_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<NaiveDate>,
    pub amount_charged: Money,
    #[serde(default)]
    pub actual_cost: Money,
    #[serde(default)]
    pub status: PrintStatus,
    pub created_at: DateTime<Utc>,
}

impl Print {
    pub fn new(
        client_name: impl Into<String>,
        charge_date: impl Into<Option<NaiveDate>>,
        amount_charged: Money,
        actual_cost: Money,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            client_name: client_name.into(),
            charge_date: charge_date.into(),
            delivery_date: None,
            amount_charged,
            actual_cost,
            status: PrintStatus::Charged,
            created_at: Utc::now(),
        }
    }

    pub fn is_delivered(&self) -> bool {
        self.status == PrintStatus::Delivered
    }

    /// Amount charged net of production cost.
    pub fn margin(&self) -> Money {
        self.amount_charged - self.actual_cost
    }

    /// Hands the print over; an already recorded delivery date is kept.
    pub fn mark_delivered(&mut self, date: NaiveDate) {
        self.status = PrintStatus::Delivered;
        if self.delivery_date.is_none() {
            self.delivery_date = Some(date);
        }
    }
}

impl Identifiable for Print {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for Print {
    fn name(&self) -> &str {
        &self.client_name
    }
}

impl Displayable for Print {
    fn display_label(&self) -> String {
        format!(
            "{} charged {} on {} [{}]",
            self.client_name,
            self.amount_charged,
            date_label(self.charge_date),
            self.status
        )
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum PrintStatus {
    #[default]
    Charged,
    Delivered,
}

impl PrintStatus {
    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "charged" | "paid" => Some(PrintStatus::Charged),
            "delivered" => Some(PrintStatus::Delivered),
            _ => None,
        }
    }
}

impl fmt::Display for PrintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PrintStatus::Charged => "Charged",
            PrintStatus::Delivered => "Delivered",
        };
        f.write_str(label)
    }
}
