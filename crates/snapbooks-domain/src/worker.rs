//! Studio staff and how each one is paid.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{common::*, money::Money};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Worker {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub role: String,
    pub payment_type: PaymentType,
    /// Unit rate interpreted according to `payment_type`.
    pub amount: Money,
    pub created_at: DateTime<Utc>,
}

impl Worker {
    pub fn new(name: impl Into<String>, payment_type: PaymentType, amount: Money) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            role: String::new(),
            payment_type,
            amount,
            created_at: Utc::now(),
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }
}

impl Identifiable for Worker {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for Worker {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for Worker {
    fn display_label(&self) -> String {
        format!("{} ({}, {})", self.name, self.payment_type, self.amount)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PaymentType {
    FixedWeekly,
    PerSession,
    PerPhoto,
    PerClient,
}

impl PaymentType {
    pub const ALL: [PaymentType; 4] = [
        PaymentType::FixedWeekly,
        PaymentType::PerSession,
        PaymentType::PerPhoto,
        PaymentType::PerClient,
    ];

    pub fn key(self) -> &'static str {
        match self {
            PaymentType::FixedWeekly => "weekly",
            PaymentType::PerSession => "session",
            PaymentType::PerPhoto => "photo",
            PaymentType::PerClient => "client",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase().replace(['-', '_', ' '], "");
        match normalized.as_str() {
            "weekly" | "fixedweekly" | "fixed" => Some(PaymentType::FixedWeekly),
            "session" | "persession" => Some(PaymentType::PerSession),
            "photo" | "perphoto" => Some(PaymentType::PerPhoto),
            "client" | "perclient" => Some(PaymentType::PerClient),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PaymentType::FixedWeekly => "Fixed weekly",
            PaymentType::PerSession => "Per session",
            PaymentType::PerPhoto => "Per photo",
            PaymentType::PerClient => "Per client",
        };
        f.write_str(label)
    }
}
