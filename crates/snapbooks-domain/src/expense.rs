//! Operating expenses, optionally attributed to a session.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{common::*, money::Money};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Expense {
    pub id: Uuid,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    pub category: ExpenseCategory,
    pub amount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<Uuid>,
    #[serde(default)]
    pub paid_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Expense {
    pub fn new(
        date: impl Into<Option<NaiveDate>>,
        category: ExpenseCategory,
        amount: Money,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            date: date.into(),
            category,
            amount,
            session_id: None,
            paid_by: String::new(),
            notes: None,
            created_at: Utc::now(),
        }
    }

    pub fn for_session(mut self, session_id: Uuid) -> Self {
        self.session_id = Some(session_id);
        self
    }
}

impl Identifiable for Expense {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for Expense {
    fn display_label(&self) -> String {
        format!("{} {} on {}", self.category, self.amount, date_label(self.date))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExpenseCategory {
    Decoration,
    Fuel,
    Printing,
    Makeup,
    Wardrobe,
    Props,
    Other,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 7] = [
        ExpenseCategory::Decoration,
        ExpenseCategory::Fuel,
        ExpenseCategory::Printing,
        ExpenseCategory::Makeup,
        ExpenseCategory::Wardrobe,
        ExpenseCategory::Props,
        ExpenseCategory::Other,
    ];

    pub fn from_label(value: &str) -> Option<Self> {
        let needle = value.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.to_string().eq_ignore_ascii_case(needle))
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ExpenseCategory::Decoration => "Decoration",
            ExpenseCategory::Fuel => "Fuel",
            ExpenseCategory::Printing => "Printing",
            ExpenseCategory::Makeup => "Makeup",
            ExpenseCategory::Wardrobe => "Wardrobe",
            ExpenseCategory::Props => "Props",
            ExpenseCategory::Other => "Other",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_labels_are_case_insensitive() {
        assert_eq!(ExpenseCategory::from_label("fuel"), Some(ExpenseCategory::Fuel));
        assert_eq!(ExpenseCategory::from_label(" PROPS "), Some(ExpenseCategory::Props));
        assert_eq!(ExpenseCategory::from_label("rent"), None);
    }
}
