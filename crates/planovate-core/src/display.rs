//! Placeholder-aware rendering of project records.
//!
//! Every display field of a stored project is optional. Views go through
//! [`ProjectDisplay`] so a missing value renders as a fixed placeholder
//! instead of failing.

use chrono::{DateTime, Utc};

use crate::defaults::{
    CURRENCY, PLACEHOLDER_BUDGET, PLACEHOLDER_CITY, PLACEHOLDER_DATE, PLACEHOLDER_DESCRIPTION,
    PLACEHOLDER_TITLE,
};
use crate::models::ProjectRecord;
use crate::money::format_money;

/// Budgets are stored without a currency and render in [`CURRENCY`].
pub struct ProjectDisplay<'a> {
    record: &'a ProjectRecord,
}

impl<'a> ProjectDisplay<'a> {
    pub fn new(record: &'a ProjectRecord) -> Self {
        Self { record }
    }

    pub fn id(&self) -> &str {
        self.record.id.as_str()
    }

    pub fn title(&self) -> &str {
        non_empty(self.record.title.as_deref()).unwrap_or(PLACEHOLDER_TITLE)
    }

    pub fn city(&self) -> &str {
        non_empty(self.record.city.as_deref()).unwrap_or(PLACEHOLDER_CITY)
    }

    pub fn budget(&self) -> String {
        match self.record.budget {
            Some(amount) => format_money(amount as f64, CURRENCY),
            None => PLACEHOLDER_BUDGET.to_string(),
        }
    }

    pub fn description(&self) -> &str {
        non_empty(self.record.description.as_deref()).unwrap_or(PLACEHOLDER_DESCRIPTION)
    }

    pub fn created(&self) -> String {
        format_date(self.record.created_at)
    }

    pub fn updated(&self) -> String {
        format_date(self.record.updated_at)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Render a timestamp as e.g. "Jan 5, 2025".
pub fn format_date(at: Option<DateTime<Utc>>) -> String {
    match at {
        Some(at) => at.format("%b %-d, %Y").to_string(),
        None => PLACEHOLDER_DATE.to_string(),
    }
}
