//! Ward development project types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A development project tracked per ward
///
/// Budgets arrive as decimal strings (`"150000.00"`); use
/// [`Project::budget_allocated_amount`] / [`Project::budget_used_amount`] for
/// arithmetic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub project_code: String,
    pub title_en: String,
    #[serde(default)]
    pub description_en: String,
    #[serde(default)]
    pub ward: String,
    #[serde(default)]
    pub category_en: String,
    pub status_en: String,
    #[serde(default)]
    pub budget_allocated: String,
    #[serde(default)]
    pub budget_used: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Allocated budget parsed as a number.
    pub fn budget_allocated_amount(&self) -> Option<f64> {
        parse_amount(&self.budget_allocated)
    }

    /// Spent budget parsed as a number.
    pub fn budget_used_amount(&self) -> Option<f64> {
        parse_amount(&self.budget_used)
    }
}

fn parse_amount(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_decimal_budgets() {
        let project: Project = serde_json::from_value(json!({
            "id": "p1",
            "project_code": "PRJ-001",
            "title_en": "Borehole",
            "status_en": "ongoing",
            "budget_allocated": "150000.00",
            "budget_used": " 37500.5 ",
            "start_date": "2024-01-15",
            "end_date": null,
            "created_at": "2024-01-10T12:00:00+03:00"
        }))
        .unwrap();

        assert_eq!(project.budget_allocated_amount(), Some(150_000.0));
        assert_eq!(project.budget_used_amount(), Some(37_500.5));
        assert_eq!(project.start_date, NaiveDate::from_ymd_opt(2024, 1, 15));
        assert!(project.end_date.is_none());
    }

    #[test]
    fn unparsable_budget_is_none() {
        assert_eq!(parse_amount("n/a"), None);
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("NaN"), None);
    }
}
