//! Citizen report types

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a citizen report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Received,
    UnderReview,
    ActionTaken,
    Resolved,
    Closed,
    /// Status value this client does not know about
    #[serde(other)]
    Unknown,
}

impl ReportStatus {
    /// Statuses an officer can move a report to, in workflow order.
    pub const ALL: [ReportStatus; 5] =
        [Self::Received, Self::UnderReview, Self::ActionTaken, Self::Resolved, Self::Closed];

    /// Wire value (`status_en`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::UnderReview => "under_review",
            Self::ActionTaken => "action_taken",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Report category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportCategory {
    Infrastructure,
    Health,
    Education,
    Security,
    Water,
    Environment,
    #[serde(other)]
    Other,
}

impl ReportCategory {
    /// Every category, in display order.
    pub const ALL: [ReportCategory; 7] = [
        Self::Infrastructure,
        Self::Health,
        Self::Education,
        Self::Security,
        Self::Water,
        Self::Environment,
        Self::Other,
    ];

    /// Wire value (`category_en`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Infrastructure => "infrastructure",
            Self::Health => "health",
            Self::Education => "education",
            Self::Security => "security",
            Self::Water => "water",
            Self::Environment => "environment",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ReportCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A citizen report as listed on the reports page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: String,
    pub ref_code: String,
    #[serde(default)]
    pub citizen: String,
    #[serde(default)]
    pub ward: String,
    pub category_en: ReportCategory,
    #[serde(default)]
    pub description: String,
    pub status_en: ReportStatus,
    #[serde(default)]
    pub priority_level_en: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /reports/{id}/update_status/`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status_en: ReportStatus,
}

/// Server-side filters for the reports list
///
/// Empty filters are omitted from the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFilters {
    pub ward: Option<String>,
    pub category: Option<ReportCategory>,
    pub status: Option<ReportStatus>,
}

impl ReportFilters {
    /// Filter by ward name.
    pub fn ward(mut self, ward: impl Into<String>) -> Self {
        self.ward = Some(ward.into());
        self
    }

    /// Filter by category.
    pub fn category(mut self, category: ReportCategory) -> Self {
        self.category = Some(category);
        self
    }

    /// Filter by status.
    pub fn status(mut self, status: ReportStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Query parameters in wire order (`ward`, `category_en`, `status_en`),
    /// values not yet URL-encoded.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(ward) = self.ward.as_deref().map(str::trim).filter(|w| !w.is_empty()) {
            pairs.push(("ward", ward.to_string()));
        }
        if let Some(category) = self.category {
            pairs.push(("category_en", category.as_str().to_string()));
        }
        if let Some(status) = self.status {
            pairs.push(("status_en", status.as_str().to_string()));
        }
        pairs
    }

    /// `true` when no filter would be sent.
    pub fn is_empty(&self) -> bool {
        self.query_pairs().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn deserializes_report_from_backend_shape() {
        let report: Report = serde_json::from_value(json!({
            "id": "7d0c",
            "ref_code": "RPT-0042",
            "citizen": "+254712345678",
            "ward": "Kilimani",
            "category_en": "water",
            "description": "Burst pipe on Argwings Kodhek road",
            "status_en": "under_review",
            "priority_level_en": "high",
            "created_at": "2024-03-01T08:30:00Z",
            "extra_field": true
        }))
        .unwrap();

        assert_eq!(report.category_en, ReportCategory::Water);
        assert_eq!(report.status_en, ReportStatus::UnderReview);
        assert_eq!(report.priority_level_en.as_deref(), Some("high"));
    }

    #[test]
    fn unknown_enum_values_do_not_fail() {
        let status: ReportStatus = serde_json::from_value(json!("escalated")).unwrap();
        let category: ReportCategory = serde_json::from_value(json!("roads")).unwrap();

        assert_eq!(status, ReportStatus::Unknown);
        assert_eq!(category, ReportCategory::Other);
    }

    #[test]
    fn status_update_serializes_wire_value() {
        let body = serde_json::to_value(StatusUpdate { status_en: ReportStatus::ActionTaken }).unwrap();
        assert_eq!(body, json!({"status_en": "action_taken"}));
    }

    #[test]
    fn filters_skip_empty_values() {
        let filters = ReportFilters::default().ward("  ").status(ReportStatus::Resolved);
        assert_eq!(filters.query_pairs(), vec![("status_en", "resolved".to_string())]);

        assert!(ReportFilters::default().is_empty());
    }

    #[test]
    fn filters_keep_wire_order() {
        let filters = ReportFilters::default()
            .status(ReportStatus::Closed)
            .category(ReportCategory::Health)
            .ward("Westlands");
        let keys: Vec<_> = filters.query_pairs().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["ward", "category_en", "status_en"]);
    }
}
