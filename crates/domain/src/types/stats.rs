//! Dashboard overview statistics

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Response of `GET /dashboard-stats/`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardStats {
    pub reports: ReportStats,
    pub citizens: u64,
    pub projects: u64,
    pub wards: u64,
}

/// Report counts, overall and broken down
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportStats {
    pub total: u64,
    pub by_status_en: BTreeMap<String, u64>,
    pub by_category_en: BTreeMap<String, u64>,
}
