//! Citizen feedback on handled reports

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A citizen's rating and comment for a handled report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub id: String,
    #[serde(default)]
    pub report: String,
    #[serde(default)]
    pub citizen: String,
    /// 1 to 5 stars
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
    pub created_at: DateTime<Utc>,
}
