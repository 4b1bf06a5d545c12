//! Administration types: wards, audit trail, dashboard accounts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ward {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub constituency: String,
    #[serde(default)]
    pub county: String,
    #[serde(default)]
    pub population_estimate: u64,
}

/// One entry of the administrative audit trail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLog {
    pub id: String,
    #[serde(default)]
    pub user: String,
    pub action_type: String,
    #[serde(default)]
    pub table_name: String,
    #[serde(default)]
    pub record_id: String,
    #[serde(default)]
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

/// An officer/administrator account with dashboard access
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardUser {
    pub id: String,
    pub phone_number: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    pub role: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub date_joined: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

/// Body of `POST /dashboard-users/`
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDashboardUser {
    pub phone_number: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

impl NewDashboardUser {
    /// Account with the default `officer` role.
    pub fn officer(
        phone_number: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            phone_number: phone_number.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            password: password.into(),
            role: "officer".to_string(),
        }
    }
}

impl std::fmt::Debug for NewDashboardUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewDashboardUser")
            .field("phone_number", &self.phone_number)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}
