//! Dashboard API commands
//!
//! Typed wrappers over the backend endpoints the officer dashboard pages
//! read and write. List endpoints accept every envelope the backend uses
//! (bare array, `{results}`, `{data}`) and always return a plain `Vec`.

use serde::de::DeserializeOwned;
use serde_json::Value;
use skika_domain::types::{
    AuditLog, DashboardStats, DashboardUser, Feedback, Listing, NewDashboardUser, Project, Report,
    ReportFilters, ReportStatus, StatusUpdate, Ward,
};
use tracing::{debug, instrument};
use urlencoding::encode;

use super::client::ApiClient;
use super::errors::ApiError;

const DASHBOARD_STATS_PATH: &str = "/dashboard-stats/";
const REPORTS_PATH: &str = "/reports/";
const PROJECTS_PATH: &str = "/projects/";
const FEEDBACK_PATH: &str = "/feedback/";
const WARDS_PATH: &str = "/wards/";
const AUDIT_LOGS_PATH: &str = "/audit-logs/";
const DASHBOARD_USERS_PATH: &str = "/dashboard-users/";

/// API commands for dashboard pages
#[derive(Debug, Clone)]
pub struct DashboardApi {
    client: ApiClient,
}

impl DashboardApi {
    /// Create a new commands instance
    ///
    /// # Arguments
    ///
    /// * `client` - API client (shares tokens with every other clone)
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Underlying API client.
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Headline counters for the overview page
    ///
    /// # Errors
    ///
    /// Returns error if API request fails
    #[instrument(skip(self))]
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        self.client.get(DASHBOARD_STATS_PATH).await
    }

    // === Report Operations ===

    /// List citizen reports, optionally filtered server-side
    ///
    /// Only non-empty filters are sent, in `ward`, `category_en`,
    /// `status_en` order.
    ///
    /// # Errors
    ///
    /// Returns error if API request fails
    #[instrument(skip(self, filters))]
    pub async fn list_reports(&self, filters: &ReportFilters) -> Result<Vec<Report>, ApiError> {
        let path = reports_path(filters);
        self.list(&path).await
    }

    /// Move a report to a new status
    ///
    /// # Arguments
    ///
    /// * `id` - Report ID
    /// * `status` - Target status
    ///
    /// # Returns
    ///
    /// The backend's response body
    ///
    /// # Errors
    ///
    /// Returns error if API request fails
    #[instrument(skip(self))]
    pub async fn update_report_status(
        &self,
        id: &str,
        status: ReportStatus,
    ) -> Result<Value, ApiError> {
        let path = format!("{}{}/update_status/", REPORTS_PATH, encode(id));
        let response = self.client.post(&path, &StatusUpdate { status_en: status }).await?;

        debug!(report_id = %id, "Report status updated");
        Ok(response)
    }

    // === Listing Operations ===

    /// # Errors
    ///
    /// Returns error if API request fails
    #[instrument(skip(self))]
    pub async fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        self.list(PROJECTS_PATH).await
    }

    /// # Errors
    ///
    /// Returns error if API request fails
    #[instrument(skip(self))]
    pub async fn list_feedback(&self) -> Result<Vec<Feedback>, ApiError> {
        self.list(FEEDBACK_PATH).await
    }

    /// # Errors
    ///
    /// Returns error if API request fails
    #[instrument(skip(self))]
    pub async fn list_wards(&self) -> Result<Vec<Ward>, ApiError> {
        self.list(WARDS_PATH).await
    }

    /// # Errors
    ///
    /// Returns error if API request fails
    #[instrument(skip(self))]
    pub async fn list_audit_logs(&self) -> Result<Vec<AuditLog>, ApiError> {
        self.list(AUDIT_LOGS_PATH).await
    }

    // === Administration ===

    /// # Errors
    ///
    /// Returns error if API request fails
    #[instrument(skip(self))]
    pub async fn list_dashboard_users(&self) -> Result<Vec<DashboardUser>, ApiError> {
        self.list(DASHBOARD_USERS_PATH).await
    }

    /// Create an officer/administrator account
    ///
    /// # Returns
    ///
    /// The backend's response body
    ///
    /// # Errors
    ///
    /// Returns error if API request fails (e.g. 400 for a duplicate phone
    /// number)
    #[instrument(skip(self, user), fields(role = %user.role))]
    pub async fn create_dashboard_user(&self, user: &NewDashboardUser) -> Result<Value, ApiError> {
        let response = self.client.post(DASHBOARD_USERS_PATH, user).await?;

        debug!("Dashboard user created");
        Ok(response)
    }

    async fn list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ApiError> {
        let listing: Listing<T> = self.client.get(path).await?;
        let items = listing.into_vec();

        debug!(path = %path, count = items.len(), "Listing fetched");
        Ok(items)
    }
}

fn reports_path(filters: &ReportFilters) -> String {
    let query = filters
        .query_pairs()
        .into_iter()
        .map(|(key, value)| format!("{}={}", key, encode(&value)))
        .collect::<Vec<_>>()
        .join("&");

    if query.is_empty() {
        REPORTS_PATH.to_string()
    } else {
        format!("{}?{}", REPORTS_PATH, query)
    }
}
