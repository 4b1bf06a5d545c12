//! Dashboard resource types
//!
//! Wire shapes of the resources the officer dashboard reads and writes.
//! Unknown fields are ignored so backend additions never break a page.

pub mod admin;
pub mod feedback;
pub mod listing;
pub mod project;
pub mod report;
pub mod stats;
pub mod user;

pub use admin::{AuditLog, DashboardUser, NewDashboardUser, Ward};
pub use feedback::Feedback;
pub use listing::Listing;
pub use project::Project;
pub use report::{Report, ReportCategory, ReportFilters, ReportStatus, StatusUpdate};
pub use stats::{DashboardStats, ReportStats};
pub use user::OfficerProfile;
