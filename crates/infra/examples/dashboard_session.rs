//! Example: resuming an officer session and printing the overview
//!
//! Loads configuration the same way the dashboard does, restores the stored
//! session (or signs in with `SKIKA_PHONE` / `SKIKA_PASSWORD`), then prints
//! the headline counters and project budget progress.
//!
//! ```bash
//! SKIKA_API_BASE_URL=http://127.0.0.1:8000/api \
//! SKIKA_PHONE=0712345678 SKIKA_PASSWORD=secret \
//!     cargo run -p skika-infra --example dashboard_session
//! ```

use anyhow::{bail, Context};
use skika_domain::analytics::{project_progress, stat_entries, FeedbackSummary};
use skika_domain::constants::PROJECT_PROGRESS_LIMIT;
use skika_infra::observability::{init_tracing, LogFormat};
use skika_infra::{config, ApiClient, ApiClientConfig, AuthSession, DashboardApi};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing(LogFormat::Pretty);

    let config = config::load().context("failed to load configuration")?;
    let store = config::build_session_store(&config.storage)?;
    let client = ApiClient::new(ApiClientConfig::from(&config.api), store)?;
    let session = AuthSession::new(client.clone()).with_login_path(config.api.login_path.clone());

    if !session.restore().await? {
        let (Ok(phone), Ok(password)) =
            (std::env::var("SKIKA_PHONE"), std::env::var("SKIKA_PASSWORD"))
        else {
            bail!("no stored session; set SKIKA_PHONE and SKIKA_PASSWORD to sign in");
        };
        session.login(&phone, &password).await.map_err(|e| anyhow::anyhow!(e.message()))?;
    }

    if let Some(user) = session.current_user() {
        println!("Signed in as {}", user.display_name());
    }

    let api = DashboardApi::new(client);
    let stats = api.dashboard_stats().await.map_err(|e| anyhow::anyhow!(e.message()))?;

    println!("\nReports: {}", stats.reports.total);
    for (label, count) in stat_entries(&stats.reports.by_status_en) {
        println!("  {:<20} {}", label, count);
    }
    println!("Citizens: {}  Projects: {}  Wards: {}", stats.citizens, stats.projects, stats.wards);

    let projects = api.list_projects().await?;
    println!("\nProject budget progress:");
    for row in project_progress(&projects, PROJECT_PROGRESS_LIMIT) {
        println!("  {:<12} {:>3}%  of {:.0}", row.project_code, row.progress_pct, row.budget);
    }

    let feedback = api.list_feedback().await?;
    let summary = FeedbackSummary::from_feedback(&feedback);
    println!(
        "\nFeedback: {} responses, average {:.1}, sentiment {}",
        summary.total,
        summary.average_rating,
        summary.label.as_str()
    );

    Ok(())
}
