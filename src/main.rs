//! Binary entry point: initializes logging and the database, loads the
//! tracker and logs a dashboard summary.

use dotenvy::dotenv;
use habitzen::config;
use habitzen::core::sync::HabitTracker;
use habitzen::db::SqliteStore;
use habitzen::errors::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (non-fatal, env vars can be set externally)
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Initialize the database and schema
    let db = config::database::create_connection().await?;
    config::database::create_tables(&db).await?;
    info!("Database initialized successfully.");

    // 4. Load tracker state through the storage port
    let store = Arc::new(SqliteStore::new(db));
    let mut tracker = HabitTracker::new(store);
    tracker.load().await?;

    // 5. Log the dashboard summary
    let now = chrono::Utc::now();
    let stats = tracker.overall_stats(now.date_naive());
    info!(
        habits = stats.total_habits,
        completions = stats.total_completions,
        points = stats.total_points,
        level = stats.user_level,
        success_rate = stats.success_rate,
        current_streak = stats.current_overall_streak,
        longest_streak = stats.longest_overall_streak,
        "dashboard summary"
    );
    for medal in tracker.achieved_medals(now.timestamp_millis()) {
        info!(medal = medal.definition.name, group = medal.definition.group, "medal achieved");
    }

    Ok(())
}
