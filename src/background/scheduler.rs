//! Cron-driven wrapper around the daily scan.
//!
//! The scheduler owns nothing but the timer: each firing reads the local
//! calendar date and hands it to [`run_daily_scan`] together with the shared
//! database handle and notification channel. The cron expression is evaluated
//! in UTC.

use std::sync::Arc;

use chrono::Local;
use sea_orm::DatabaseConnection;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::info;

use crate::{
    config::AppConfig,
    core::scan::run_daily_scan,
    errors::Result,
    notify::NotificationChannel,
};

/// Runs the daily notification scan on a fixed time-of-day schedule.
pub struct NotifyScheduler {
    scheduler: JobScheduler,
}

impl NotifyScheduler {
    /// Registers the daily job and starts the scheduler.
    ///
    /// The job fires once per day at the configured hour and minute (UTC) and
    /// scans with that moment's local calendar date. Scan failures are logged;
    /// the schedule keeps running.
    pub async fn new(
        db: DatabaseConnection,
        channel: Arc<dyn NotificationChannel>,
        config: &AppConfig,
    ) -> Result<Self> {
        let scheduler = JobScheduler::new().await?;

        let cron = format!(
            "0 {} {} * * *",
            config.scheduler.minute, config.scheduler.hour
        );
        let default_server = config.notify.default_server.clone();

        // DatabaseConnection is only Clone without sea-orm's mock feature, so
        // the job shares the handle through an Arc like it does the channel.
        let db = Arc::new(db);
        let job = Job::new_async(cron.as_str(), move |_uuid, _lock| {
            let db = Arc::clone(&db);
            let channel = Arc::clone(&channel);
            let default_server = default_server.clone();
            Box::pin(async move {
                let today = Local::now().date_naive();
                info!(%today, "daily scan starting");
                if let Err(err) =
                    run_daily_scan(&db, channel.as_ref(), &default_server, today).await
                {
                    tracing::error!("daily scan failed: {err}");
                }
            })
        })?;
        scheduler.add(job).await?;

        scheduler.start().await?;
        info!(schedule = %cron, "notification scheduler started");

        Ok(Self { scheduler })
    }

    /// Stops the timer. In-flight scan items finish on their own.
    pub async fn shutdown(&mut self) {
        if let Err(err) = self.scheduler.shutdown().await {
            tracing::warn!("scheduler shutdown failed: {err}");
        }
        info!("notification scheduler stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_scheduler_starts_and_stops() -> Result<()> {
        let db = setup_test_db().await?;
        let channel = Arc::new(RecordingChannel::default());

        let mut scheduler = NotifyScheduler::new(db, channel, &AppConfig::default()).await?;
        scheduler.shutdown().await;

        Ok(())
    }
}
