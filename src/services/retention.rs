//! Background pruning of old analytics events.
//!
//! The event log is append-only; without retention it grows without bound.
//! Runs on a fixed interval by default, or on a cron expression when one is
//! configured.

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::{Duration, interval};
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

use crate::config::RetentionConfig;
use crate::db::Store;

pub struct RetentionService {
    store: Store,
    config: RetentionConfig,
    running: Arc<RwLock<bool>>,
}

impl RetentionService {
    #[must_use]
    pub fn new(store: Store, config: RetentionConfig) -> Self {
        Self {
            store,
            config,
            running: Arc::new(RwLock::new(false)),
        }
    }

    /// Prunes events older than the retention window once. Returns the
    /// number of deleted rows.
    pub async fn run_once(&self) -> Result<u64> {
        prune_events(&self.store, self.config.events_retention_days).await
    }

    pub async fn stop(&self) {
        *self.running.write().await = false;
    }

    /// Runs the retention loop until [`Self::stop`] is called.
    pub async fn start(&self) -> Result<()> {
        if !self.config.enabled {
            info!("Event retention disabled");
            return Ok(());
        }

        *self.running.write().await = true;

        if let Some(cron_expr) = self.config.cron_expression.clone() {
            self.run_with_cron(&cron_expr).await
        } else {
            self.run_with_interval().await
        }
    }

    async fn run_with_cron(&self, cron_expr: &str) -> Result<()> {
        let mut sched = JobScheduler::new().await?;

        let store = self.store.clone();
        let retention_days = self.config.events_retention_days;

        let job = Job::new_async(cron_expr, move |_uuid, _lock| {
            let store = store.clone();
            Box::pin(async move {
                if let Err(e) = prune_events(&store, retention_days).await {
                    error!("Scheduled event prune failed: {}", e);
                }
            })
        })?;

        sched.add(job).await?;
        sched.start().await?;

        info!("Event retention running with cron: {}", cron_expr);

        loop {
            if !*self.running.read().await {
                break;
            }
            tokio::time::sleep(Duration::from_secs(1)).await;
        }

        sched.shutdown().await?;
        Ok(())
    }

    async fn run_with_interval(&self) -> Result<()> {
        let hours = u64::from(self.config.prune_interval_hours.max(1));

        info!("Event retention running every {} hours", hours);

        let mut ticker = interval(Duration::from_secs(hours * 60 * 60));

        loop {
            ticker.tick().await;
            if !*self.running.read().await {
                break;
            }
            if let Err(e) = prune_events(&self.store, self.config.events_retention_days).await {
                error!("Scheduled event prune failed: {}", e);
            }
        }

        Ok(())
    }
}

async fn prune_events(store: &Store, retention_days: u32) -> Result<u64> {
    let cutoff =
        (chrono::Utc::now() - chrono::Duration::days(i64::from(retention_days))).to_rfc3339();

    let pruned = store.prune_events_older_than(&cutoff).await?;

    if pruned > 0 {
        info!(pruned, retention_days, "Pruned old analytics events");
    }

    Ok(pruned)
}
