//! Domain service for the admin analytics dashboard and event ingestion.

use serde::Serialize;
use thiserror::Error;

/// Errors specific to analytics operations.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for AnalyticsError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AnalyticsError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Per-plan user counts. The buckets are derived from recognized roles;
/// their sum can be below the total when unrecognized roles exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlanBreakdown {
    pub free: u64,
    pub premium: u64,
    pub enterprise: u64,
}

/// Summary counters for the admin dashboard, computed on demand.
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub total_users: u64,
    pub new_users_last_7_days: u64,
    pub active_users: u64,
    pub users_by_plan: PlanBreakdown,
}

/// One denormalized row of the recent-activity feed.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityEntry {
    pub event_type: String,
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
    pub timestamp: String,
    pub product_id: Option<String>,
    pub order_id: Option<String>,
    pub amount: Option<f64>,
}

/// Input for event ingestion.
#[derive(Debug, Clone)]
pub struct EventInput {
    pub event_type: String,
    pub user_id: Option<String>,
    pub product_id: Option<String>,
    pub order_id: Option<String>,
    pub amount: Option<f64>,
}

/// Domain service trait for analytics reads and event ingestion.
#[async_trait::async_trait]
pub trait AnalyticsService: Send + Sync {
    /// Computes the dashboard summary. The underlying counts run
    /// concurrently; the first failing query fails the whole operation.
    async fn user_summary(&self) -> Result<UserSummary, AnalyticsError>;

    /// Most recent recognized events within the feed window, newest first,
    /// joined to their users. Events whose user no longer resolves are
    /// dropped.
    async fn recent_activity(&self) -> Result<Vec<ActivityEntry>, AnalyticsError>;

    /// Appends an immutable event row.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::Validation`] for unknown event types.
    async fn record_event(&self, event: EventInput) -> Result<(), AnalyticsError>;
}
