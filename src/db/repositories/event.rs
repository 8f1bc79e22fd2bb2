use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::entities::{analytics_events, users};

/// Input for appending an analytics event. `created_at` is stamped here;
/// events are immutable once written.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub event_type: String,
    pub user_id: Option<String>,
    pub product_id: Option<String>,
    pub order_id: Option<String>,
    pub amount: Option<f64>,
}

pub struct EventRepository {
    conn: DatabaseConnection,
}

impl EventRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn add(&self, event: NewEvent) -> Result<analytics_events::Model> {
        let model = analytics_events::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            event_type: Set(event.event_type),
            user_id: Set(event.user_id),
            product_id: Set(event.product_id),
            order_id: Set(event.order_id),
            amount: Set(event.amount),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
        };

        let inserted = model
            .insert(&self.conn)
            .await
            .context("Failed to insert analytics event")?;

        Ok(inserted)
    }

    /// Windowed events of the given types, newest first, each paired with
    /// its user row when the reference resolves. Callers drop the `None`
    /// pairs (inner-join semantics).
    pub async fn recent_joined(
        &self,
        event_types: &[&str],
        since: &str,
        limit: u64,
    ) -> Result<Vec<(analytics_events::Model, Option<users::Model>)>> {
        analytics_events::Entity::find()
            .filter(analytics_events::Column::EventType.is_in(event_types.iter().copied()))
            .filter(analytics_events::Column::CreatedAt.gte(since))
            .find_also_related(users::Entity)
            // Join misses must drop before the cap, not eat into it
            .filter(users::Column::Id.is_not_null())
            .order_by_desc(analytics_events::Column::CreatedAt)
            .limit(limit)
            .all(&self.conn)
            .await
            .context("Failed to fetch recent activity")
    }

    /// Deletes events created before the cutoff. Returns the row count.
    pub async fn prune_older_than(&self, cutoff: &str) -> Result<u64> {
        let result = analytics_events::Entity::delete_many()
            .filter(analytics_events::Column::CreatedAt.lt(cutoff))
            .exec(&self.conn)
            .await
            .context("Failed to prune analytics events")?;

        Ok(result.rows_affected)
    }
}
