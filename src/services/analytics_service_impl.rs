//! `SeaORM` implementation of the `AnalyticsService` trait.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::collections::HashMap;

use crate::constants::{ACTIVITY_EVENT_TYPES, INGEST_EVENT_TYPES, RECOGNIZED_ROLES, limits, windows};
use crate::db::{NewEvent, Store};
use crate::services::analytics_service::{
    ActivityEntry, AnalyticsError, AnalyticsService, EventInput, PlanBreakdown, UserSummary,
};

pub struct SeaOrmAnalyticsService {
    store: Store,
}

impl SeaOrmAnalyticsService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AnalyticsService for SeaOrmAnalyticsService {
    async fn user_summary(&self) -> Result<UserSummary, AnalyticsError> {
        let now = Utc::now();
        let new_user_cutoff = (now - Duration::days(windows::NEW_USER_DAYS)).to_rfc3339();
        let active_user_cutoff = (now - Duration::days(windows::ACTIVE_USER_DAYS)).to_rfc3339();

        // Independent point-in-time reads; no ordering between them, and the
        // first rejection aborts the join.
        let (total_users, new_users_last_7_days, active_users, roles) = futures::try_join!(
            self.store.count_users(),
            self.store.count_users_created_since(&new_user_cutoff),
            self.store.count_users_active_since(&active_user_cutoff),
            self.store.count_users_by_role(),
        )?;

        Ok(UserSummary {
            total_users,
            new_users_last_7_days,
            active_users,
            users_by_plan: plan_breakdown(&roles),
        })
    }

    async fn recent_activity(&self) -> Result<Vec<ActivityEntry>, AnalyticsError> {
        let since = (Utc::now() - Duration::days(windows::NEW_USER_DAYS)).to_rfc3339();

        let rows = self
            .store
            .recent_events_joined(ACTIVITY_EVENT_TYPES, &since, limits::RECENT_ACTIVITY)
            .await?;

        let entries = rows
            .into_iter()
            .filter_map(|(event, user)| {
                let user = user?;
                Some(ActivityEntry {
                    event_type: event.event_type,
                    user_id: user.id,
                    user_name: format!("{} {}", user.first_name, user.last_name),
                    user_email: user.email,
                    timestamp: event.created_at,
                    product_id: event.product_id,
                    order_id: event.order_id,
                    amount: event.amount,
                })
            })
            .collect();

        Ok(entries)
    }

    async fn record_event(&self, event: EventInput) -> Result<(), AnalyticsError> {
        if !INGEST_EVENT_TYPES.contains(&event.event_type.as_str()) {
            return Err(AnalyticsError::Validation(format!(
                "Unknown event type: {}",
                event.event_type
            )));
        }

        self.store
            .add_event(NewEvent {
                event_type: event.event_type,
                user_id: event.user_id,
                product_id: event.product_id,
                order_id: event.order_id,
                amount: event.amount,
            })
            .await?;

        Ok(())
    }
}

/// Reshapes the sparse `(role, count)` distribution into the dense plan
/// buckets, seeding every recognized role with zero first.
///
/// The role→plan correspondence (customer→free, driver→premium,
/// admin→enterprise) is an intentionally arbitrary business mapping: nothing
/// structural links a role to its plan name, the pairs were fixed when the
/// billing overlay was bolted onto the dashboard. Unrecognized roles are
/// ignored here; they still show up in the total user count.
fn plan_breakdown(roles: &[(String, i64)]) -> PlanBreakdown {
    let mut counts: HashMap<&str, i64> = RECOGNIZED_ROLES.iter().map(|role| (*role, 0)).collect();

    for (role, count) in roles {
        if let Some(slot) = counts.get_mut(role.as_str()) {
            *slot = *count;
        }
    }

    let bucket = |role: &str| u64::try_from(counts[role]).unwrap_or(0);

    PlanBreakdown {
        free: bucket("customer"),
        premium: bucket("driver"),
        enterprise: bucket("admin"),
    }
}
