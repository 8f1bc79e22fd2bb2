//! Admin reporting endpoints: analytics summary, user listing, status toggle.
//!
//! Handlers only do HTTP/JSON mapping; aggregation and filtering live in
//! [`AnalyticsService`] and [`UserAdminService`]. Everything here sits
//! behind the auth and admin-role middlewares.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use std::sync::Arc;

use super::types::{StatusChangeDto, UserAnalyticsDto, UserDto, UserListResponse};
use super::validation::{ListUsersQuery, parse_list_query};
use super::{ApiError, ApiResponse, AppState};
use crate::services::analytics_service::AnalyticsError;
use crate::services::auth_service::CurrentUser;
use crate::services::user_admin_service::UserAdminError;

/// Returns the user analytics summary for the admin dashboard.
///
/// # Endpoint
/// `GET /api/admin/analytics/users`
///
/// The payload is the bare summary object (no envelope); the dashboard
/// consumes it directly. Its `recentActivity` field is always empty for
/// now — see the note in the handler body.
pub async fn get_user_analytics(
    State(state): State<Arc<AppState>>,
) -> Result<Json<UserAnalyticsDto>, ApiError> {
    let development_mode = state.development_mode().await;

    let summary = state
        .analytics_service()
        .user_summary()
        .await
        .map_err(|e| analytics_error(e, "Error fetching user analytics", development_mode))?;

    let activity = state
        .analytics_service()
        .recent_activity()
        .await
        .map_err(|e| analytics_error(e, "Error fetching user analytics", development_mode))?;

    // The feed is computed but not yet part of the public payload; the
    // dashboard contract reports an empty list.
    // TODO: thread `activity` into `recent_activity` once the dashboard
    // widget consumes it.
    tracing::debug!(entries = activity.len(), "Computed recent activity feed");

    Ok(Json(UserAnalyticsDto {
        total_users: summary.total_users,
        new_users_last_7_days: summary.new_users_last_7_days,
        active_users: summary.active_users,
        users_by_plan: summary.users_by_plan,
        recent_activity: Vec::new(),
    }))
}

/// Returns a filtered, paginated user listing.
///
/// # Endpoint
/// `GET /api/admin/users`
///
/// # Query Parameters
/// - `page`, `limit`: 1-based pagination (defaults 1 / 10)
/// - `search`: case-insensitive substring over name, email, phone
/// - `role`: exact role match
/// - `isActive`: literal `true` / `false`
///
/// # Errors
/// Returns [`ApiError::ValidationError`] for malformed query input.
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<UserListResponse>, ApiError> {
    let development_mode = state.development_mode().await;

    let filter = parse_list_query(query)?;

    let page = state
        .user_admin_service()
        .list_users(filter)
        .await
        .map_err(|e| admin_error(e, "Error fetching users", development_mode))?;

    Ok(Json(UserListResponse {
        success: true,
        data: page.users.into_iter().map(UserDto::from).collect(),
        pagination: page.pagination,
    }))
}

/// Activates or deactivates a single user.
///
/// # Endpoint
/// `PATCH /api/admin/users/{user_id}/status`
///
/// # Errors
/// - 400 when `isActive` is missing or not a boolean, or when the caller
///   targets their own account
/// - 404 when the id does not resolve (nothing is mutated)
pub async fn update_user_status(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Extension(current_user): Extension<CurrentUser>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<ApiResponse<StatusChangeDto>>, ApiError> {
    // Validated by hand so the message contract survives any body shape.
    let Some(is_active) = body.get("isActive").and_then(serde_json::Value::as_bool) else {
        return Err(ApiError::validation("isActive must be a boolean value"));
    };

    let development_mode = state.development_mode().await;

    let change = state
        .user_admin_service()
        .set_user_status(&current_user.id, &user_id, is_active)
        .await
        .map_err(|e| admin_error(e, "Error updating user status", development_mode))?;

    let message = format!(
        "User {} successfully",
        if is_active { "activated" } else { "deactivated" }
    );

    Ok(Json(ApiResponse::success_with_message(
        StatusChangeDto::from(change),
        message,
    )))
}

fn analytics_error(err: AnalyticsError, context: &str, development_mode: bool) -> ApiError {
    match err {
        AnalyticsError::Validation(msg) => ApiError::validation(msg),
        AnalyticsError::Database(detail) => ApiError::upstream(context, detail, development_mode),
    }
}

fn admin_error(err: UserAdminError, context: &str, development_mode: bool) -> ApiError {
    match err {
        UserAdminError::NotFound => ApiError::not_found("User not found"),
        UserAdminError::OwnStatus => {
            ApiError::SelfAction("Cannot update your own status".to_string())
        }
        UserAdminError::Validation(msg) => ApiError::validation(msg),
        UserAdminError::Database(detail) => ApiError::upstream(context, detail, development_mode),
    }
}
