//! Public analytics-event ingestion.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::auth::SESSION_USER_KEY;
use super::{ApiError, ApiResponse, AppState};
use crate::services::analytics_service::{AnalyticsError, EventInput};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestEventRequest {
    #[serde(rename = "type")]
    pub event_type: String,
    pub user_id: Option<String>,
    pub product_id: Option<String>,
    pub order_id: Option<String>,
    pub amount: Option<f64>,
}

/// Appends an analytics event.
///
/// # Endpoint
/// `POST /api/analytics/events`
///
/// Authentication is optional: a session identity, when present, overrides
/// any caller-supplied `userId`.
///
/// # Errors
/// Returns [`ApiError::ValidationError`] for unknown event types.
pub async fn ingest_event(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<IngestEventRequest>,
) -> Result<(StatusCode, Json<ApiResponse<()>>), ApiError> {
    let development_mode = state.development_mode().await;

    let session_user = session.get::<String>(SESSION_USER_KEY).await.ok().flatten();

    let user_id = session_user.or(payload.user_id);

    state
        .analytics_service()
        .record_event(EventInput {
            event_type: payload.event_type,
            user_id,
            product_id: payload.product_id,
            order_id: payload.order_id,
            amount: payload.amount,
        })
        .await
        .map_err(|e| match e {
            AnalyticsError::Validation(msg) => ApiError::validation(msg),
            AnalyticsError::Database(detail) => {
                ApiError::upstream("Error recording event", detail, development_mode)
            }
        })?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(()))))
}
