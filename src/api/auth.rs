use axum::{
    Json,
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_sessions::Session;

use super::{ApiError, ApiResponse, AppState};
use crate::services::auth_service::{AuthError, CurrentUser};

pub const SESSION_USER_KEY: &str = "user_id";

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub api_key: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
}

impl From<CurrentUser> for MeResponse {
    fn from(user: CurrentUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
        }
    }
}

// ============================================================================
// Middleware
// ============================================================================

/// Authentication middleware that resolves the current user from:
/// 1. Session cookie (from login)
/// 2. `X-Api-Key` header
/// 3. `Authorization: Bearer <api_key>` header
///
/// On success the [`CurrentUser`] lands in the request extensions for
/// downstream handlers and the role gate.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let development_mode = state.development_mode().await;

    // Session first (fastest path for the dashboard)
    if let Ok(Some(user_id)) = session.get::<String>(SESSION_USER_KEY).await
        && let Some(user) = state
            .auth_service()
            .resolve_user(&user_id)
            .await
            .map_err(|e| auth_error(e, development_mode))?
    {
        tracing::Span::current().record("user_id", &user.id);
        request.extensions_mut().insert(user);
        return Ok(next.run(request).await);
    }

    if let Some(key) = extract_api_key(&headers)
        && let Some(user) = state
            .auth_service()
            .resolve_api_key(&key)
            .await
            .map_err(|e| auth_error(e, development_mode))?
    {
        tracing::Span::current().record("user_id", &user.id);
        request.extensions_mut().insert(user);
        return Ok(next.run(request).await);
    }

    Err(ApiError::unauthorized("Authentication required"))
}

/// Role gate for the admin subtree. Runs after [`auth_middleware`], which
/// guarantees the extension is present.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    let Some(user) = request.extensions().get::<CurrentUser>() else {
        return Err(ApiError::unauthorized("Authentication required"));
    };

    if !user.is_admin() {
        return Err(ApiError::Forbidden("Admin access required".to_string()));
    }

    Ok(next.run(request).await)
}

/// Extract API key from headers
fn extract_api_key(headers: &HeaderMap) -> Option<String> {
    if let Some(api_key) = headers.get("X-Api-Key")
        && let Ok(key_str) = api_key.to_str()
    {
        return Some(key_str.to_string());
    }

    if let Some(auth_header) = headers.get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        return Some(token.trim().to_string());
    }

    None
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/auth/login
/// Authenticate with email and password, establishes a session
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    if payload.email.is_empty() {
        return Err(ApiError::validation("Email is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    let development_mode = state.development_mode().await;

    let result = state
        .auth_service()
        .login(&payload.email, &payload.password)
        .await
        .map_err(|e| auth_error(e, development_mode))?;

    session
        .insert(SESSION_USER_KEY, &result.user.id)
        .await
        .map_err(|e| ApiError::upstream("Failed to create session", e, development_mode))?;

    Ok(Json(ApiResponse::success(LoginResponse {
        id: result.user.id,
        email: result.user.email,
        first_name: result.user.first_name,
        last_name: result.user.last_name,
        role: result.user.role,
        api_key: result.api_key,
    })))
}

/// POST /api/auth/logout
/// Invalidate the current session
pub async fn logout(session: Session) -> impl IntoResponse {
    let _ = session.flush().await;
    (StatusCode::OK, "Logged out")
}

/// GET /api/auth/me
/// Get the current session user
pub async fn me(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Json<ApiResponse<MeResponse>>, ApiError> {
    let development_mode = state.development_mode().await;

    let user_id = session
        .get::<String>(SESSION_USER_KEY)
        .await
        .map_err(|e| ApiError::upstream("Session error", e, development_mode))?
        .ok_or_else(|| ApiError::unauthorized("Not authenticated"))?;

    let user = state
        .auth_service()
        .resolve_user(&user_id)
        .await
        .map_err(|e| auth_error(e, development_mode))?
        .ok_or_else(|| ApiError::unauthorized("Not authenticated"))?;

    Ok(Json(ApiResponse::success(MeResponse::from(user))))
}

// ============================================================================
// Helpers
// ============================================================================

fn auth_error(err: AuthError, development_mode: bool) -> ApiError {
    match err {
        AuthError::InvalidCredentials | AuthError::UserNotFound => {
            ApiError::unauthorized("Invalid credentials")
        }
        AuthError::Inactive => ApiError::unauthorized("Account is deactivated"),
        AuthError::Validation(msg) => ApiError::validation(msg),
        AuthError::Database(detail) | AuthError::Internal(detail) => {
            ApiError::upstream("Authentication error", detail, development_mode)
        }
    }
}
