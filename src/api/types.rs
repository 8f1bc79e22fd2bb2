use serde::Serialize;

use crate::entities::users;
use crate::services::analytics_service::{ActivityEntry, PlanBreakdown};
use crate::services::user_admin_service::{Pagination, StatusChange};

/// Uniform response envelope. Error responses carry `message`, and `error`
/// holds raw detail only when the server runs in development mode.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
        }
    }

    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>, detail: Option<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
            error: detail,
        }
    }
}

/// User item in admin list responses. The sensitive columns (password hash,
/// API key, verification and reset tokens) have no field here at all, so
/// they cannot leak through serialization.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    /// Kept as `_id` on the wire for the existing dashboard contract.
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role: String,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<users::Model> for UserDto {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            first_name: model.first_name,
            last_name: model.last_name,
            phone: model.phone,
            role: model.role,
            is_active: model.is_active,
            last_login: model.last_login,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// `GET /api/admin/users` response: envelope plus the pagination block.
#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub success: bool,
    pub data: Vec<UserDto>,
    pub pagination: Pagination,
}

/// `GET /api/admin/analytics/users` payload. Sent bare, without the
/// `{success, data}` envelope: the dashboard consumes the summary object
/// directly.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAnalyticsDto {
    pub total_users: u64,
    pub new_users_last_7_days: u64,
    pub active_users: u64,
    pub users_by_plan: PlanBreakdown,
    pub recent_activity: Vec<ActivityEntryDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntryDto {
    #[serde(rename = "type")]
    pub event_type: String,
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
}

impl From<ActivityEntry> for ActivityEntryDto {
    fn from(entry: ActivityEntry) -> Self {
        Self {
            event_type: entry.event_type,
            user_id: entry.user_id,
            user_name: entry.user_name,
            user_email: entry.user_email,
            timestamp: entry.timestamp,
            product_id: entry.product_id,
            order_id: entry.order_id,
            amount: entry.amount,
        }
    }
}

/// Minimal fields returned by the status toggle; never the full document.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChangeDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub is_active: bool,
}

impl From<StatusChange> for StatusChangeDto {
    fn from(change: StatusChange) -> Self {
        Self {
            id: change.id,
            email: change.email,
            is_active: change.is_active,
        }
    }
}
