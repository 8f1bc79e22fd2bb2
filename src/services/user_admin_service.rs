//! Domain service for the admin user listing and status mutation.

use serde::Serialize;
use thiserror::Error;

use crate::constants::limits;
use crate::entities::users;

/// Errors specific to admin user management.
#[derive(Debug, Error)]
pub enum UserAdminError {
    #[error("User not found")]
    NotFound,

    /// Self-deactivation guard: a business rule, not a system fault.
    #[error("Cannot update your own status")]
    OwnStatus,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for UserAdminError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for UserAdminError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Validated listing filter. Built by the API layer's query parsing;
/// everything here is already typed and range-checked.
#[derive(Debug, Clone)]
pub struct UserListFilter {
    /// 1-based page number.
    pub page: u64,
    pub limit: u64,
    pub search: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

impl Default for UserListFilter {
    fn default() -> Self {
        Self {
            page: 1,
            limit: limits::DEFAULT_PAGE_SIZE,
            search: None,
            role: None,
            is_active: None,
        }
    }
}

/// Pagination metadata accompanying a result slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub pages: u64,
}

impl Pagination {
    /// `pages` is derived, never stored: `ceil(total / limit)`.
    #[must_use]
    pub fn new(page: u64, limit: u64, total: u64) -> Self {
        Self {
            page,
            limit,
            total,
            pages: total.div_ceil(limit.max(1)),
        }
    }
}

/// One page of users plus its pagination envelope.
#[derive(Debug)]
pub struct UserPage {
    pub users: Vec<users::Model>,
    pub pagination: Pagination,
}

/// Minimal result of a status toggle; never the full document.
#[derive(Debug, Clone, Serialize)]
pub struct StatusChange {
    pub id: String,
    pub email: String,
    pub is_active: bool,
}

/// Domain service trait for admin user management.
#[async_trait::async_trait]
pub trait UserAdminService: Send + Sync {
    /// Returns a page of users matching the filter, newest first, with
    /// pagination metadata computed over the same predicate.
    async fn list_users(&self, filter: UserListFilter) -> Result<UserPage, UserAdminError>;

    /// Sets a user's activation flag.
    ///
    /// # Errors
    ///
    /// [`UserAdminError::OwnStatus`] when the actor targets themselves,
    /// [`UserAdminError::NotFound`] when the id does not resolve.
    async fn set_user_status(
        &self,
        actor_id: &str,
        target_id: &str,
        is_active: bool,
    ) -> Result<StatusChange, UserAdminError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_rounds_pages_up() {
        assert_eq!(Pagination::new(1, 10, 25).pages, 3);
        assert_eq!(Pagination::new(1, 10, 30).pages, 3);
        assert_eq!(Pagination::new(1, 10, 31).pages, 4);
        assert_eq!(Pagination::new(1, 7, 1).pages, 1);
    }

    #[test]
    fn test_pagination_zero_total_has_zero_pages() {
        assert_eq!(Pagination::new(1, 10, 0).pages, 0);
    }
}
