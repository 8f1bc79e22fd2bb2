//! Domain service for authentication.
//!
//! Handles login, API-key resolution, and current-user lookup. The admin
//! role gate sits in the API layer; this service only establishes identity.

use serde::Serialize;
use thiserror::Error;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account is deactivated")]
    Inactive,

    #[error("User not found")]
    UserNotFound,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// The authenticated identity attached to a request.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUser {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
}

impl CurrentUser {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

/// Login result containing the user and their API key.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    pub user: CurrentUser,
    pub api_key: String,
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Verifies credentials, refuses deactivated accounts, stamps
    /// `last_login`, and appends a `login` analytics event.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if login fails and
    /// [`AuthError::Inactive`] for deactivated accounts.
    async fn login(&self, email: &str, password: &str) -> Result<LoginResult, AuthError>;

    /// Resolves an API key to its active user, if any.
    async fn resolve_api_key(&self, api_key: &str) -> Result<Option<CurrentUser>, AuthError>;

    /// Resolves a stored session user id to its active user, if any.
    /// Deactivated accounts resolve to `None` so stale sessions die.
    async fn resolve_user(&self, id: &str) -> Result<Option<CurrentUser>, AuthError>;
}
