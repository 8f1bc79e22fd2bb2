//! `SeaORM` implementation of the `AuthService` trait.

use async_trait::async_trait;

use crate::db::{NewEvent, Store};
use crate::entities::users;
use crate::services::auth_service::{AuthError, AuthService, CurrentUser, LoginResult};

pub struct SeaOrmAuthService {
    store: Store,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    fn current_user(model: users::Model) -> CurrentUser {
        CurrentUser {
            id: model.id,
            email: model.email,
            first_name: model.first_name,
            last_name: model.last_name,
            role: model.role,
        }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResult, AuthError> {
        let is_valid = self.store.verify_user_password(email, password).await?;

        if !is_valid {
            return Err(AuthError::InvalidCredentials);
        }

        let user = self
            .store
            .get_user_by_email(email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !user.is_active {
            return Err(AuthError::Inactive);
        }

        self.store.record_user_login(&user.id).await?;

        // Telemetry write; a failure here must not fail the login.
        if let Err(e) = self
            .store
            .add_event(NewEvent {
                event_type: "login".to_string(),
                user_id: Some(user.id.clone()),
                product_id: None,
                order_id: None,
                amount: None,
            })
            .await
        {
            tracing::warn!(error = %e, "Failed to record login event");
        }

        let api_key = user.api_key.clone();

        Ok(LoginResult {
            user: Self::current_user(user),
            api_key,
        })
    }

    async fn resolve_api_key(&self, api_key: &str) -> Result<Option<CurrentUser>, AuthError> {
        let user = self.store.verify_api_key(api_key).await?;

        Ok(user.filter(|u| u.is_active).map(Self::current_user))
    }

    async fn resolve_user(&self, id: &str) -> Result<Option<CurrentUser>, AuthError> {
        let user = self.store.get_user_by_id(id).await?;

        Ok(user.filter(|u| u.is_active).map(Self::current_user))
    }
}
