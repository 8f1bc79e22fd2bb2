//! `SeaORM` implementation of the `UserAdminService` trait.

use async_trait::async_trait;

use crate::db::Store;
use crate::services::user_admin_service::{
    Pagination, StatusChange, UserAdminError, UserAdminService, UserListFilter, UserPage,
};

pub struct SeaOrmUserAdminService {
    store: Store,
}

impl SeaOrmUserAdminService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UserAdminService for SeaOrmUserAdminService {
    async fn list_users(&self, filter: UserListFilter) -> Result<UserPage, UserAdminError> {
        if filter.page == 0 || filter.limit == 0 {
            return Err(UserAdminError::Validation(
                "page and limit must be >= 1".to_string(),
            ));
        }

        // Count and slice share the predicate but not a transaction; both
        // are point-in-time reads, which is fine for an admin dashboard.
        let (total, users) = futures::try_join!(
            self.store.count_users_matching(&filter),
            self.store.list_users_page(&filter),
        )?;

        Ok(UserPage {
            users,
            pagination: Pagination::new(filter.page, filter.limit, total),
        })
    }

    async fn set_user_status(
        &self,
        actor_id: &str,
        target_id: &str,
        is_active: bool,
    ) -> Result<StatusChange, UserAdminError> {
        if actor_id == target_id {
            return Err(UserAdminError::OwnStatus);
        }

        let updated = self
            .store
            .set_user_active(target_id, is_active)
            .await?
            .ok_or(UserAdminError::NotFound)?;

        Ok(StatusChange {
            id: updated.id,
            email: updated.email,
            is_active: updated.is_active,
        })
    }
}
