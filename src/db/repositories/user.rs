use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use tokio::task;

use crate::config::SecurityConfig;
use crate::entities::users;
use crate::services::user_admin_service::UserListFilter;

/// Input for creating a user account (bootstrap CLI and tests).
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub role: String,
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn count_all(&self) -> Result<u64> {
        users::Entity::find()
            .count(&self.conn)
            .await
            .context("Failed to count users")
    }

    /// Users created on or after the cutoff (RFC 3339; string order is time order).
    pub async fn count_created_since(&self, cutoff: &str) -> Result<u64> {
        users::Entity::find()
            .filter(users::Column::CreatedAt.gte(cutoff))
            .count(&self.conn)
            .await
            .context("Failed to count new users")
    }

    /// Users whose last login is on or after the cutoff. Accounts that never
    /// logged in have a NULL `last_login` and fall out of the comparison.
    pub async fn count_active_since(&self, cutoff: &str) -> Result<u64> {
        users::Entity::find()
            .filter(users::Column::LastLogin.gte(cutoff))
            .count(&self.conn)
            .await
            .context("Failed to count active users")
    }

    /// Sparse `(role, count)` distribution over all users. Roles with zero
    /// members simply don't appear; callers seed the groups they care about.
    pub async fn count_by_role(&self) -> Result<Vec<(String, i64)>> {
        users::Entity::find()
            .select_only()
            .column(users::Column::Role)
            .column_as(users::Column::Id.count(), "count")
            .group_by(users::Column::Role)
            .into_tuple::<(String, i64)>()
            .all(&self.conn)
            .await
            .context("Failed to group users by role")
    }

    /// One page of the filtered listing, newest accounts first.
    pub async fn find_page(&self, filter: &UserListFilter) -> Result<Vec<users::Model>> {
        let offset = (filter.page - 1) * filter.limit;

        users::Entity::find()
            .filter(Self::filter_condition(filter))
            .order_by_desc(users::Column::CreatedAt)
            .offset(offset)
            .limit(filter.limit)
            .all(&self.conn)
            .await
            .context("Failed to fetch user page")
    }

    /// Total match count for the same predicate as [`Self::find_page`].
    pub async fn count_matching(&self, filter: &UserListFilter) -> Result<u64> {
        users::Entity::find()
            .filter(Self::filter_condition(filter))
            .count(&self.conn)
            .await
            .context("Failed to count matching users")
    }

    fn filter_condition(filter: &UserListFilter) -> Condition {
        let mut condition = Condition::all();

        // Substring OR across the identity fields, AND with the rest.
        // sqlite LIKE is ASCII case-insensitive, matching the original
        // case-insensitive search contract.
        if let Some(term) = &filter.search {
            condition = condition.add(
                Condition::any()
                    .add(users::Column::FirstName.contains(term.as_str()))
                    .add(users::Column::LastName.contains(term.as_str()))
                    .add(users::Column::Email.contains(term.as_str()))
                    .add(users::Column::Phone.contains(term.as_str())),
            );
        }

        if let Some(role) = &filter.role {
            condition = condition.add(users::Column::Role.eq(role.as_str()));
        }

        if let Some(is_active) = filter.is_active {
            condition = condition.add(users::Column::IsActive.eq(is_active));
        }

        condition
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<users::Model>> {
        users::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<users::Model>> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query user by email")
    }

    /// Flips the activation flag. Returns the updated row, or `None` when
    /// the id does not resolve (no mutation happens in that case).
    pub async fn set_active(&self, id: &str, is_active: bool) -> Result<Option<users::Model>> {
        let Some(user) = self.get_by_id(id).await? else {
            return Ok(None);
        };

        let mut active: users::ActiveModel = user.into();
        active.is_active = Set(is_active);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        let updated = active.update(&self.conn).await?;

        Ok(Some(updated))
    }

    /// Verify password for a user.
    /// Note: This uses `spawn_blocking` because Argon2 hashing is CPU-intensive
    /// and would block the async runtime if run directly.
    pub async fn verify_password(&self, email: &str, password: &str) -> Result<bool> {
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query user for password verification")?;

        let Some(user) = user else {
            return Ok(false);
        };

        let password_hash = user.password_hash;
        let password = password.to_string();

        let is_valid = task::spawn_blocking(move || {
            let parsed_hash = PasswordHash::new(&password_hash)
                .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

            let argon2 = Argon2::default();
            Ok::<bool, anyhow::Error>(
                argon2
                    .verify_password(password.as_bytes(), &parsed_hash)
                    .is_ok(),
            )
        })
        .await
        .context("Password verification task panicked")??;

        Ok(is_valid)
    }

    /// Verify API key and return the associated user
    pub async fn verify_api_key(&self, api_key: &str) -> Result<Option<users::Model>> {
        let user = users::Entity::find()
            .filter(users::Column::ApiKey.eq(api_key))
            .one(&self.conn)
            .await
            .context("Failed to query user by API key")?;

        Ok(user)
    }

    /// Stamps `last_login` with the current time.
    pub async fn record_login(&self, id: &str) -> Result<()> {
        let user = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("User not found: {id}"))?;

        let now = chrono::Utc::now().to_rfc3339();

        let mut active: users::ActiveModel = user.into();
        active.last_login = Set(Some(now.clone()));
        active.updated_at = Set(now);
        active.update(&self.conn).await?;

        Ok(())
    }

    /// Creates an account with a hashed password and a fresh API key.
    pub async fn create(
        &self,
        new_user: NewUser,
        config: Option<&SecurityConfig>,
    ) -> Result<users::Model> {
        let password = new_user.password.clone();
        let config = config.cloned();
        let password_hash =
            task::spawn_blocking(move || hash_password(&password, config.as_ref()))
                .await
                .context("Password hashing task panicked")??;

        let now = chrono::Utc::now().to_rfc3339();

        let model = users::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            email: Set(new_user.email),
            password_hash: Set(password_hash),
            api_key: Set(generate_api_key()),
            first_name: Set(new_user.first_name),
            last_name: Set(new_user.last_name),
            phone: Set(new_user.phone),
            role: Set(new_user.role),
            is_active: Set(true),
            last_login: Set(None),
            email_verification_token: Set(None),
            password_reset_token: Set(None),
            password_reset_expires: Set(None),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        let user = model
            .insert(&self.conn)
            .await
            .context("Failed to insert user")?;

        Ok(user)
    }
}

/// Hash a password using Argon2id with optional custom params.
/// If config is None, uses default params.
pub fn hash_password(password: &str, config: Option<&SecurityConfig>) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let argon2 = if let Some(cfg) = config {
        let params = Params::new(
            cfg.argon2_memory_cost_kib,
            cfg.argon2_time_cost,
            cfg.argon2_parallelism,
            None, // output length (use default)
        )
        .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    } else {
        Argon2::default()
    };

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

/// Generate a random API key (64 character hex string)
#[must_use]
pub fn generate_api_key() -> String {
    use rand::Rng;

    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();

    bytes.iter().fold(String::with_capacity(64), |mut acc, b| {
        use std::fmt::Write;
        let _ = write!(acc, "{b:02x}");
        acc
    })
}
