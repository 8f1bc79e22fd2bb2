use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SecurityConfig;
use crate::entities::{analytics_events, users};
use crate::services::user_admin_service::UserListFilter;

pub mod migrator;
pub mod repositories;

pub use repositories::event::NewEvent;
pub use repositories::user::NewUser;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.starts_with(":memory:") && !db_url.contains("memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    // ========== User Repository Methods ==========

    #[must_use]
    pub fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    pub async fn count_users(&self) -> Result<u64> {
        self.user_repo().count_all().await
    }

    pub async fn count_users_created_since(&self, cutoff: &str) -> Result<u64> {
        self.user_repo().count_created_since(cutoff).await
    }

    pub async fn count_users_active_since(&self, cutoff: &str) -> Result<u64> {
        self.user_repo().count_active_since(cutoff).await
    }

    pub async fn count_users_by_role(&self) -> Result<Vec<(String, i64)>> {
        self.user_repo().count_by_role().await
    }

    pub async fn list_users_page(&self, filter: &UserListFilter) -> Result<Vec<users::Model>> {
        self.user_repo().find_page(filter).await
    }

    pub async fn count_users_matching(&self, filter: &UserListFilter) -> Result<u64> {
        self.user_repo().count_matching(filter).await
    }

    pub async fn get_user_by_id(&self, id: &str) -> Result<Option<users::Model>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<users::Model>> {
        self.user_repo().get_by_email(email).await
    }

    pub async fn set_user_active(
        &self,
        id: &str,
        is_active: bool,
    ) -> Result<Option<users::Model>> {
        self.user_repo().set_active(id, is_active).await
    }

    pub async fn verify_user_password(&self, email: &str, password: &str) -> Result<bool> {
        self.user_repo().verify_password(email, password).await
    }

    pub async fn verify_api_key(&self, api_key: &str) -> Result<Option<users::Model>> {
        self.user_repo().verify_api_key(api_key).await
    }

    pub async fn record_user_login(&self, id: &str) -> Result<()> {
        self.user_repo().record_login(id).await
    }

    pub async fn create_user(
        &self,
        new_user: NewUser,
        config: Option<&SecurityConfig>,
    ) -> Result<users::Model> {
        self.user_repo().create(new_user, config).await
    }

    // ========== Event Repository Methods ==========

    fn event_repo(&self) -> repositories::event::EventRepository {
        repositories::event::EventRepository::new(self.conn.clone())
    }

    pub async fn add_event(&self, event: NewEvent) -> Result<analytics_events::Model> {
        self.event_repo().add(event).await
    }

    pub async fn recent_events_joined(
        &self,
        event_types: &[&str],
        since: &str,
        limit: u64,
    ) -> Result<Vec<(analytics_events::Model, Option<users::Model>)>> {
        self.event_repo()
            .recent_joined(event_types, since, limit)
            .await
    }

    pub async fn prune_events_older_than(&self, cutoff: &str) -> Result<u64> {
        self.event_repo().prune_older_than(cutoff).await
    }
}
