use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AnalyticsService, AuthService, RetentionService, SeaOrmAnalyticsService, SeaOrmAuthService,
    SeaOrmUserAdminService, UserAdminService,
};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub analytics_service: Arc<dyn AnalyticsService>,

    pub user_admin_service: Arc<dyn UserAdminService>,

    pub auth_service: Arc<dyn AuthService>,

    pub retention_service: Arc<RetentionService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let retention_config = config.retention.clone();
        let config_arc = Arc::new(RwLock::new(config));

        let analytics_service =
            Arc::new(SeaOrmAnalyticsService::new(store.clone())) as Arc<dyn AnalyticsService>;

        let user_admin_service =
            Arc::new(SeaOrmUserAdminService::new(store.clone())) as Arc<dyn UserAdminService>;

        let auth_service = Arc::new(SeaOrmAuthService::new(store.clone())) as Arc<dyn AuthService>;

        let retention_service = Arc::new(RetentionService::new(store.clone(), retention_config));

        Ok(Self {
            config: config_arc,
            store,
            analytics_service,
            user_admin_service,
            auth_service,
            retention_service,
        })
    }

    pub async fn config(&self) -> Config {
        self.config.read().await.clone()
    }
}
