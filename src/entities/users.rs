use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// UUID, stored as text.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub email: String,

    /// Argon2id password hash
    pub password_hash: String,

    /// Random API key (64-char hex string) for non-browser clients
    pub api_key: String,

    pub first_name: String,

    pub last_name: String,

    pub phone: Option<String>,

    /// Open set; the analytics layer recognizes customer/admin/driver.
    pub role: String,

    pub is_active: bool,

    pub last_login: Option<String>,

    /// Set by the (external) registration flow, cleared on verification.
    pub email_verification_token: Option<String>,

    pub password_reset_token: Option<String>,

    pub password_reset_expires: Option<String>,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::analytics_events::Entity")]
    AnalyticsEvents,
}

impl Related<super::analytics_events::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AnalyticsEvents.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
