use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Append-only activity record. Rows are written by the ingestion endpoint
/// and the login path, read by the activity feed, and pruned by retention.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "analytics_events")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub event_type: String,

    /// Reference to the acting user, if known. Not ownership: a deleted or
    /// unknown user simply drops the event from joined feeds.
    pub user_id: Option<String>,

    pub product_id: Option<String>,

    pub order_id: Option<String>,

    pub amount: Option<f64>,

    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
