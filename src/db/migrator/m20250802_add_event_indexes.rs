use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx_analytics_events_created_at")
                    .table(AnalyticsEvents::Table)
                    .col(AnalyticsEvents::CreatedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_analytics_events_event_type")
                    .table(AnalyticsEvents::Table)
                    .col(AnalyticsEvents::EventType)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // The admin list filters and the role distribution both hit this
        manager
            .create_index(
                Index::create()
                    .name("idx_users_role")
                    .table(Users::Table)
                    .col(Users::Role)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_analytics_events_created_at")
                    .table(AnalyticsEvents::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_analytics_events_event_type")
                    .table(AnalyticsEvents::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_users_role")
                    .table(Users::Table)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum AnalyticsEvents {
    Table,
    CreatedAt,
    EventType,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Role,
}
