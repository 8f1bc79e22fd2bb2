use sea_orm_migration::prelude::*;

mod m20250715_initial;
mod m20250802_add_event_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250715_initial::Migration),
            Box::new(m20250802_add_event_indexes::Migration),
        ]
    }
}
