//! Migrator registering catalog migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240601_000001_create_services;
mod m20240601_000002_create_service_checklists;
mod m20240601_000003_create_service_subtasks;
mod m20240601_000004_create_client_services;
mod m20240601_000005_create_service_supporting_files;
mod m20240601_000006_create_audit_logs;
mod m20240601_000007_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_services::Migration),
            Box::new(m20240601_000002_create_service_checklists::Migration),
            Box::new(m20240601_000003_create_service_subtasks::Migration),
            Box::new(m20240601_000004_create_client_services::Migration),
            Box::new(m20240601_000005_create_service_supporting_files::Migration),
            Box::new(m20240601_000006_create_audit_logs::Migration),
            // Indexes should always be applied last
            Box::new(m20240601_000007_add_indexes::Migration),
        ]
    }
}
