use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Child lookups are always by owning service
        manager
            .create_index(
                Index::create()
                    .name("idx_service_checklists_service")
                    .table(ServiceChecklists::Table)
                    .col(ServiceChecklists::ServiceId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_service_subtasks_service")
                    .table(ServiceSubtasks::Table)
                    .col(ServiceSubtasks::ServiceId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_service_supporting_files_service")
                    .table(ServiceSupportingFiles::Table)
                    .col(ServiceSupportingFiles::ServiceId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_client_services_service")
                    .table(ClientServices::Table)
                    .col(ClientServices::ServiceId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_client_services_service").table(ClientServices::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_service_supporting_files_service").table(ServiceSupportingFiles::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_service_subtasks_service").table(ServiceSubtasks::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_service_checklists_service").table(ServiceChecklists::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ServiceChecklists { Table, ServiceId }

#[derive(DeriveIden)]
enum ServiceSubtasks { Table, ServiceId }

#[derive(DeriveIden)]
enum ServiceSupportingFiles { Table, ServiceId }

#[derive(DeriveIden)]
enum ClientServices { Table, ServiceId }
