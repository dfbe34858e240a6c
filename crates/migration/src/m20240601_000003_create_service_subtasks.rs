//! Create `service_subtasks` table, owned by `services`.
//! `users` holds a JSON array of assignee ids.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServiceSubtasks::Table)
                    .if_not_exists()
                    .col(uuid(ServiceSubtasks::Id).primary_key())
                    .col(uuid(ServiceSubtasks::ServiceId).not_null())
                    .col(string_len(ServiceSubtasks::Title, 255).not_null())
                    .col(text_null(ServiceSubtasks::Description))
                    .col(integer_null(ServiceSubtasks::DueDate))
                    .col(integer_null(ServiceSubtasks::TargetDate))
                    .col(json(ServiceSubtasks::Users).not_null())
                    .col(boolean(ServiceSubtasks::EnableWorkflow).not_null())
                    .col(integer(ServiceSubtasks::SortOrder).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_subtasks_service")
                            .from(ServiceSubtasks::Table, ServiceSubtasks::ServiceId)
                            .to(Services::Table, Services::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ServiceSubtasks::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ServiceSubtasks {
    Table,
    Id,
    ServiceId,
    Title,
    Description,
    DueDate,
    TargetDate,
    Users,
    EnableWorkflow,
    SortOrder,
}

#[derive(DeriveIden)]
enum Services { Table, Id }
