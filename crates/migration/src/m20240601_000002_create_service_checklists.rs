//! Create `service_checklists` table, owned by `services`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServiceChecklists::Table)
                    .if_not_exists()
                    .col(uuid(ServiceChecklists::Id).primary_key())
                    .col(uuid(ServiceChecklists::ServiceId).not_null())
                    .col(text(ServiceChecklists::ItemText).not_null())
                    .col(boolean(ServiceChecklists::IsRequired).not_null())
                    .col(integer(ServiceChecklists::SortOrder).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_checklists_service")
                            .from(ServiceChecklists::Table, ServiceChecklists::ServiceId)
                            .to(Services::Table, Services::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ServiceChecklists::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ServiceChecklists {
    Table,
    Id,
    ServiceId,
    ItemText,
    IsRequired,
    SortOrder,
}

#[derive(DeriveIden)]
enum Services { Table, Id }
