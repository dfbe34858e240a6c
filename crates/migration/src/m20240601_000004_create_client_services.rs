//! Create `client_services` association table (client <-> service).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ClientServices::Table)
                    .if_not_exists()
                    .col(uuid(ClientServices::Id).primary_key())
                    .col(uuid(ClientServices::ClientId).not_null())
                    .col(uuid(ClientServices::ServiceId).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_client_services_service")
                            .from(ClientServices::Table, ClientServices::ServiceId)
                            .to(Services::Table, Services::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ClientServices::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ClientServices {
    Table,
    Id,
    ClientId,
    ServiceId,
}

#[derive(DeriveIden)]
enum Services { Table, Id }
