//! Create `service_supporting_files` table.
//! Only metadata lives here; `file_path` is the storage locator of the bytes.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServiceSupportingFiles::Table)
                    .if_not_exists()
                    .col(uuid(ServiceSupportingFiles::Id).primary_key())
                    .col(uuid(ServiceSupportingFiles::ServiceId).not_null())
                    .col(string_len(ServiceSupportingFiles::FileName, 255).not_null())
                    .col(string_len(ServiceSupportingFiles::FilePath, 1024).not_null())
                    .col(string_len_null(ServiceSupportingFiles::MimeType, 255))
                    .col(string_len(ServiceSupportingFiles::UploadedBy, 255).not_null())
                    .col(timestamp_with_time_zone(ServiceSupportingFiles::UploadedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_supporting_files_service")
                            .from(ServiceSupportingFiles::Table, ServiceSupportingFiles::ServiceId)
                            .to(Services::Table, Services::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ServiceSupportingFiles::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ServiceSupportingFiles {
    Table,
    Id,
    ServiceId,
    FileName,
    FilePath,
    MimeType,
    UploadedBy,
    UploadedAt,
}

#[derive(DeriveIden)]
enum Services { Table, Id }
