//! Create `services` table.
//!
//! Root aggregate of the catalog; every other catalog table references it.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Services::Table)
                    .if_not_exists()
                    .col(uuid(Services::Id).primary_key())
                    .col(uuid(Services::AgencyId).not_null())
                    .col(string_len(Services::Name, 255).not_null())
                    .col(boolean(Services::IsEnabled).not_null())
                    .col(boolean(Services::IsChecklistCompletionRequired).not_null())
                    .col(boolean(Services::IsRecurring).not_null())
                    .col(string_len_null(Services::AutoTaskCreationFrequency, 16))
                    .col(integer_null(Services::TargetDateCreationDate))
                    .col(boolean(Services::AssignAutoTasksToUsersOfRespectiveClients).not_null())
                    .col(json(Services::AssignAutoTasksToUsers).not_null())
                    .col(string_len_null(Services::BillingSacCode, 32))
                    .col(double(Services::BillingGstPercent).not_null())
                    .col(double(Services::BillingDefaultRate).not_null())
                    .col(boolean(Services::BillingDefaultBillable).not_null())
                    .col(boolean(Services::CreateDocumentCollectionRequestAutomatically).not_null())
                    .col(text_null(Services::DocumentRequestDefaultMessage))
                    .col(string_len(Services::CreatedBy, 255).not_null())
                    .col(timestamp_with_time_zone(Services::CreatedAt).not_null())
                    .to_owned(),
            )
            .await?;

        // One name per agency
        manager
            .create_index(
                Index::create()
                    .name("uq_services_agency_id_name")
                    .table(Services::Table)
                    .col(Services::AgencyId)
                    .col(Services::Name)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Services::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Services {
    Table,
    Id,
    AgencyId,
    Name,
    IsEnabled,
    IsChecklistCompletionRequired,
    IsRecurring,
    AutoTaskCreationFrequency,
    TargetDateCreationDate,
    AssignAutoTasksToUsersOfRespectiveClients,
    AssignAutoTasksToUsers,
    BillingSacCode,
    BillingGstPercent,
    BillingDefaultRate,
    BillingDefaultBillable,
    CreateDocumentCollectionRequestAutomatically,
    DocumentRequestDefaultMessage,
    CreatedBy,
    CreatedAt,
}
