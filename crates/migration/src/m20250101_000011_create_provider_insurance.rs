//! Create `provider_insurance` table with FK to `provider`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProviderInsurance::Table)
                    .if_not_exists()
                    .col(uuid(ProviderInsurance::Id).primary_key())
                    .col(uuid(ProviderInsurance::ProviderId).not_null())
                    .col(string_len(ProviderInsurance::PolicyNumber, 64).not_null())
                    .col(big_integer(ProviderInsurance::CoverageAmountCents).not_null())
                    .col(date(ProviderInsurance::StartDate).not_null())
                    .col(date(ProviderInsurance::EndDate).not_null())
                    .col(string_len(ProviderInsurance::Status, 32).not_null())
                    .col(timestamp_with_time_zone(ProviderInsurance::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(ProviderInsurance::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_provider_insurance_provider")
                            .from(ProviderInsurance::Table, ProviderInsurance::ProviderId)
                            .to(Provider::Table, Provider::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ProviderInsurance::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ProviderInsurance {
    Table,
    Id,
    ProviderId,
    PolicyNumber,
    CoverageAmountCents,
    StartDate,
    EndDate,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Provider { Table, Id }
