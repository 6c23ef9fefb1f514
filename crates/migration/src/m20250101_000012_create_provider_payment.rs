//! Create `provider_payment` table with FK to `provider`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProviderPayment::Table)
                    .if_not_exists()
                    .col(uuid(ProviderPayment::Id).primary_key())
                    .col(uuid(ProviderPayment::ProviderId).not_null())
                    .col(big_integer(ProviderPayment::AmountCents).not_null())
                    .col(string_len(ProviderPayment::Currency, 3).not_null())
                    .col(string_len(ProviderPayment::Status, 32).not_null())
                    .col(
                        ColumnDef::new(ProviderPayment::ProcessedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(timestamp_with_time_zone(ProviderPayment::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(ProviderPayment::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_provider_payment_provider")
                            .from(ProviderPayment::Table, ProviderPayment::ProviderId)
                            .to(Provider::Table, Provider::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ProviderPayment::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ProviderPayment {
    Table,
    Id,
    ProviderId,
    AmountCents,
    Currency,
    Status,
    ProcessedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Provider { Table, Id }
