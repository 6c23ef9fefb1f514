//! Create `provider_location` table with FK to `provider`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProviderLocation::Table)
                    .if_not_exists()
                    .col(uuid(ProviderLocation::Id).primary_key())
                    .col(uuid(ProviderLocation::ProviderId).not_null())
                    .col(string_len(ProviderLocation::Label, 128).not_null())
                    .col(string_len(ProviderLocation::City, 128).not_null())
                    .col(string_len(ProviderLocation::Country, 64).not_null())
                    .col(boolean(ProviderLocation::IsPrimary).not_null())
                    .col(timestamp_with_time_zone(ProviderLocation::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(ProviderLocation::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_provider_location_provider")
                            .from(ProviderLocation::Table, ProviderLocation::ProviderId)
                            .to(Provider::Table, Provider::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ProviderLocation::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ProviderLocation { Table, Id, ProviderId, Label, City, Country, IsPrimary, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Provider { Table, Id }
