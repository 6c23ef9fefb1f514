use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Address: lookups by customer and kind drive the last-address guard
        manager
            .create_index(
                Index::create()
                    .name("idx_address_customer_kind")
                    .table(Address::Table)
                    .col(Address::CustomerId)
                    .col(Address::Kind)
                    .to_owned(),
            )
            .await?;

        // Order: customer history listing
        manager
            .create_index(
                Index::create()
                    .name("idx_order_customer")
                    .table(Order::Table)
                    .col(Order::CustomerId)
                    .to_owned(),
            )
            .await?;

        // Product: category browsing and SKU lookup
        manager
            .create_index(
                Index::create()
                    .name("idx_product_category")
                    .table(Product::Table)
                    .col(Product::CategoryId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("uniq_product_provider_sku")
                    .table(Product::Table)
                    .col(Product::ProviderId)
                    .col(Product::Sku)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Provider location: at most one primary row per provider
        manager
            .create_index(
                Index::create()
                    .name("idx_provider_location_provider")
                    .table(ProviderLocation::Table)
                    .col(ProviderLocation::ProviderId)
                    .to_owned(),
            )
            .await?;

        // Provider payment: reconciliation scans by provider and status
        manager
            .create_index(
                Index::create()
                    .name("idx_provider_payment_provider_status")
                    .table(ProviderPayment::Table)
                    .col(ProviderPayment::ProviderId)
                    .col(ProviderPayment::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_address_customer_kind").table(Address::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_order_customer").table(Order::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_product_category").table(Product::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("uniq_product_provider_sku").table(Product::Table).to_owned())
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_provider_location_provider")
                    .table(ProviderLocation::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_provider_payment_provider_status")
                    .table(ProviderPayment::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Address { Table, CustomerId, Kind }

#[derive(DeriveIden)]
enum Order { Table, CustomerId }

#[derive(DeriveIden)]
enum Product { Table, CategoryId, ProviderId, Sku }

#[derive(DeriveIden)]
enum ProviderLocation { Table, ProviderId }

#[derive(DeriveIden)]
enum ProviderPayment { Table, ProviderId, Status }
