//! Create `shipment` table with FK to `order`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Shipment::Table)
                    .if_not_exists()
                    .col(uuid(Shipment::Id).primary_key())
                    .col(uuid(Shipment::OrderId).not_null())
                    .col(string_len(Shipment::Carrier, 64).not_null())
                    .col(string_len(Shipment::TrackingNumber, 64).null())
                    .col(string_len(Shipment::Status, 32).not_null())
                    .col(
                        ColumnDef::new(Shipment::ShippedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Shipment::DeliveredAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(timestamp_with_time_zone(Shipment::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Shipment::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_shipment_order")
                            .from(Shipment::Table, Shipment::OrderId)
                            .to(Order::Table, Order::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Shipment::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Shipment {
    Table,
    Id,
    OrderId,
    Carrier,
    TrackingNumber,
    Status,
    ShippedAt,
    DeliveredAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Order { Table, Id }
