//! Create `order_transaction` ledger table with FK to `order`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OrderTransaction::Table)
                    .if_not_exists()
                    .col(uuid(OrderTransaction::Id).primary_key())
                    .col(uuid(OrderTransaction::OrderId).not_null())
                    .col(string_len(OrderTransaction::Kind, 16).not_null())
                    .col(big_integer(OrderTransaction::AmountCents).not_null())
                    .col(string_len(OrderTransaction::Reference, 128).null())
                    .col(timestamp_with_time_zone(OrderTransaction::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_transaction_order")
                            .from(OrderTransaction::Table, OrderTransaction::OrderId)
                            .to(Order::Table, Order::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(OrderTransaction::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum OrderTransaction { Table, Id, OrderId, Kind, AmountCents, Reference, CreatedAt }

#[derive(DeriveIden)]
enum Order { Table, Id }
