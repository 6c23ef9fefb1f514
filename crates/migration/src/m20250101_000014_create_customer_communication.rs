//! Create `customer_communication` table with FK to `customer`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CustomerCommunication::Table)
                    .if_not_exists()
                    .col(uuid(CustomerCommunication::Id).primary_key())
                    .col(uuid(CustomerCommunication::CustomerId).not_null())
                    .col(string_len(CustomerCommunication::Channel, 16).not_null())
                    .col(string_len(CustomerCommunication::Subject, 255).not_null())
                    .col(text(CustomerCommunication::Body).not_null())
                    .col(string_len(CustomerCommunication::Status, 32).not_null())
                    .col(
                        ColumnDef::new(CustomerCommunication::SentAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(timestamp_with_time_zone(CustomerCommunication::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(CustomerCommunication::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_customer_communication_customer")
                            .from(CustomerCommunication::Table, CustomerCommunication::CustomerId)
                            .to(Customer::Table, Customer::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(CustomerCommunication::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum CustomerCommunication {
    Table,
    Id,
    CustomerId,
    Channel,
    Subject,
    Body,
    Status,
    SentAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Customer { Table, Id }
