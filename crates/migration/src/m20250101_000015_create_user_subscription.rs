//! Create `user_subscription` table with FK to `customer`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserSubscription::Table)
                    .if_not_exists()
                    .col(uuid(UserSubscription::Id).primary_key())
                    .col(uuid(UserSubscription::CustomerId).not_null())
                    .col(string_len(UserSubscription::Plan, 64).not_null())
                    .col(string_len(UserSubscription::Status, 32).not_null())
                    .col(timestamp_with_time_zone(UserSubscription::StartedAt).not_null())
                    .col(
                        ColumnDef::new(UserSubscription::EndsAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(timestamp_with_time_zone(UserSubscription::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(UserSubscription::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_subscription_customer")
                            .from(UserSubscription::Table, UserSubscription::CustomerId)
                            .to(Customer::Table, Customer::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(UserSubscription::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum UserSubscription { Table, Id, CustomerId, Plan, Status, StartedAt, EndsAt, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Customer { Table, Id }
