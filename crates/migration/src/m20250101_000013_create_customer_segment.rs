//! Create `customer_segment` table; criteria stored as JSONB.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CustomerSegment::Table)
                    .if_not_exists()
                    .col(uuid(CustomerSegment::Id).primary_key())
                    .col(string_len(CustomerSegment::Name, 128).not_null())
                    .col(string_len(CustomerSegment::SegmentType, 32).not_null())
                    .col(json_binary(CustomerSegment::Criteria).not_null())
                    .col(boolean(CustomerSegment::Active).not_null())
                    .col(timestamp_with_time_zone(CustomerSegment::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(CustomerSegment::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(CustomerSegment::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum CustomerSegment { Table, Id, Name, SegmentType, Criteria, Active, CreatedAt, UpdatedAt }
