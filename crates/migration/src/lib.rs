//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_user;
mod m20250101_000002_create_customer;
mod m20250101_000003_create_address;
mod m20250101_000004_create_category;
mod m20250101_000005_create_provider;
mod m20250101_000006_create_product;
mod m20250101_000007_create_order;
mod m20250101_000008_create_order_transaction;
mod m20250101_000009_create_shipment;
mod m20250101_000010_create_provider_location;
mod m20250101_000011_create_provider_insurance;
mod m20250101_000012_create_provider_payment;
mod m20250101_000013_create_customer_segment;
mod m20250101_000014_create_customer_communication;
mod m20250101_000015_create_user_subscription;
mod m20250101_000016_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_user::Migration),
            Box::new(m20250101_000002_create_customer::Migration),
            Box::new(m20250101_000003_create_address::Migration),
            Box::new(m20250101_000004_create_category::Migration),
            Box::new(m20250101_000005_create_provider::Migration),
            Box::new(m20250101_000006_create_product::Migration),
            Box::new(m20250101_000007_create_order::Migration),
            Box::new(m20250101_000008_create_order_transaction::Migration),
            Box::new(m20250101_000009_create_shipment::Migration),
            Box::new(m20250101_000010_create_provider_location::Migration),
            Box::new(m20250101_000011_create_provider_insurance::Migration),
            Box::new(m20250101_000012_create_provider_payment::Migration),
            Box::new(m20250101_000013_create_customer_segment::Migration),
            Box::new(m20250101_000014_create_customer_communication::Migration),
            Box::new(m20250101_000015_create_user_subscription::Migration),
            // Indexes should always be applied last
            Box::new(m20250101_000016_add_indexes::Migration),
        ]
    }
}
