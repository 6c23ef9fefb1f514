pub mod errors;
pub mod db;
pub mod status;

pub mod user;
pub mod customer;
pub mod address;
pub mod category;
pub mod product;
pub mod order;
pub mod order_transaction;
pub mod shipment;
pub mod provider;
pub mod provider_location;
pub mod provider_insurance;
pub mod provider_payment;
pub mod customer_segment;
pub mod customer_communication;
pub mod user_subscription;
