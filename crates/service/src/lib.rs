//! Business service layer for the shopping platform.
//! - One domain module per entity: repository trait (SeaORM impl + mock) and
//!   a service struct holding the business rules.
//! - Status transitions are checked against declared tables in `models`.
//! - Domain events go through a typed in-process bus with policy-driven
//!   listener delivery.

pub mod app;
pub mod errors;
pub mod status;
pub mod cache;
pub mod events;
pub mod notify;

pub mod customer;
pub mod address;
pub mod category;
pub mod product;
pub mod order;
pub mod shipment;
pub mod provider;
pub mod provider_location;
pub mod provider_insurance;
pub mod provider_payment;
pub mod segment;
pub mod communication;
pub mod subscription;

#[cfg(test)]
pub mod test_support;
