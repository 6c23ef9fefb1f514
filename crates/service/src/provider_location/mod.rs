pub mod repository;
pub mod service;

pub use repository::{mock, NewLocation, ProviderLocationRepository, SeaOrmProviderLocationRepository};
pub use service::ProviderLocationService;
