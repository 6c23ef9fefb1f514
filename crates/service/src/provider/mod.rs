pub mod repository;
pub mod service;

pub use repository::{mock, ProviderRepository, SeaOrmProviderRepository};
pub use service::ProviderService;
