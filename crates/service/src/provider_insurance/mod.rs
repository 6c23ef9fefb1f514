pub mod repository;
pub mod service;

pub use repository::{mock, NewInsurance, ProviderInsuranceRepository, SeaOrmProviderInsuranceRepository};
pub use service::ProviderInsuranceService;
