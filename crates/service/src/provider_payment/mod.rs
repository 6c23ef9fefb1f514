pub mod repository;
pub mod service;

pub use repository::{mock, ProviderPaymentRepository, SeaOrmProviderPaymentRepository};
pub use service::ProviderPaymentService;
