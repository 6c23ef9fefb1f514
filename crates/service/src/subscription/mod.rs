pub mod repository;
pub mod service;

pub use repository::{mock, SeaOrmSubscriptionRepository, SubscriptionRepository};
pub use service::SubscriptionService;
