pub mod repository;
pub mod service;

pub use repository::{mock, OrderRepository, SeaOrmOrderRepository};
pub use service::OrderService;
