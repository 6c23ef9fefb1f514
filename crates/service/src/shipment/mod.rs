pub mod repository;
pub mod service;

pub use repository::{mock, SeaOrmShipmentRepository, ShipmentRepository};
pub use service::ShipmentService;
