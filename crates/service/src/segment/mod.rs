pub mod repository;
pub mod service;

pub use repository::{mock, CustomerSegmentRepository, NewSegment, SeaOrmCustomerSegmentRepository};
pub use service::CustomerSegmentService;
