pub mod repository;
pub mod service;

pub use repository::{mock, CommunicationRepository, NewCommunication, SeaOrmCommunicationRepository};
pub use service::CommunicationService;
