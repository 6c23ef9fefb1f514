pub mod repository;
pub mod service;

pub use repository::{mock, AddressRepository, NewAddress, SeaOrmAddressRepository};
pub use service::AddressService;
