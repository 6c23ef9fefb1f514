pub mod repository;
pub mod service;

pub use repository::{mock, CustomerRepository, NewCustomer, SeaOrmCustomerRepository};
pub use service::CustomerService;
