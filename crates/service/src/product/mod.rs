pub mod repository;
pub mod service;

pub use repository::{mock, NewProduct, ProductRepository, SeaOrmProductRepository};
pub use service::ProductService;
