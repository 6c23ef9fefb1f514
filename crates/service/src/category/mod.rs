pub mod repository;
pub mod service;

pub use repository::{mock, CategoryRepository, NewCategory, SeaOrmCategoryRepository};
pub use service::CategoryService;
