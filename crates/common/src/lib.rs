pub mod pagination;
pub mod utils;
