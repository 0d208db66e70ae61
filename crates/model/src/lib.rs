pub mod core;
pub mod entities;
pub mod pagination;
pub mod records;
