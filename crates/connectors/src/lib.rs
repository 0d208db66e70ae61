pub mod error;
pub mod file;
pub mod memory;
pub mod sheets;
pub mod source;
