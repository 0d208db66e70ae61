pub mod error;
pub mod identifiers;
