pub mod action;
pub mod error;
pub mod paginator;
pub mod props;
