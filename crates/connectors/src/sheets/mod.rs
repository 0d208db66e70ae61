pub mod client;
pub mod range;
mod types;
