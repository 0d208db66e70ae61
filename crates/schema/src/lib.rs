pub mod ast;
pub mod dialect;
pub mod entities;
pub mod error;
pub mod migration;
pub mod renderer;
