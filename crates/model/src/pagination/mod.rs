pub mod cursor;
pub mod request;
pub mod window;
