pub mod message;
pub mod event;
pub mod api;
pub mod conversation;
pub mod config;
pub mod error;


pub use error::{TransportError, ValidationError};
pub type Result<T> = std::result::Result<T, TransportError>;
