pub mod ports;
pub mod event_bus;
pub mod session;
pub mod upload;
pub mod browser;
pub mod export;
