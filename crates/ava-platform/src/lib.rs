//! Browser adapters for the ports defined in `ava-core`.

pub mod download;
pub mod http;
pub mod upload;

pub use http::HttpClient;
pub use upload::PickedFile;
