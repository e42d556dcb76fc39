// jaalee-api: Async Rust client for the Jaalee sensor cloud REST API

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::{ApiClient, BASE_URL};
pub use error::Error;
pub use models::{DeviceRecord, Envelope};
pub use transport::TransportConfig;
