// apctl-api: Async client for a UniFi controller's access-point radio settings

pub mod access_point;
pub mod auth;
pub mod band;
pub mod client;
pub mod devices;
pub mod error;
pub mod models;
pub mod transport;

pub use access_point::{AccessPoint, Channel, LedMode, MacAddress, PowerLevel, Radio};
pub use band::{Band, classify};
pub use client::ControllerClient;
pub use error::{AuthError, Error};
pub use models::RadioEntry;
pub use transport::{TlsMode, TransportConfig};
