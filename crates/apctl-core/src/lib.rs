//! Polling coordinator between `apctl-api` and its consumers (CLI, hosts).
//!
//! - **[`Coordinator`]** keeps the last successful [`Snapshot`] of the site's
//!   access points, refreshes it on a fixed period, and routes power and LED
//!   writes through the client with an immediate re-fetch on success.
//!   Refresh failures keep the previous snapshot and show up in
//!   [`CoordinatorStatus`].
//!
//! - **[`entity`]** adapts a snapshot into host entities: a
//!   [`PowerSelect`] per radio band and a [`LedSwitch`] per AP.
//!
//! - **[`validate_credentials`]** is the one-shot setup check.

pub mod config;
pub mod coordinator;
pub mod entity;
pub mod error;
pub mod validate;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ControllerConfig, TlsVerification};
pub use coordinator::{Coordinator, CoordinatorStatus, Snapshot};
pub use entity::{DeviceInfo, Entity, LedSwitch, PowerSelect, entities};
pub use error::CoreError;
pub use validate::{ValidatedController, validate_credentials};

// Domain types consumers need alongside the coordinator.
pub use apctl_api::{AccessPoint, Band, Channel, LedMode, MacAddress, PowerLevel, Radio};
