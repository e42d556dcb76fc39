//! Reactive data layer between `jaalee-api` and UI consumers.
//!
//! This crate owns the business logic for one configured cloud account:
//!
//! - **[`SetupFlow`]** — Two-step interactive wizard state machine
//!   (email → verification code) that drives the API client and emits a
//!   persistable [`Credential`] on completion.
//!
//! - **[`Account`]** — Per-account lifecycle facade:
//!   [`connect()`](Account::connect) performs an initial data refresh,
//!   then spawns a fixed-interval background poll task.
//!   [`disconnect()`](Account::disconnect) cancels it. One cycle runs at
//!   a time; a failed cycle degrades, it never tears anything down.
//!
//! - **[`DeviceStore`]** — Reactive snapshot storage (`DashMap` +
//!   `tokio::sync::watch`). A successful cycle replaces the device set
//!   wholesale via upsert-then-prune; a failed cycle keeps the previous
//!   data and raises the `last_update` failure flag that presentation
//!   consults for availability.
//!
//! - **[`SensorRegistry`]** — Presentation entities keyed by
//!   `(MAC, metric)` with an explicit ensure-exists pass each cycle.
//!   Entity metadata is recomputed from the freshest record on every
//!   read, so renamed aliases show up without recreating entities.

pub mod account;
pub mod config;
pub mod devices;
pub mod entity;
pub mod error;
pub mod flow;
pub mod store;

pub use account::Account;
pub use config::AccountConfig;
pub use entity::{Metric, SensorRegistry, SensorState};
pub use error::{CoreError, FlowError};
pub use flow::{Credential, FlowStep, SetupFlow};
pub use store::{DeviceStore, LastUpdate};
