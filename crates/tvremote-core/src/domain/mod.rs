//! Domain entities for the TV remote bridge.
//!
//! This module contains pure business logic with no infrastructure
//! dependencies: no sockets, no async runtime, no file system.
//!
//! # What lives here?
//!
//! - **`command`** – The command mapper: host-level events (remote key,
//!   input selection, volume, mute) translated into ordered key sequences,
//!   plus the play/pause flag.
//! - **`input`** – The static table of selectable input sources.
//! - **`service`** – The service and characteristic vocabulary shared with
//!   the accessory host.
//! - **`config`** – Validation of host-supplied configuration into a
//!   [`config::DeviceEndpoint`].

pub mod command;
pub mod config;
pub mod input;
pub mod service;
