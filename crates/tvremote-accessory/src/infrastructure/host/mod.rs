//! Host integration: an in-process implementation of `CapabilityRegistry`.
//!
//! - `memory` keeps services, values, and hooks in memory and adapts the
//!   asynchronous hooks to completion callbacks.

pub mod memory;

pub use memory::{HostError, InMemoryHost};
