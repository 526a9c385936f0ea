//! Application layer use cases for the accessory.
//!
//! Use cases in this layer depend on abstractions (traits) rather than on
//! sockets or a concrete host, so they can be unit-tested with recording
//! fakes.
//!
//! # Sub-modules
//!
//! - **`send_keys`** – The Key Sender: transmits a key sequence one
//!   connection per key, with a fixed pause between keys, stopping at the
//!   first failure.  Defines the [`send_keys::KeyTransport`] seam.
//!
//! - **`registry`** – The [`registry::CapabilityRegistry`] trait the host
//!   integration implements: services, links, static values, get/set hooks.
//!
//! - **`television`** – The television accessory: publishes the service
//!   graph and turns characteristic writes into key sequences.

pub mod registry;
pub mod send_keys;
pub mod television;
