//! Infrastructure layer for the accessory.
//!
//! Contains the adapters behind the application traits: the TCP key
//! transport, the in-memory capability host, and configuration file storage.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `tvremote_core`, but MUST NOT be imported by the `application` layer.

pub mod host;
pub mod network;
pub mod storage;
