//! tvremote-accessory library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does the accessory do? (for beginners)
//!
//! A smart-home host shows the projector as a television tile with a remote
//! widget, an input picker, and a volume rocker.  Each time the user touches
//! one of those controls, the host writes a *characteristic* (for example
//! `RemoteKey = 4` for "arrow up").  The accessory:
//!
//! 1. Receives the write through a hook it registered with the host.
//! 2. Asks the command mapper in `tvremote-core` which key codes that means.
//! 3. Sends each key code to the projector on its own short-lived TCP
//!    connection, 100 ms apart.
//! 4. Reports success, or the first transport error, back to the host.
//!
//! # Layers
//!
//! ```text
//! application/     KeySender, TelevisionAccessory, CapabilityRegistry trait
//! infrastructure/
//!   network/       TcpKeyTransport (tokio TcpStream)
//!   host/          InMemoryHost (registry + callback adapter)
//!   storage/       config file loading (toml / json)
//! ```

/// Application layer: key sequencing and characteristic handlers.
pub mod application;

/// Infrastructure layer: TCP transport, host registry, configuration files.
pub mod infrastructure;
