//! # tvremote-core
//!
//! Shared library for the TV remote bridge containing the key-event wire
//! format, the key code table, the command translation tables, and the
//! accessory configuration rules.
//!
//! This crate has zero dependencies on sockets, async runtimes, or the host
//! framework.  Everything here is plain data and pure functions, so the
//! translation logic can be tested without a device on the network.
//!
//! # Architecture overview (for beginners)
//!
//! The bridge presents a projector to a smart-home host as if it were a
//! television.  When the user presses "Up" on the host's remote widget, the
//! host calls into the bridge, the bridge looks up which key code the
//! projector understands for "Up" (19), and sends that code to the projector
//! over a tiny plaintext TCP protocol.
//!
//! - **`keymap`** – The [`KeyCode`] type and named constants for every button
//!   the bridge sends.
//!
//! - **`protocol`** – How a key code travels over the wire: one
//!   `KEYEVENT\r\n<code>\r\n` frame per TCP connection.
//!
//! - **`domain`** – Pure business rules: the command mapper (host event →
//!   key sequence), the static input table, the play/pause flag, the
//!   service/characteristic model, and configuration validation.

pub mod domain;
pub mod keymap;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `tvremote_core::KeyCode` instead of `tvremote_core::keymap::code::KeyCode`.
pub use domain::command::{
    resolve_input_selection, resolve_mute, resolve_remote_key, resolve_volume, InputFallthrough,
    PlayState, RemoteAction, RemoteKey, VolumeSelector,
};
pub use domain::config::{
    AccessoryConfig, ConfigError, DeviceEndpoint, PortValue, RawAccessoryConfig,
    DEFAULT_ACCESSORY_NAME,
};
pub use domain::input::{input_label, InputSource, InputSourceType, DEFAULT_ACTIVE_IDENTIFIER, INPUT_SOURCES};
pub use domain::service::{Characteristic, CharacteristicValue, ServiceKind};
pub use keymap::code::{KeyCode, KeySequence};
pub use protocol::frame::{decode_key_event, encode_key_event, ProtocolError};
