//! Key code definitions for the projector's remote-control protocol.
//!
//! The device speaks Android-style key codes (`KEYCODE_DPAD_UP = 19`,
//! `KEYCODE_ENTER = 66`, ...).  The bridge never validates a code against
//! this table; the constants exist so the translation tables read as button
//! names rather than magic numbers.

pub mod code;

pub use code::{KeyCode, KeySequence};
