//! Protocol module containing the key-event frame codec.

pub mod frame;

pub use frame::{decode_key_event, encode_key_event, ProtocolError, FRAME_HEADER, LINE_TERMINATOR};
