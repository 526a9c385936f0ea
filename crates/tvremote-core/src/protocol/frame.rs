//! Text codec for the projector's key-event protocol.
//!
//! Wire format (one frame per TCP connection):
//! ```text
//! KEYEVENT\r\n
//! <decimal key code>\r\n
//! ```
//! The sender writes exactly one frame, then closes its write side.  The
//! device never replies; there is no acknowledgement to parse.

use thiserror::Error;

use crate::keymap::code::KeyCode;

/// First line of every frame.
pub const FRAME_HEADER: &str = "KEYEVENT";

/// Line terminator used by the device protocol.
pub const LINE_TERMINATOR: &str = "\r\n";

/// Errors that can occur while decoding a frame.
///
/// Only device simulators decode frames; the bridge itself is write-only.
#[derive(Debug, Error, PartialEq)]
pub enum ProtocolError {
    /// The buffer ends before a complete frame has been seen.
    #[error("insufficient data: frame is incomplete after {available} bytes")]
    InsufficientData { available: usize },

    /// The first line is not `KEYEVENT`.
    #[error("unexpected frame header: {0:?}")]
    BadHeader(String),

    /// The second line is not a decimal integer that fits a key code.
    #[error("invalid key code line: {0:?}")]
    InvalidKeyCode(String),
}

/// Encodes a single key event into the bytes written to the device.
///
/// # Examples
///
/// ```rust
/// use tvremote_core::{encode_key_event, KeyCode};
///
/// assert_eq!(encode_key_event(KeyCode(19)), b"KEYEVENT\r\n19\r\n".to_vec());
/// ```
pub fn encode_key_event(key: KeyCode) -> Vec<u8> {
    format!("{FRAME_HEADER}{LINE_TERMINATOR}{key}{LINE_TERMINATOR}").into_bytes()
}

/// Decodes one frame from the start of `buf`.
///
/// Returns the key code and the number of bytes consumed, so a simulator
/// reading a stream can drop the consumed prefix and keep the rest.
///
/// # Errors
///
/// - [`ProtocolError::InsufficientData`] if either line is not yet terminated.
/// - [`ProtocolError::BadHeader`] if the first line is not `KEYEVENT`.
/// - [`ProtocolError::InvalidKeyCode`] if the second line is not a `u32`.
pub fn decode_key_event(buf: &[u8]) -> Result<(KeyCode, usize), ProtocolError> {
    let (header, after_header) = split_line(buf, 0)?;
    if header != FRAME_HEADER.as_bytes() {
        return Err(ProtocolError::BadHeader(
            String::from_utf8_lossy(header).into_owned(),
        ));
    }

    let (code_line, consumed) = split_line(buf, after_header)?;
    let text = std::str::from_utf8(code_line)
        .map_err(|_| ProtocolError::InvalidKeyCode(String::from_utf8_lossy(code_line).into_owned()))?;
    let value: u32 = text
        .parse()
        .map_err(|_| ProtocolError::InvalidKeyCode(text.to_string()))?;

    Ok((KeyCode(value), consumed))
}

/// Returns the line starting at `start` (without its terminator) and the
/// offset just past the terminator.
fn split_line(buf: &[u8], start: usize) -> Result<(&[u8], usize), ProtocolError> {
    let terminator = LINE_TERMINATOR.as_bytes();
    let rest = &buf[start.min(buf.len())..];
    rest.windows(terminator.len())
        .position(|w| w == terminator)
        .map(|pos| (&rest[..pos], start + pos + terminator.len()))
        .ok_or(ProtocolError::InsufficientData {
            available: buf.len(),
        })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
