//! The [`KeyCode`] newtype and the ordered [`KeySequence`] built from it.
//!
//! # What is a key code? (for beginners)
//!
//! Every button on the projector's remote has a number.  Pressing "Up"
//! produces 19, pressing "Select" produces 66, and so on.  The bridge
//! simulates a button press by sending that number to the projector.
//!
//! The numbering follows Android's `KeyEvent` constants because the target
//! device runs an Android-derived firmware:
//!
//! | Button        | Code |
//! |---------------|------|
//! | Home / menu   | 3    |
//! | Back          | 4    |
//! | D-pad up      | 19   |
//! | D-pad down    | 20   |
//! | D-pad left    | 21   |
//! | D-pad right   | 22   |
//! | Volume up     | 24   |
//! | Volume down   | 25   |
//! | Enter/select  | 66   |
//! | Menu          | 82   |
//! | Media play    | 126  |
//! | Media pause   | 127  |
//! | Volume mute   | 164  |
//! | TV input      | 178  |
//!
//! A [`KeyCode`] is opaque: any `u32` is accepted and transmitted verbatim.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One button press understood by the target device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyCode(pub u32);

impl KeyCode {
    /// `KEYCODE_HOME`; opens the device's home menu.
    pub const HOME: KeyCode = KeyCode(3);
    /// `KEYCODE_BACK`.
    pub const BACK: KeyCode = KeyCode(4);
    /// `KEYCODE_DPAD_UP`.
    pub const DPAD_UP: KeyCode = KeyCode(19);
    /// `KEYCODE_DPAD_DOWN`.
    pub const DPAD_DOWN: KeyCode = KeyCode(20);
    /// `KEYCODE_DPAD_LEFT`.
    pub const DPAD_LEFT: KeyCode = KeyCode(21);
    /// `KEYCODE_DPAD_RIGHT`.
    pub const DPAD_RIGHT: KeyCode = KeyCode(22);
    /// `KEYCODE_VOLUME_UP`.
    pub const VOLUME_UP: KeyCode = KeyCode(24);
    /// `KEYCODE_VOLUME_DOWN`.
    pub const VOLUME_DOWN: KeyCode = KeyCode(25);
    /// `KEYCODE_ENTER`; confirms the focused item.
    pub const ENTER: KeyCode = KeyCode(66);
    /// `KEYCODE_MENU`; the device's context/information menu.
    pub const MENU: KeyCode = KeyCode(82);
    /// `KEYCODE_MEDIA_PLAY`.
    pub const MEDIA_PLAY: KeyCode = KeyCode(126);
    /// `KEYCODE_MEDIA_PAUSE`.
    pub const MEDIA_PAUSE: KeyCode = KeyCode(127);
    /// `KEYCODE_VOLUME_MUTE`.
    pub const VOLUME_MUTE: KeyCode = KeyCode(164);
    /// `KEYCODE_TV_INPUT`; opens the input picker.
    pub const TV_INPUT: KeyCode = KeyCode(178);

    /// Returns the raw integer sent on the wire.
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for KeyCode {
    fn from(value: u32) -> Self {
        KeyCode(value)
    }
}

/// An ordered list of key codes transmitted one after another.
///
/// A sequence may be empty; sending an empty sequence is a successful no-op.
/// Callers that hold a single code can convert it directly:
///
/// ```rust
/// use tvremote_core::{KeyCode, KeySequence};
///
/// let single: KeySequence = KeyCode::ENTER.into();
/// assert_eq!(single.len(), 1);
///
/// let many = KeySequence::from(vec![KeyCode::DPAD_UP, KeyCode::ENTER]);
/// assert_eq!(many.as_slice(), &[KeyCode(19), KeyCode(66)]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeySequence(Vec<KeyCode>);

impl KeySequence {
    /// Creates an empty sequence.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Returns the codes in transmission order.
    pub fn as_slice(&self) -> &[KeyCode] {
        &self.0
    }

    /// Number of key events the sequence will produce.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when nothing will be transmitted.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the codes in transmission order.
    pub fn iter(&self) -> std::slice::Iter<'_, KeyCode> {
        self.0.iter()
    }

    /// Appends every code of `other` after the codes already present.
    pub fn extend_from(&mut self, other: &KeySequence) {
        self.0.extend_from_slice(&other.0);
    }
}

impl From<KeyCode> for KeySequence {
    fn from(code: KeyCode) -> Self {
        Self(vec![code])
    }
}

impl From<Vec<KeyCode>> for KeySequence {
    fn from(codes: Vec<KeyCode>) -> Self {
        Self(codes)
    }
}

impl From<&[KeyCode]> for KeySequence {
    fn from(codes: &[KeyCode]) -> Self {
        Self(codes.to_vec())
    }
}

impl<const N: usize> From<[KeyCode; N]> for KeySequence {
    fn from(codes: [KeyCode; N]) -> Self {
        Self(codes.to_vec())
    }
}

impl FromIterator<KeyCode> for KeySequence {
    fn from_iter<I: IntoIterator<Item = KeyCode>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a KeySequence {
    type Item = &'a KeyCode;
    type IntoIter = std::slice::Iter<'a, KeyCode>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for KeySequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, code) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{code}")?;
        }
        write!(f, "]")
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
