//! Service and characteristic vocabulary shared with the accessory host.
//!
//! The host models a device as a set of *services* (a television, its
//! inputs, its speaker), each exposing named *characteristics* that can be
//! read or written.  These types name them without tying the core crate to
//! any particular host implementation.

use std::fmt;

/// Kinds of service the accessory publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceKind {
    Television,
    InputSource,
    TelevisionSpeaker,
}

/// Characteristics the accessory reads, writes, or initialises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Characteristic {
    /// Power state; `1` is on.
    Active,
    /// Identifier of the selected input.
    ActiveIdentifier,
    ConfiguredName,
    /// `1` keeps the accessory discoverable while "asleep".
    SleepDiscoveryMode,
    RemoteKey,
    /// Identifier of an input source service.
    Identifier,
    IsConfigured,
    InputSourceType,
    Mute,
    VolumeSelector,
    /// `1` is relative (up/down) volume control.
    VolumeControlType,
}

impl fmt::Display for Characteristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A characteristic value.
#[derive(Debug, Clone, PartialEq)]
pub enum CharacteristicValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl CharacteristicValue {
    /// Returns the value as an integer.  Booleans convert to `0`/`1`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::Bool(b) => Some(i64::from(*b)),
            Self::Text(_) => None,
        }
    }

    /// Returns the value as a boolean.  Integers are truthy when non-zero.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Int(n) => Some(*n != 0),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for CharacteristicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<bool> for CharacteristicValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for CharacteristicValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for CharacteristicValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<&str> for CharacteristicValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CharacteristicValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}
