//! Accessory configuration and its validation rules.
//!
//! The host hands the accessory a loosely-typed configuration object.
//! [`RawAccessoryConfig`] mirrors that object as-is (every field optional,
//! `port` in whatever numeric or textual form it arrived), and
//! [`AccessoryConfig::try_from`] turns it into validated values or fails.
//!
//! Validation is fail-fast: an invalid configuration means no accessory is
//! created at all.
//!
//! | Field                    | Rule                                     |
//! |--------------------------|------------------------------------------|
//! | `name`                   | optional, defaults to `"Projector"`      |
//! | `hostname`               | required, non-empty                      |
//! | `port`                   | required, integer in `1..=65535`         |
//! | `menu_input_fallthrough` | optional, defaults to `false`            |

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::domain::command::InputFallthrough;

/// Name used when the configuration does not provide one.
pub const DEFAULT_ACCESSORY_NAME: &str = "Projector";

/// Error type for configuration validation.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// `hostname` is absent or empty.
    #[error("missing required configuration: 'hostname'")]
    MissingHostname,

    /// `port` is absent.
    #[error("missing required configuration: 'port'")]
    MissingPort,

    /// `port` is present but is not an integer.
    #[error("invalid configuration: 'port' must be an integer, got {0}")]
    PortNotInteger(String),

    /// `port` is an integer outside `1..=65535`.
    #[error("invalid configuration: 'port' must be between 1 and 65535, got {0}")]
    PortOutOfRange(i64),
}

// ── Raw (unvalidated) configuration ───────────────────────────────────────────

/// A port value exactly as it appeared in the configuration source.
///
/// Hosts built on dynamic languages happily pass `8080`, `8080.0`, or
/// `"8080"`; keeping the raw shape lets validation reject the non-integers
/// with a precise message instead of a generic deserialization failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PortValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for PortValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortValue::Integer(n) => write!(f, "{n}"),
            PortValue::Float(x) => write!(f, "{x}"),
            PortValue::Text(s) => write!(f, "{s:?}"),
        }
    }
}

/// Configuration object as supplied by the host, before validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawAccessoryConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<PortValue>,
    /// Selecting input 1 also runs the input-2 macro when `true`.
    #[serde(default)]
    pub menu_input_fallthrough: bool,
}

// ── Validated configuration ───────────────────────────────────────────────────

/// Network address of the target device.  Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceEndpoint {
    hostname: String,
    port: u16,
}

impl DeviceEndpoint {
    /// Creates an endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingHostname`] for an empty hostname and
    /// [`ConfigError::PortOutOfRange`] for port `0`.
    pub fn new(hostname: impl Into<String>, port: u16) -> Result<Self, ConfigError> {
        let hostname = hostname.into();
        if hostname.is_empty() {
            return Err(ConfigError::MissingHostname);
        }
        if port == 0 {
            return Err(ConfigError::PortOutOfRange(0));
        }
        Ok(Self { hostname, port })
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for DeviceEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.hostname, self.port)
    }
}

/// Validated accessory configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessoryConfig {
    /// Display name of the television service.
    pub name: String,
    pub endpoint: DeviceEndpoint,
    pub input_fallthrough: InputFallthrough,
}

impl TryFrom<RawAccessoryConfig> for AccessoryConfig {
    type Error = ConfigError;

    fn try_from(raw: RawAccessoryConfig) -> Result<Self, Self::Error> {
        let name = raw.name.filter(|n| !n.is_empty()).unwrap_or_else(|| {
            debug!("no accessory name configured, using '{DEFAULT_ACCESSORY_NAME}'");
            DEFAULT_ACCESSORY_NAME.to_string()
        });

        let hostname = raw
            .hostname
            .filter(|h| !h.is_empty())
            .ok_or(ConfigError::MissingHostname)?;

        let port = validate_port(raw.port.as_ref())?;

        Ok(Self {
            name,
            endpoint: DeviceEndpoint::new(hostname, port)?,
            input_fallthrough: InputFallthrough::from_flag(raw.menu_input_fallthrough),
        })
    }
}

/// Checks that `port` is present, integral, and within `1..=65535`.
///
/// A float with no fractional part (`8080.0`) counts as an integer; text
/// never does, even if it looks numeric.
fn validate_port(port: Option<&PortValue>) -> Result<u16, ConfigError> {
    let value = match port {
        None => return Err(ConfigError::MissingPort),
        Some(PortValue::Integer(n)) => *n,
        Some(PortValue::Float(x)) if x.is_finite() && x.fract() == 0.0 => {
            debug!("accepting integral float port {x}");
            *x as i64
        }
        Some(other) => return Err(ConfigError::PortNotInteger(other.to_string())),
    };

    u16::try_from(value)
        .ok()
        .filter(|p| *p != 0)
        .ok_or(ConfigError::PortOutOfRange(value))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
