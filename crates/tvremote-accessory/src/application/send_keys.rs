//! KeySender: transmits key sequences to the projector.
//!
//! The device protocol has no framing across keys and no acknowledgement, so
//! every key gets its own connection: connect, write one frame, close, wait
//! for the close to complete.  Keys of one sequence are strictly sequential
//! with a fixed pause between them; the first failure aborts the rest.
//!
//! The actual socket work is behind the [`KeyTransport`] trait.  The TCP
//! implementation lives in `infrastructure::network`; tests use recording
//! fakes.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{error, info};
use tvremote_core::{DeviceEndpoint, KeyCode, KeySequence};

/// Pause inserted between two consecutive keys of a sequence.
pub const INTER_KEY_DELAY: Duration = Duration::from_millis(100);

/// Error raised by a transport for a single key event.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The connection could not be opened (refused, unreachable, DNS, ...).
    #[error("failed to connect to {endpoint}: {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: std::io::Error,
    },

    /// The frame could not be written.
    #[error("failed to write key event to {endpoint}: {source}")]
    Write {
        endpoint: String,
        #[source]
        source: std::io::Error,
    },

    /// The connection failed while shutting down or draining.
    #[error("connection to {endpoint} failed while closing: {source}")]
    Close {
        endpoint: String,
        #[source]
        source: std::io::Error,
    },
}

/// Error returned when a sequence is aborted.
#[derive(Debug, Error)]
#[error("failed to send key {key} ({position} of {total}) to {endpoint}")]
pub struct SendError {
    /// The key whose transmission failed.
    pub key: KeyCode,
    /// 1-based position of `key` in the sequence.
    pub position: usize,
    pub total: usize,
    pub endpoint: String,
    #[source]
    pub source: TransportError,
}

/// Sends one key event to the device.
///
/// Implementations must open a fresh connection for every call and return
/// only once that connection is fully closed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyTransport: Send + Sync {
    async fn send_key(&self, endpoint: &DeviceEndpoint, key: KeyCode) -> Result<(), TransportError>;
}

/// Transmits key sequences to one device endpoint.
pub struct KeySender {
    endpoint: DeviceEndpoint,
    transport: Arc<dyn KeyTransport>,
    inter_key_delay: Duration,
}

impl KeySender {
    /// Creates a sender using the standard [`INTER_KEY_DELAY`].
    pub fn new(endpoint: DeviceEndpoint, transport: Arc<dyn KeyTransport>) -> Self {
        Self {
            endpoint,
            transport,
            inter_key_delay: INTER_KEY_DELAY,
        }
    }

    /// Overrides the pause between keys.
    pub fn with_inter_key_delay(mut self, delay: Duration) -> Self {
        self.inter_key_delay = delay;
        self
    }

    pub fn endpoint(&self) -> &DeviceEndpoint {
        &self.endpoint
    }

    /// Sends `keys` in order.
    ///
    /// An empty sequence succeeds without touching the network.  There is no
    /// pause after the last key.
    ///
    /// # Errors
    ///
    /// Returns [`SendError`] wrapping the first [`TransportError`]; no
    /// further keys are attempted after it.
    pub async fn send(&self, keys: impl Into<KeySequence>) -> Result<(), SendError> {
        let keys = keys.into();
        let total = keys.len();

        for (index, &key) in keys.iter().enumerate() {
            info!("SENDING: KEYEVENT {key} -> {}", self.endpoint);

            if let Err(source) = self.transport.send_key(&self.endpoint, key).await {
                error!("error sending key event to {}: {source}", self.endpoint);
                let err = SendError {
                    key,
                    position: index + 1,
                    total,
                    endpoint: self.endpoint.to_string(),
                    source,
                };
                error!("failed to send keys {keys} to {}: {err}", self.endpoint);
                return Err(err);
            }

            if index + 1 < total {
                tokio::time::sleep(self.inter_key_delay).await;
            }
        }

        info!("all keys sent successfully to {}", self.endpoint);
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
