//! The capability registry the accessory publishes itself into.
//!
//! A smart-home host exposes devices as services with readable/writable
//! characteristics.  The accessory depends only on this trait; the host
//! integration layer supplies the implementation (see
//! `infrastructure::host::InMemoryHost`).
//!
//! Hooks are asynchronous: a set hook returns a boxed future resolving to
//! the outcome of the write, and the host decides how to report it (await
//! it, or adapt it to a completion callback).

use std::sync::Arc;

use futures_util::future::BoxFuture;
use thiserror::Error;
use tvremote_core::{Characteristic, CharacteristicValue, ServiceKind};

use crate::application::send_keys::SendError;

/// Error reported by a characteristic hook.
#[derive(Debug, Error)]
pub enum AccessoryError {
    /// Transmitting the key sequence to the device failed.
    #[error(transparent)]
    Transport(#[from] SendError),

    /// The written value has the wrong type for the characteristic.
    #[error("invalid value {value} for characteristic {characteristic}")]
    InvalidValue {
        characteristic: Characteristic,
        value: CharacteristicValue,
    },
}

/// Handle to a service registered with a [`CapabilityRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ServiceId(pub usize);

/// Description of a service to publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSpec {
    pub kind: ServiceKind,
    pub display_name: String,
    /// Distinguishes several services of the same kind.
    pub subtype: String,
}

impl ServiceSpec {
    pub fn new(kind: ServiceKind, display_name: impl Into<String>, subtype: impl Into<String>) -> Self {
        Self {
            kind,
            display_name: display_name.into(),
            subtype: subtype.into(),
        }
    }
}

/// Hook invoked when the host reads a characteristic.
pub type GetHook =
    Arc<dyn Fn() -> BoxFuture<'static, Result<CharacteristicValue, AccessoryError>> + Send + Sync>;

/// Hook invoked when the host writes a characteristic.
pub type SetHook =
    Arc<dyn Fn(CharacteristicValue) -> BoxFuture<'static, Result<(), AccessoryError>> + Send + Sync>;

/// Registry of services and per-characteristic hooks, implemented by the host.
pub trait CapabilityRegistry {
    /// Publishes a service and returns its handle.
    fn add_service(&mut self, spec: ServiceSpec) -> ServiceId;

    /// Marks `child` as belonging to `parent` (inputs and speaker of a TV).
    fn link_service(&mut self, parent: ServiceId, child: ServiceId);

    /// Sets the stored value of a characteristic without invoking hooks.
    fn set_value(&mut self, service: ServiceId, characteristic: Characteristic, value: CharacteristicValue);

    fn on_get(&mut self, service: ServiceId, characteristic: Characteristic, hook: GetHook);

    fn on_set(&mut self, service: ServiceId, characteristic: Characteristic, hook: SetHook);
}
