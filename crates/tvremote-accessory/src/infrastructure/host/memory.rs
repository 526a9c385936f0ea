//! In-memory capability host.
//!
//! [`InMemoryHost`] plays the part of the smart-home host: the accessory
//! registers its services and hooks into it, and the CLI drives it by
//! reading and writing characteristics.
//!
//! # Read/write semantics
//!
//! - `read` calls the get hook when one is registered, otherwise returns the
//!   stored value.
//! - `write` calls the set hook when one is registered and stores the value
//!   only after the hook succeeds.  Without a hook the value is stored
//!   directly.
//! - `write_with_callback` runs `write` on a spawned task and reports the
//!   outcome to a completion callback exactly once.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use tvremote_core::{Characteristic, CharacteristicValue, ServiceKind};

use crate::application::registry::{
    AccessoryError, CapabilityRegistry, GetHook, ServiceId, ServiceSpec, SetHook,
};

/// Errors reported by the host to whoever drives it.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("unknown service {0:?}")]
    UnknownService(ServiceId),

    /// Read of a characteristic that has neither a hook nor a stored value.
    #[error("characteristic {characteristic} of service {service:?} has no value")]
    NoValue {
        service: ServiceId,
        characteristic: Characteristic,
    },

    #[error(transparent)]
    Accessory(#[from] AccessoryError),
}

type Key = (ServiceId, Characteristic);

/// Services, stored values, and hooks of one accessory.
#[derive(Default)]
pub struct InMemoryHost {
    services: Vec<ServiceSpec>,
    links: Vec<(ServiceId, ServiceId)>,
    values: Mutex<HashMap<Key, CharacteristicValue>>,
    get_hooks: HashMap<Key, GetHook>,
    set_hooks: HashMap<Key, SetHook>,
}

impl InMemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn service(&self, id: ServiceId) -> Option<&ServiceSpec> {
        self.services.get(id.0)
    }

    /// Finds the first service of `kind`, optionally narrowed by `subtype`.
    pub fn find_service(&self, kind: ServiceKind, subtype: Option<&str>) -> Option<ServiceId> {
        self.services
            .iter()
            .position(|s| s.kind == kind && subtype.map_or(true, |st| s.subtype == st))
            .map(ServiceId)
    }

    /// Services linked under `parent`, in link order.
    pub fn linked_services(&self, parent: ServiceId) -> Vec<ServiceId> {
        self.links
            .iter()
            .filter(|(p, _)| *p == parent)
            .map(|(_, child)| *child)
            .collect()
    }

    /// Stored value of a characteristic, bypassing hooks.
    pub fn value(&self, service: ServiceId, characteristic: Characteristic) -> Option<CharacteristicValue> {
        self.lock_values().get(&(service, characteristic)).cloned()
    }

    /// Reads a characteristic the way a host client would.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::UnknownService`], [`HostError::NoValue`], or the
    /// get hook's error.
    pub async fn read(
        &self,
        service: ServiceId,
        characteristic: Characteristic,
    ) -> Result<CharacteristicValue, HostError> {
        self.check_service(service)?;
        if let Some(hook) = self.get_hooks.get(&(service, characteristic)) {
            debug!("get {characteristic} on {service:?} via hook");
            return Ok(hook().await?);
        }
        self.value(service, characteristic)
            .ok_or(HostError::NoValue { service, characteristic })
    }

    /// Writes a characteristic the way a host client would.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::UnknownService`] or the set hook's error; the
    /// stored value is left unchanged on error.
    pub async fn write(
        &self,
        service: ServiceId,
        characteristic: Characteristic,
        value: CharacteristicValue,
    ) -> Result<(), HostError> {
        self.check_service(service)?;
        if let Some(hook) = self.set_hooks.get(&(service, characteristic)) {
            debug!("set {characteristic} on {service:?} => {value}");
            hook(value.clone()).await?;
        }
        self.lock_values().insert((service, characteristic), value);
        Ok(())
    }

    /// Runs [`write`](Self::write) in the background and hands its outcome to
    /// `callback`, which is invoked exactly once.
    pub fn write_with_callback<F>(
        self: &Arc<Self>,
        service: ServiceId,
        characteristic: Characteristic,
        value: CharacteristicValue,
        callback: F,
    ) -> JoinHandle<()>
    where
        F: FnOnce(Result<(), HostError>) + Send + 'static,
    {
        let host = Arc::clone(self);
        tokio::spawn(async move {
            let result = host.write(service, characteristic, value).await;
            if let Err(e) = &result {
                warn!("write of {characteristic} on {service:?} failed: {e}");
            }
            callback(result);
        })
    }

    fn check_service(&self, service: ServiceId) -> Result<(), HostError> {
        match self.services.get(service.0) {
            Some(_) => Ok(()),
            None => Err(HostError::UnknownService(service)),
        }
    }

    fn lock_values(&self) -> std::sync::MutexGuard<'_, HashMap<Key, CharacteristicValue>> {
        self.values.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CapabilityRegistry for InMemoryHost {
    fn add_service(&mut self, spec: ServiceSpec) -> ServiceId {
        debug!("add service {:?} '{}' ({})", spec.kind, spec.display_name, spec.subtype);
        self.services.push(spec);
        ServiceId(self.services.len() - 1)
    }

    fn link_service(&mut self, parent: ServiceId, child: ServiceId) {
        self.links.push((parent, child));
    }

    fn set_value(&mut self, service: ServiceId, characteristic: Characteristic, value: CharacteristicValue) {
        self.lock_values().insert((service, characteristic), value);
    }

    fn on_get(&mut self, service: ServiceId, characteristic: Characteristic, hook: GetHook) {
        self.get_hooks.insert((service, characteristic), hook);
    }

    fn on_set(&mut self, service: ServiceId, characteristic: Characteristic, hook: SetHook) {
        self.set_hooks.insert((service, characteristic), hook);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
