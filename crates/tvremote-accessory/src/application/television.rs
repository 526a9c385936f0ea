//! TelevisionAccessory: the projector presented as a television.
//!
//! This use case owns the [`KeySender`] and the play/pause flag, publishes
//! the service graph into a [`CapabilityRegistry`], and turns each
//! characteristic write into a key sequence via the command mapper in
//! `tvremote-core`.
//!
//! # Service graph
//!
//! ```text
//! Television ("<name>", subtype "Projector")
//!  ├─ InputSource "Menu"        (identifier 1)
//!  ├─ InputSource "Apple TV"    (identifier 2)
//!  ├─ InputSource "PlayStation" (identifier 3)
//!  └─ TelevisionSpeaker "<name> Speaker"
//! ```
//!
//! Power is not controllable: `Active` always reads `1` and writes are
//! acknowledged without sending anything.

use std::future::Future;
use std::sync::Arc;

use futures_util::FutureExt;
use tracing::{debug, info, warn};
use tvremote_core::{
    input_label, resolve_input_selection, resolve_mute, resolve_remote_key, resolve_volume,
    AccessoryConfig, Characteristic, CharacteristicValue, InputFallthrough, PlayState, RemoteAction,
    RemoteKey, ServiceKind, VolumeSelector, DEFAULT_ACTIVE_IDENTIFIER, INPUT_SOURCES,
};

use crate::application::registry::{
    AccessoryError, CapabilityRegistry, GetHook, ServiceId, ServiceSpec, SetHook,
};
use crate::application::send_keys::{KeySender, KeyTransport};

/// Value of `Active` meaning "on".
const ACTIVE_ON: i64 = 1;
/// `SleepDiscoveryMode` value meaning "always discoverable".
const ALWAYS_DISCOVERABLE: i64 = 1;
/// `IsConfigured` value meaning "configured".
const CONFIGURED: i64 = 1;
/// `VolumeControlType` value meaning relative (up/down) control.
const VOLUME_CONTROL_RELATIVE: i64 = 1;

/// Handles to the services published by [`TelevisionAccessory::register`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedServices {
    pub television: ServiceId,
    /// Input source services in identifier order.
    pub inputs: Vec<ServiceId>,
    pub speaker: ServiceId,
}

/// The television accessory.
pub struct TelevisionAccessory {
    name: String,
    sender: KeySender,
    input_fallthrough: InputFallthrough,
    play_state: PlayState,
}

impl TelevisionAccessory {
    /// Creates the accessory for a validated configuration.
    pub fn new(config: &AccessoryConfig, transport: Arc<dyn KeyTransport>) -> Self {
        Self::with_sender(
            config.name.clone(),
            KeySender::new(config.endpoint.clone(), transport),
            config.input_fallthrough,
        )
    }

    /// Creates the accessory around an existing sender.
    pub fn with_sender(name: String, sender: KeySender, input_fallthrough: InputFallthrough) -> Self {
        if input_fallthrough == InputFallthrough::Reproduce {
            warn!(
                "menu input fallthrough is enabled: selecting input 1 will also run the {} macro",
                input_label(2).unwrap_or("input 2")
            );
        }
        Self {
            name,
            sender,
            input_fallthrough,
            play_state: PlayState::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current guess of the device's playback state.
    pub fn is_playing(&self) -> bool {
        self.play_state.is_playing()
    }

    // ── Typed handlers ────────────────────────────────────────────────────────

    /// Power state reported to the host; always on.
    pub fn active(&self) -> i64 {
        debug!("get Active => always ON");
        ACTIVE_ON
    }

    /// Power toggle; ignored.
    pub fn set_active(&self, value: &CharacteristicValue) {
        debug!("set Active => ignoring power toggle to {value}");
    }

    /// Selects input `identifier`.  Unknown identifiers are ignored.
    ///
    /// # Errors
    ///
    /// Returns the first transport failure; with input fallthrough enabled a
    /// failure in the first macro skips the second.
    pub async fn select_input(&self, identifier: u32) -> Result<(), AccessoryError> {
        let Some(label) = input_label(identifier) else {
            info!("INPUT: ignoring unknown input identifier {identifier}");
            return Ok(());
        };
        info!("INPUT: Switching to => {label}");

        for keys in resolve_input_selection(identifier, self.input_fallthrough) {
            self.sender.send(keys).await?;
        }
        Ok(())
    }

    /// Handles a raw `RemoteKey` value.  Keys without a device equivalent
    /// are acknowledged without sending.
    ///
    /// # Errors
    ///
    /// Returns the transport failure, if any.  For play/pause the flag has
    /// already flipped by then.
    pub async fn press_remote_key(&self, raw: i64) -> Result<(), AccessoryError> {
        debug!("remote key pressed: {raw}");

        let action = RemoteKey::from_value(raw).map_or(RemoteAction::Unhandled, resolve_remote_key);
        match action {
            RemoteAction::Send { label, key } => {
                info!("REMOTE: {label}");
                self.sender.send(key).await?;
            }
            RemoteAction::TogglePlayback => {
                let key = self.play_state.toggle();
                info!("REMOTE: {}", if self.play_state.is_playing() { "Play" } else { "Pause" });
                self.sender.send(key).await?;
            }
            RemoteAction::Unhandled => info!("REMOTE: Unhandled key => {raw}"),
        }
        Ok(())
    }

    /// Toggles mute on the device.  The requested state is not tracked; the
    /// same key is sent every time.
    pub async fn set_mute(&self, requested: &CharacteristicValue) -> Result<(), AccessoryError> {
        debug!("set Mute => {requested}");
        info!("SPEAKER: Mute");
        self.sender.send(resolve_mute()).await?;
        Ok(())
    }

    /// Steps the volume: `0` is up, anything else is down.
    pub async fn set_volume_selector(&self, raw: i64) -> Result<(), AccessoryError> {
        let selector = VolumeSelector::from_value(raw);
        match selector {
            VolumeSelector::Increment => info!("SPEAKER: Volume Up"),
            VolumeSelector::Decrement => info!("SPEAKER: Volume Down"),
        }
        self.sender.send(resolve_volume(selector)).await?;
        Ok(())
    }

    // ── Registration ──────────────────────────────────────────────────────────

    /// Publishes the television, its inputs, and its speaker, and wires the
    /// characteristic hooks to the handlers above.
    pub fn register(self: &Arc<Self>, registry: &mut dyn CapabilityRegistry) -> PublishedServices {
        let television = registry.add_service(ServiceSpec::new(
            ServiceKind::Television,
            self.name.clone(),
            "Projector",
        ));
        registry.set_value(television, Characteristic::ConfiguredName, self.name.clone().into());
        registry.set_value(
            television,
            Characteristic::SleepDiscoveryMode,
            ALWAYS_DISCOVERABLE.into(),
        );
        registry.set_value(
            television,
            Characteristic::ActiveIdentifier,
            DEFAULT_ACTIVE_IDENTIFIER.into(),
        );

        let this = Arc::clone(self);
        let active_get: GetHook = Arc::new(move || {
            let value = CharacteristicValue::Int(this.active());
            async move { Ok::<_, AccessoryError>(value) }.boxed()
        });
        registry.on_get(television, Characteristic::Active, active_get);
        registry.on_set(
            television,
            Characteristic::Active,
            set_hook(self, |tv, value| async move {
                tv.set_active(&value);
                Ok(())
            }),
        );
        registry.on_set(
            television,
            Characteristic::ActiveIdentifier,
            set_hook(self, |tv, value| async move {
                let raw = int_value(Characteristic::ActiveIdentifier, value)?;
                match u32::try_from(raw) {
                    Ok(identifier) => tv.select_input(identifier).await,
                    Err(_) => {
                        info!("INPUT: ignoring unknown input identifier {raw}");
                        Ok(())
                    }
                }
            }),
        );
        registry.on_set(
            television,
            Characteristic::RemoteKey,
            set_hook(self, |tv, value| async move {
                let raw = int_value(Characteristic::RemoteKey, value)?;
                tv.press_remote_key(raw).await
            }),
        );

        let mut inputs = Vec::with_capacity(INPUT_SOURCES.len());
        for input in INPUT_SOURCES {
            let service = registry.add_service(ServiceSpec::new(
                ServiceKind::InputSource,
                input.name,
                input.subtype,
            ));
            registry.set_value(service, Characteristic::Identifier, input.identifier.into());
            registry.set_value(service, Characteristic::ConfiguredName, input.name.into());
            registry.set_value(service, Characteristic::IsConfigured, CONFIGURED.into());
            registry.set_value(
                service,
                Characteristic::InputSourceType,
                i64::from(input.kind as u8).into(),
            );
            registry.link_service(television, service);
            inputs.push(service);
        }

        let speaker = registry.add_service(ServiceSpec::new(
            ServiceKind::TelevisionSpeaker,
            format!("{} Speaker", self.name),
            "TelevisionSpeaker",
        ));
        registry.set_value(speaker, Characteristic::Active, ACTIVE_ON.into());
        registry.set_value(
            speaker,
            Characteristic::VolumeControlType,
            VOLUME_CONTROL_RELATIVE.into(),
        );
        registry.on_set(
            speaker,
            Characteristic::Mute,
            set_hook(self, |tv, value| async move { tv.set_mute(&value).await }),
        );
        registry.on_set(
            speaker,
            Characteristic::VolumeSelector,
            set_hook(self, |tv, value| async move {
                let raw = int_value(Characteristic::VolumeSelector, value)?;
                tv.set_volume_selector(raw).await
            }),
        );
        registry.link_service(television, speaker);

        info!("registered television accessory '{}' -> {}", self.name, self.sender.endpoint());

        PublishedServices {
            television,
            inputs,
            speaker,
        }
    }
}

/// Builds a [`SetHook`] that calls `handler` with a fresh clone of the
/// accessory for every write.
fn set_hook<F, Fut>(accessory: &Arc<TelevisionAccessory>, handler: F) -> SetHook
where
    F: Fn(Arc<TelevisionAccessory>, CharacteristicValue) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), AccessoryError>> + Send + 'static,
{
    let accessory = Arc::clone(accessory);
    Arc::new(move |value| handler(Arc::clone(&accessory), value).boxed())
}

fn int_value(characteristic: Characteristic, value: CharacteristicValue) -> Result<i64, AccessoryError> {
    value
        .as_int()
        .ok_or(AccessoryError::InvalidValue { characteristic, value })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio_test::{assert_err, assert_ok};
    use tvremote_core::{DeviceEndpoint, KeyCode};

    use super::*;
    use crate::application::send_keys::TransportError;

    #[derive(Default)]
    struct RecordingTransport {
        sent: Mutex<Vec<KeyCode>>,
        fail_at: Option<usize>,
    }

    impl RecordingTransport {
        fn keys(&self) -> Vec<u32> {
            self.sent.lock().unwrap().iter().map(|k| k.value()).collect()
        }
    }

    #[async_trait]
    impl KeyTransport for RecordingTransport {
        async fn send_key(
            &self,
            endpoint: &DeviceEndpoint,
            key: KeyCode,
        ) -> Result<(), TransportError> {
            let mut sent = self.sent.lock().unwrap();
            sent.push(key);
            if self.fail_at == Some(sent.len()) {
                return Err(TransportError::Connect {
                    endpoint: endpoint.to_string(),
                    source: std::io::ErrorKind::ConnectionRefused.into(),
                });
            }
            Ok(())
        }
    }

    /// Registry fake that keeps everything in maps keyed by service handle.
    #[derive(Default)]
    struct RecordingRegistry {
        services: Vec<ServiceSpec>,
        links: Vec<(ServiceId, ServiceId)>,
        values: HashMap<(ServiceId, Characteristic), CharacteristicValue>,
        get_hooks: HashMap<(ServiceId, Characteristic), GetHook>,
        set_hooks: HashMap<(ServiceId, Characteristic), SetHook>,
    }

    impl CapabilityRegistry for RecordingRegistry {
        fn add_service(&mut self, spec: ServiceSpec) -> ServiceId {
            self.services.push(spec);
            ServiceId(self.services.len() - 1)
        }

        fn link_service(&mut self, parent: ServiceId, child: ServiceId) {
            self.links.push((parent, child));
        }

        fn set_value(&mut self, service: ServiceId, c: Characteristic, value: CharacteristicValue) {
            self.values.insert((service, c), value);
        }

        fn on_get(&mut self, service: ServiceId, c: Characteristic, hook: GetHook) {
            self.get_hooks.insert((service, c), hook);
        }

        fn on_set(&mut self, service: ServiceId, c: Characteristic, hook: SetHook) {
            self.set_hooks.insert((service, c), hook);
        }
    }

    fn make_accessory(
        transport: RecordingTransport,
        fallthrough: InputFallthrough,
    ) -> (Arc<TelevisionAccessory>, Arc<RecordingTransport>) {
        let transport = Arc::new(transport);
        let endpoint = DeviceEndpoint::new("projector.test", 9999).unwrap();
        let sender = KeySender::new(endpoint, Arc::clone(&transport) as Arc<dyn KeyTransport>)
            .with_inter_key_delay(Duration::ZERO);
        let tv = TelevisionAccessory::with_sender("Projector".to_string(), sender, fallthrough);
        (Arc::new(tv), transport)
    }

    fn default_accessory() -> (Arc<TelevisionAccessory>, Arc<RecordingTransport>) {
        make_accessory(RecordingTransport::default(), InputFallthrough::Corrected)
    }

    // ── Power ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_power_always_reports_on() {
        let (tv, _) = default_accessory();
        assert_eq!(tv.active(), 1);
    }

    #[test]
    fn test_power_toggle_sends_nothing() {
        let (tv, transport) = default_accessory();
        tv.set_active(&CharacteristicValue::Int(0));
        assert!(transport.keys().is_empty());
    }

    // ── Input selection ───────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_select_input_three_sends_playstation_macro() {
        let (tv, transport) = default_accessory();
        assert_ok!(tv.select_input(3).await);
        assert_eq!(transport.keys(), vec![178, 21, 21, 21, 22, 22, 66]);
    }

    #[tokio::test]
    async fn test_select_input_one_corrected_sends_home_only() {
        let (tv, transport) = default_accessory();
        assert_ok!(tv.select_input(1).await);
        assert_eq!(transport.keys(), vec![3]);
    }

    #[tokio::test]
    async fn test_select_input_one_with_fallthrough_sends_both_macros() {
        let (tv, transport) = make_accessory(RecordingTransport::default(), InputFallthrough::Reproduce);
        assert_ok!(tv.select_input(1).await);
        assert_eq!(transport.keys(), vec![3, 178, 21, 21, 21, 22, 66]);
    }

    #[tokio::test]
    async fn test_fallthrough_failure_in_first_macro_skips_second() {
        let transport = RecordingTransport {
            fail_at: Some(1),
            ..Default::default()
        };
        let (tv, transport) = make_accessory(transport, InputFallthrough::Reproduce);

        assert_err!(tv.select_input(1).await);
        assert_eq!(transport.keys(), vec![3]);
    }

    #[tokio::test]
    async fn test_select_unknown_input_is_ignored() {
        let (tv, transport) = default_accessory();
        assert_ok!(tv.select_input(7).await);
        assert!(transport.keys().is_empty());
    }

    // ── Remote keys ───────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_remote_arrow_up_sends_19() {
        let (tv, transport) = default_accessory();
        assert_ok!(tv.press_remote_key(RemoteKey::ArrowUp as i64).await);
        assert_eq!(transport.keys(), vec![19]);
    }

    #[tokio::test]
    async fn test_unrecognized_remote_key_sends_nothing() {
        let (tv, transport) = default_accessory();
        assert_ok!(tv.press_remote_key(42).await);
        assert_ok!(tv.press_remote_key(RemoteKey::Rewind as i64).await);
        assert!(transport.keys().is_empty());
    }

    #[tokio::test]
    async fn test_play_pause_alternates_play_and_pause() {
        // Arrange
        let (tv, transport) = default_accessory();
        let play_pause = RemoteKey::PlayPause as i64;

        // Act / Assert: first press plays.
        assert_ok!(tv.press_remote_key(play_pause).await);
        assert!(tv.is_playing());

        // Second press pauses.
        assert_ok!(tv.press_remote_key(play_pause).await);
        assert!(!tv.is_playing());

        assert_eq!(transport.keys(), vec![126, 127]);
    }

    #[tokio::test]
    async fn test_play_flag_flips_even_when_send_fails() {
        let transport = RecordingTransport {
            fail_at: Some(1),
            ..Default::default()
        };
        let (tv, _) = make_accessory(transport, InputFallthrough::Corrected);

        assert_err!(tv.press_remote_key(RemoteKey::PlayPause as i64).await);
        assert!(tv.is_playing());
    }

    // ── Speaker ───────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_mute_sends_same_key_for_either_value() {
        let (tv, transport) = default_accessory();
        assert_ok!(tv.set_mute(&CharacteristicValue::Bool(true)).await);
        assert_ok!(tv.set_mute(&CharacteristicValue::Bool(false)).await);
        assert_eq!(transport.keys(), vec![164, 164]);
    }

    #[tokio::test]
    async fn test_volume_selector_maps_zero_to_up_and_rest_to_down() {
        let (tv, transport) = default_accessory();
        assert_ok!(tv.set_volume_selector(0).await);
        assert_ok!(tv.set_volume_selector(1).await);
        assert_eq!(transport.keys(), vec![24, 25]);
    }

    // ── Registration ──────────────────────────────────────────────────────────

    #[test]
    fn test_register_publishes_television_inputs_and_speaker() {
        // Arrange
        let (tv, _) = default_accessory();
        let mut registry = RecordingRegistry::default();

        // Act
        let published = tv.register(&mut registry);

        // Assert
        assert_eq!(registry.services.len(), 5);
        assert_eq!(registry.services[published.television.0].kind, ServiceKind::Television);
        assert_eq!(registry.services[published.speaker.0].display_name, "Projector Speaker");
        assert_eq!(published.inputs.len(), 3);
        assert_eq!(registry.links.len(), 4);
        assert!(registry.links.iter().all(|(parent, _)| *parent == published.television));
    }

    #[test]
    fn test_register_sets_static_characteristics() {
        let (tv, _) = default_accessory();
        let mut registry = RecordingRegistry::default();
        let published = tv.register(&mut registry);

        let value = |s: ServiceId, c: Characteristic| registry.values.get(&(s, c)).cloned();
        assert_eq!(
            value(published.television, Characteristic::ActiveIdentifier),
            Some(CharacteristicValue::Int(1))
        );
        assert_eq!(
            value(published.television, Characteristic::ConfiguredName),
            Some(CharacteristicValue::Text("Projector".into()))
        );
        assert_eq!(
            value(published.inputs[2], Characteristic::ConfiguredName),
            Some(CharacteristicValue::Text("PlayStation".into()))
        );
        assert_eq!(
            value(published.inputs[1], Characteristic::InputSourceType),
            Some(CharacteristicValue::Int(3))
        );
        assert_eq!(
            value(published.speaker, Characteristic::VolumeControlType),
            Some(CharacteristicValue::Int(1))
        );
    }

    #[tokio::test]
    async fn test_registered_remote_key_hook_sends_key() {
        let (tv, transport) = default_accessory();
        let mut registry = RecordingRegistry::default();
        let published = tv.register(&mut registry);

        let hook = registry.set_hooks[&(published.television, Characteristic::RemoteKey)].clone();
        assert_ok!(hook(CharacteristicValue::Int(RemoteKey::Back as i64)).await);

        assert_eq!(transport.keys(), vec![4]);
    }

    #[tokio::test]
    async fn test_registered_active_get_hook_reports_on() {
        let (tv, _) = default_accessory();
        let mut registry = RecordingRegistry::default();
        let published = tv.register(&mut registry);

        let hook = registry.get_hooks[&(published.television, Characteristic::Active)].clone();
        let value = assert_ok!(hook().await);

        assert_eq!(value, CharacteristicValue::Int(1));
    }

    #[tokio::test]
    async fn test_registered_hook_rejects_text_value() {
        let (tv, transport) = default_accessory();
        let mut registry = RecordingRegistry::default();
        let published = tv.register(&mut registry);

        let hook = registry.set_hooks[&(published.speaker, Characteristic::VolumeSelector)].clone();
        let err = assert_err!(hook(CharacteristicValue::Text("up".into())).await);

        assert!(matches!(
            err,
            AccessoryError::InvalidValue { characteristic: Characteristic::VolumeSelector, .. }
        ));
        assert!(transport.keys().is_empty());
    }

    #[tokio::test]
    async fn test_registered_negative_identifier_is_ignored() {
        let (tv, transport) = default_accessory();
        let mut registry = RecordingRegistry::default();
        let published = tv.register(&mut registry);

        let hook = registry.set_hooks[&(published.television, Characteristic::ActiveIdentifier)].clone();
        assert_ok!(hook(CharacteristicValue::Int(-1)).await);

        assert!(transport.keys().is_empty());
    }
}
