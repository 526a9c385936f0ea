//! Integration tests for the command mapper through the crate's public API.
//!
//! These tests walk each host event the accessory handles and check the
//! exact key codes, and their wire frames, that reach the device.

use tvremote_core::{
    decode_key_event, encode_key_event, resolve_input_selection, resolve_mute, resolve_remote_key,
    resolve_volume, InputFallthrough, KeyCode, KeySequence, PlayState, RemoteAction, RemoteKey,
    VolumeSelector, INPUT_SOURCES,
};

/// Flattens every sequence an input selection produces into one list of codes.
fn flattened(identifier: u32, policy: InputFallthrough) -> Vec<u32> {
    let mut all = KeySequence::new();
    for seq in resolve_input_selection(identifier, policy) {
        all.extend_from(&seq);
    }
    all.iter().map(|k| k.value()).collect()
}

#[test]
fn test_every_listed_input_produces_a_macro() {
    for input in INPUT_SOURCES {
        let seqs = resolve_input_selection(input.identifier, InputFallthrough::Corrected);
        assert!(!seqs.is_empty(), "input {} must send something", input.name);
    }
}

#[test]
fn test_playstation_macro_frames_decode_in_order() {
    // Arrange
    let seqs = resolve_input_selection(3, InputFallthrough::Corrected);

    // Act: encode each key as the sender would, then decode as the device would.
    let decoded: Vec<KeyCode> = seqs[0]
        .iter()
        .map(|&k| decode_key_event(&encode_key_event(k)).unwrap().0)
        .collect();

    // Assert
    let expected: Vec<KeyCode> = [178, 21, 21, 21, 22, 22, 66].into_iter().map(KeyCode).collect();
    assert_eq!(decoded, expected);
}

#[test]
fn test_menu_input_with_fallthrough_sends_both_macros() {
    assert_eq!(flattened(1, InputFallthrough::Reproduce), vec![3, 178, 21, 21, 21, 22, 66]);
    assert_eq!(flattened(1, InputFallthrough::Corrected), vec![3]);
}

#[test]
fn test_navigation_keys_cover_the_remote_widget() {
    let table = [
        (RemoteKey::ArrowUp, 19),
        (RemoteKey::ArrowDown, 20),
        (RemoteKey::ArrowLeft, 21),
        (RemoteKey::ArrowRight, 22),
        (RemoteKey::Select, 66),
        (RemoteKey::Back, 4),
        (RemoteKey::Information, 82),
    ];

    for (key, code) in table {
        match resolve_remote_key(key) {
            RemoteAction::Send { key: sent, .. } => assert_eq!(sent.value(), code, "{key:?}"),
            other => panic!("{key:?} resolved to {other:?}"),
        }
    }
}

#[test]
fn test_play_pause_state_is_shared_across_presses() {
    let state = PlayState::new();

    assert_eq!(resolve_remote_key(RemoteKey::PlayPause), RemoteAction::TogglePlayback);
    assert_eq!(state.toggle(), KeyCode(126));
    assert!(state.is_playing());
    assert_eq!(state.toggle(), KeyCode(127));
    assert!(!state.is_playing());
}

#[test]
fn test_speaker_keys() {
    assert_eq!(resolve_volume(VolumeSelector::from_value(0)), KeyCode(24));
    assert_eq!(resolve_volume(VolumeSelector::from_value(1)), KeyCode(25));
    assert_eq!(resolve_mute(), KeyCode(164));
}
