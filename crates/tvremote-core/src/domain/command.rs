//! Command mapper: host-level events translated into key sequences.
//!
//! Every handler here is a pure lookup except play/pause, which consults and
//! flips the single [`PlayState`] flag.
//!
//! | Host event               | Key codes sent                       |
//! |--------------------------|--------------------------------------|
//! | Select input 1 (Menu)    | `[3]`                                |
//! | Select input 2 (Apple TV)| `[178,21,21,21,22,66]`               |
//! | Select input 3 (PS)      | `[178,21,21,21,22,22,66]`            |
//! | Arrow up/down/left/right | `19` / `20` / `21` / `22`            |
//! | Select / Back / Info     | `66` / `4` / `82`                    |
//! | Play/Pause               | `126` when paused, `127` when playing|
//! | Mute (any value)         | `164`                                |
//! | Volume selector 0 / else | `24` / `25`                          |

use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use crate::keymap::code::{KeyCode, KeySequence};

// ── Remote keys ───────────────────────────────────────────────────────────────

/// Remote-control buttons as enumerated by the host's `RemoteKey`
/// characteristic.  The discriminants are the host's raw values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RemoteKey {
    Rewind = 0,
    FastForward = 1,
    NextTrack = 2,
    PreviousTrack = 3,
    ArrowUp = 4,
    ArrowDown = 5,
    ArrowLeft = 6,
    ArrowRight = 7,
    Select = 8,
    Back = 9,
    Exit = 10,
    PlayPause = 11,
    Information = 15,
}

impl RemoteKey {
    /// Parses a raw characteristic value.  Returns `None` for values the host
    /// enumeration does not define.
    pub fn from_value(value: i64) -> Option<Self> {
        Some(match value {
            0 => Self::Rewind,
            1 => Self::FastForward,
            2 => Self::NextTrack,
            3 => Self::PreviousTrack,
            4 => Self::ArrowUp,
            5 => Self::ArrowDown,
            6 => Self::ArrowLeft,
            7 => Self::ArrowRight,
            8 => Self::Select,
            9 => Self::Back,
            10 => Self::Exit,
            11 => Self::PlayPause,
            15 => Self::Information,
            _ => return None,
        })
    }

    /// Parses a button name as typed on a command line (`up`, `select`,
    /// `play-pause`, ...).  Case-insensitive; `_` and `-` are interchangeable.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase().replace('_', "-");
        Some(match name.as_str() {
            "rewind" => Self::Rewind,
            "fast-forward" => Self::FastForward,
            "next" | "next-track" => Self::NextTrack,
            "previous" | "previous-track" => Self::PreviousTrack,
            "up" => Self::ArrowUp,
            "down" => Self::ArrowDown,
            "left" => Self::ArrowLeft,
            "right" => Self::ArrowRight,
            "select" | "ok" | "enter" => Self::Select,
            "back" => Self::Back,
            "exit" => Self::Exit,
            "play-pause" | "playpause" => Self::PlayPause,
            "info" | "information" | "menu" => Self::Information,
            _ => return None,
        })
    }
}

/// What the accessory should do in response to a remote key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteAction {
    /// Send one key code.  `label` is the name used in log lines.
    Send { label: &'static str, key: KeyCode },
    /// Consult and flip the [`PlayState`] flag.
    TogglePlayback,
    /// The device has no equivalent button; acknowledge without sending.
    Unhandled,
}

/// Maps a remote key to the action the accessory performs.
pub fn resolve_remote_key(key: RemoteKey) -> RemoteAction {
    let send = |label, key| RemoteAction::Send { label, key };
    match key {
        RemoteKey::ArrowUp => send("Up", KeyCode::DPAD_UP),
        RemoteKey::ArrowDown => send("Down", KeyCode::DPAD_DOWN),
        RemoteKey::ArrowLeft => send("Left", KeyCode::DPAD_LEFT),
        RemoteKey::ArrowRight => send("Right", KeyCode::DPAD_RIGHT),
        RemoteKey::Select => send("Select", KeyCode::ENTER),
        RemoteKey::Back => send("Back", KeyCode::BACK),
        RemoteKey::Information => send("Menu", KeyCode::MENU),
        RemoteKey::PlayPause => RemoteAction::TogglePlayback,
        RemoteKey::Rewind
        | RemoteKey::FastForward
        | RemoteKey::NextTrack
        | RemoteKey::PreviousTrack
        | RemoteKey::Exit => RemoteAction::Unhandled,
    }
}

// ── Play/pause state ──────────────────────────────────────────────────────────

/// The in-memory "is playing" flag.
///
/// The device never reports its playback state, so the bridge guesses: the
/// first play/pause press is assumed to start playback.  The flag lives for
/// the lifetime of the process and is never persisted.
#[derive(Debug, Default)]
pub struct PlayState {
    playing: AtomicBool,
}

impl PlayState {
    /// Creates a flag in the "not playing" state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current guess.
    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }

    /// Flips the flag and returns the key that matches the state *before*
    /// the flip: [`KeyCode::MEDIA_PAUSE`] if playing, otherwise
    /// [`KeyCode::MEDIA_PLAY`].
    ///
    /// The flip happens up front, independent of whether the key is then
    /// transmitted successfully.
    pub fn toggle(&self) -> KeyCode {
        let was_playing = self.playing.fetch_xor(true, Ordering::SeqCst);
        if was_playing {
            KeyCode::MEDIA_PAUSE
        } else {
            KeyCode::MEDIA_PLAY
        }
    }
}

// ── Input selection ───────────────────────────────────────────────────────────

/// How selecting input 1 behaves.
///
/// The reference plugin's input-1 handler fell through into the input-2
/// handler, so choosing "Menu" also ran the Apple TV macro.  Whether a
/// device needs that second macro has not been confirmed, so both behaviours
/// are available and the choice is made in configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputFallthrough {
    /// Input 1 sends only `[3]`.
    #[default]
    Corrected,
    /// Input 1 sends `[3]` and then the input-2 macro.
    Reproduce,
}

impl InputFallthrough {
    /// Maps the boolean configuration switch to a policy.
    pub fn from_flag(reproduce: bool) -> Self {
        if reproduce {
            Self::Reproduce
        } else {
            Self::Corrected
        }
    }
}

fn apple_tv_macro() -> KeySequence {
    KeySequence::from([
        KeyCode::TV_INPUT,
        KeyCode::DPAD_LEFT,
        KeyCode::DPAD_LEFT,
        KeyCode::DPAD_LEFT,
        KeyCode::DPAD_RIGHT,
        KeyCode::ENTER,
    ])
}

fn playstation_macro() -> KeySequence {
    KeySequence::from([
        KeyCode::TV_INPUT,
        KeyCode::DPAD_LEFT,
        KeyCode::DPAD_LEFT,
        KeyCode::DPAD_LEFT,
        KeyCode::DPAD_RIGHT,
        KeyCode::DPAD_RIGHT,
        KeyCode::ENTER,
    ])
}

/// Returns the key sequences sent when the host selects input `identifier`.
///
/// Each element is one send operation; they are transmitted in order.  An
/// unknown identifier yields no sequences.
pub fn resolve_input_selection(identifier: u32, policy: InputFallthrough) -> Vec<KeySequence> {
    match (identifier, policy) {
        (1, InputFallthrough::Corrected) => vec![KeyCode::HOME.into()],
        (1, InputFallthrough::Reproduce) => vec![KeyCode::HOME.into(), apple_tv_macro()],
        (2, _) => vec![apple_tv_macro()],
        (3, _) => vec![playstation_macro()],
        _ => Vec::new(),
    }
}

// ── Speaker ───────────────────────────────────────────────────────────────────

/// Direction requested through the host's `VolumeSelector` characteristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeSelector {
    Increment,
    Decrement,
}

impl VolumeSelector {
    /// `0` means increment; every other value is treated as decrement.
    pub fn from_value(value: i64) -> Self {
        if value == 0 {
            Self::Increment
        } else {
            Self::Decrement
        }
    }
}

/// Key sent for a volume step.
pub fn resolve_volume(selector: VolumeSelector) -> KeyCode {
    match selector {
        VolumeSelector::Increment => KeyCode::VOLUME_UP,
        VolumeSelector::Decrement => KeyCode::VOLUME_DOWN,
    }
}

/// Key sent for any mute write.  The device only has a mute toggle and the
/// bridge does not track mute state, so the requested value is irrelevant.
pub fn resolve_mute() -> KeyCode {
    KeyCode::VOLUME_MUTE
}

// ── Tests ─────────────────────────────────────────────────────────────────────
