//! Static input sources exposed by the accessory.
//!
//! The projector has no input-switch command.  Each "input" is really a
//! navigation macro (see [`crate::domain::command::resolve_input_selection`]);
//! this table only carries the labels and metadata the host displays.

use serde::{Deserialize, Serialize};

/// Identifier of the input that is active when the accessory starts.
pub const DEFAULT_ACTIVE_IDENTIFIER: u32 = 1;

/// Kind of physical input, as reported to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum InputSourceType {
    Other = 0,
    Hdmi = 3,
}

/// One selectable input of the television service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputSource {
    /// Value the host writes to `ActiveIdentifier` to select this input.
    pub identifier: u32,
    /// Human-readable label.
    pub name: &'static str,
    /// Service subtype distinguishing the input services from one another.
    pub subtype: &'static str,
    pub kind: InputSourceType,
}

/// All inputs, in identifier order.
pub const INPUT_SOURCES: [InputSource; 3] = [
    InputSource {
        identifier: 1,
        name: "Menu",
        subtype: "menu",
        kind: InputSourceType::Other,
    },
    InputSource {
        identifier: 2,
        name: "Apple TV",
        subtype: "hdmi1",
        kind: InputSourceType::Hdmi,
    },
    InputSource {
        identifier: 3,
        name: "PlayStation",
        subtype: "hdmi2",
        kind: InputSourceType::Hdmi,
    },
];

/// Returns the label of input `identifier`, or `None` if no such input exists.
pub fn input_label(identifier: u32) -> Option<&'static str> {
    INPUT_SOURCES
        .iter()
        .find(|input| input.identifier == identifier)
        .map(|input| input.name)
}
