//! Mapping sequence catalogue
//!
//! The ordered list of logical buttons the capture wizard walks through.
//! Order defines the capture sequence; keys are unique.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::ConfigError;

/// A named control slot, independent of device numbering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicalButton {
    /// Identifier stored in the mapping file
    pub key: String,
    /// Prompt shown while this button is being captured
    pub instruction: String,
    /// Must be bound for a mapping to validate
    #[serde(default)]
    pub required: bool,
}

impl LogicalButton {
    pub fn new(key: &str, instruction: &str, required: bool) -> Self {
        Self {
            key: key.to_string(),
            instruction: instruction.to_string(),
            required,
        }
    }
}

// (key, instruction, required)
const STANDARD_SEQUENCE: &[(&str, &str, bool)] = &[
    ("a", "Press the bottom face button (A / Cross)", true),
    ("b", "Press the right face button (B / Circle)", true),
    ("x", "Press the left face button (X / Square)", true),
    ("y", "Press the top face button (Y / Triangle)", true),
    ("dpup", "Press D-pad UP", false),
    ("dpdown", "Press D-pad DOWN", false),
    ("dpleft", "Press D-pad LEFT", false),
    ("dpright", "Press D-pad RIGHT", false),
    ("leftshoulder", "Press the left shoulder button (L1)", false),
    ("rightshoulder", "Press the right shoulder button (R1)", false),
    ("lefttrigger", "Press the left trigger (L2)", false),
    ("righttrigger", "Press the right trigger (R2)", false),
    ("start", "Press START", false),
    ("back", "Press SELECT", false),
    ("guide", "Press the MENU / home button", false),
    ("leftstick", "Click the left stick (L3)", false),
    ("rightstick", "Click the right stick (R3)", false),
];

/// Ordered, read-only list of logical buttons
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalogue {
    buttons: Vec<LogicalButton>,
}

impl Catalogue {
    /// Build a catalogue, rejecting empty lists and duplicate keys
    pub fn new(buttons: Vec<LogicalButton>) -> Result<Self, ConfigError> {
        if buttons.is_empty() {
            return Err(ConfigError::Invalid("catalogue has no buttons".to_string()));
        }

        let mut seen = HashSet::new();
        for button in &buttons {
            if !seen.insert(button.key.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate catalogue key '{}'",
                    button.key
                )));
            }
        }

        Ok(Self { buttons })
    }

    /// Face buttons, d-pad, shoulders and triggers, start/select/menu, stick clicks
    pub fn standard() -> Self {
        Self {
            buttons: STANDARD_SEQUENCE
                .iter()
                .map(|(key, instruction, required)| LogicalButton::new(key, instruction, *required))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }

    /// Get the button at a 1-based step number
    pub fn step(&self, step: usize) -> Option<&LogicalButton> {
        step.checked_sub(1).and_then(|index| self.buttons.get(index))
    }

    pub fn get(&self, key: &str) -> Option<&LogicalButton> {
        self.buttons.iter().find(|b| b.key == key)
    }

    pub fn position(&self, key: &str) -> Option<usize> {
        self.buttons.iter().position(|b| b.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogicalButton> {
        self.buttons.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.buttons.iter().map(|b| b.key.as_str())
    }

    pub fn required(&self) -> impl Iterator<Item = &LogicalButton> {
        self.buttons.iter().filter(|b| b.required)
    }
}

impl Default for Catalogue {
    fn default() -> Self {
        Self::standard()
    }
}
