//! Physical binding records
//!
//! An `InputMapping` is what a capture step stores: which device layer, which
//! kind of control, which id, and for axes and hats which direction.

use crate::event::{Direction, InputId, InputKind, InputSource, RawInput};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    #[error("axis value is neutral and has no direction")]
    NeutralAxis,

    #[error("hat is centered and has no direction")]
    CenteredHat,

    #[error("{0} binding requires a direction")]
    MissingDirection(&'static str),

    #[error("{kind} binding cannot carry direction '{direction}'")]
    UnexpectedDirection {
        kind: &'static str,
        direction: &'static str,
    },

    #[error("keyboard binding needs a key name, got index {0}")]
    KeyboardIndex(u32),

    #[error("{layer} binding needs a numeric id, got '{name}'")]
    DeviceKeyName { layer: &'static str, name: String },

    #[error("keyboard keys can only be bound as buttons, not {0}")]
    KeyboardKind(&'static str),

    #[error("hats are only reported by the joystick layer, not {0}")]
    HatSource(&'static str),
}

/// One physical input bound to a logical button
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputMapping {
    pub source: InputSource,
    pub kind: InputKind,
    pub id: InputId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
}

impl InputMapping {
    pub fn new(source: InputSource, kind: InputKind, id: InputId, direction: Option<Direction>) -> Self {
        Self {
            source,
            kind,
            id,
            direction,
        }
    }

    /// Build the binding a capture step records for `input`.
    ///
    /// The direction is taken from the axis sign or hat position and dropped for
    /// buttons and keys. Neutral axes and centered hats cannot be bound.
    pub fn from_input(input: &RawInput) -> Result<Self, BindingError> {
        let direction = match input {
            RawInput::Axis { .. } => Some(input.direction().ok_or(BindingError::NeutralAxis)?),
            RawInput::Hat { .. } => Some(input.direction().ok_or(BindingError::CenteredHat)?),
            RawInput::Button { .. } | RawInput::Key { .. } => None,
        };

        Ok(Self {
            source: input.source(),
            kind: input.kind(),
            id: input.id(),
            direction,
        })
    }

    /// Whether `input` is an activation of this binding.
    ///
    /// Source, kind and id must be equal. A binding with a direction also needs
    /// the event's derived direction to match; directionless bindings ignore it.
    pub fn matches(&self, input: &RawInput) -> bool {
        if self.source != input.source() || self.kind != input.kind() || self.id != input.id() {
            return false;
        }

        match self.direction {
            Some(direction) => input.direction() == Some(direction),
            None => true,
        }
    }

    /// Structural check for records read back from disk
    pub fn check(&self) -> Result<(), BindingError> {
        match (self.source, &self.id) {
            (InputSource::Keyboard, InputId::Index(index)) => {
                return Err(BindingError::KeyboardIndex(*index));
            }
            (InputSource::Joystick | InputSource::Gamepad, InputId::Key(name)) => {
                return Err(BindingError::DeviceKeyName {
                    layer: self.source.name(),
                    name: name.clone(),
                });
            }
            _ => {}
        }

        if self.source == InputSource::Keyboard && self.kind != InputKind::Button {
            return Err(BindingError::KeyboardKind(self.kind.name()));
        }
        if self.kind == InputKind::Hat && self.source != InputSource::Joystick {
            return Err(BindingError::HatSource(self.source.name()));
        }

        match (self.kind, self.direction) {
            (InputKind::Button, None) => Ok(()),
            (InputKind::Axis, Some(direction)) if direction.is_axis() => Ok(()),
            (InputKind::Hat, Some(direction)) if direction.is_hat() => Ok(()),
            (InputKind::Axis | InputKind::Hat, None) => {
                Err(BindingError::MissingDirection(self.kind.name()))
            }
            (kind, Some(direction)) => Err(BindingError::UnexpectedDirection {
                kind: kind.name(),
                direction: direction.symbol(),
            }),
        }
    }
}

impl fmt::Display for InputMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.source == InputSource::Keyboard {
            return write!(f, "key {}", self.id);
        }
        write!(f, "{} {} {}", self.source.name(), self.kind.name(), self.id)?;
        if let Some(direction) = self.direction {
            write!(f, " {}", direction.symbol())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{DeviceSource, HatDirection};

    #[test]
    fn test_from_button_drops_direction() {
        let binding = InputMapping::from_input(&RawInput::button(DeviceSource::Joystick, 2)).unwrap();
        assert_eq!(binding.kind, InputKind::Button);
        assert_eq!(binding.direction, None);
        assert_eq!(binding.id, InputId::Index(2));
    }

    #[test]
    fn test_from_neutral_inputs_rejected() {
        assert_eq!(
            InputMapping::from_input(&RawInput::axis(DeviceSource::Gamepad, 0, 0.0)),
            Err(BindingError::NeutralAxis)
        );
        assert_eq!(
            InputMapping::from_input(&RawInput::hat(0, HatDirection::Centered)),
            Err(BindingError::CenteredHat)
        );
    }

    #[test]
    fn test_axis_match_is_direction_sensitive() {
        let binding = InputMapping::new(
            InputSource::Gamepad,
            InputKind::Axis,
            InputId::Index(3),
            Some(Direction::Positive),
        );
        assert!(binding.matches(&RawInput::axis(DeviceSource::Gamepad, 3, 0.8)));
        assert!(!binding.matches(&RawInput::axis(DeviceSource::Gamepad, 3, -0.8)));
        assert!(!binding.matches(&RawInput::axis(DeviceSource::Joystick, 3, 0.8)));
        assert!(!binding.matches(&RawInput::axis(DeviceSource::Gamepad, 4, 0.8)));
    }

    #[test]
    fn test_directionless_binding_ignores_extra() {
        let binding = InputMapping::new(InputSource::Joystick, InputKind::Hat, InputId::Index(0), None);
        assert!(binding.matches(&RawInput::hat(0, HatDirection::Left)));
        assert!(binding.matches(&RawInput::hat(0, HatDirection::Down)));
    }

    #[test]
    fn test_key_binding() {
        let binding = InputMapping::from_input(&RawInput::key("return")).unwrap();
        assert!(binding.matches(&RawInput::key("return")));
        assert!(!binding.matches(&RawInput::key("space")));
        assert_eq!(binding.to_string(), "key return");
        assert!(binding.check().is_ok());
    }

    #[test]
    fn test_check_rejects_malformed_records() {
        let axis_without_sign =
            InputMapping::new(InputSource::Gamepad, InputKind::Axis, InputId::Index(1), None);
        assert_eq!(axis_without_sign.check(), Err(BindingError::MissingDirection("axis")));

        let axis_with_hat_direction = InputMapping::new(
            InputSource::Joystick,
            InputKind::Axis,
            InputId::Index(1),
            Some(Direction::Up),
        );
        assert!(axis_with_hat_direction.check().is_err());

        let gamepad_hat = InputMapping::new(
            InputSource::Gamepad,
            InputKind::Hat,
            InputId::Index(0),
            Some(Direction::Up),
        );
        assert_eq!(gamepad_hat.check(), Err(BindingError::HatSource("gamepad")));

        let keyboard_index =
            InputMapping::new(InputSource::Keyboard, InputKind::Button, InputId::Index(5), None);
        assert_eq!(keyboard_index.check(), Err(BindingError::KeyboardIndex(5)));
    }

    #[test]
    fn test_display() {
        let binding = InputMapping::new(
            InputSource::Joystick,
            InputKind::Hat,
            InputId::Index(0),
            Some(Direction::LeftUp),
        );
        assert_eq!(binding.to_string(), "joystick hat 0 lu");
    }
}
