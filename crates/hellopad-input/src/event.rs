//! Raw input events
//!
//! The four event shapes a host delivers (button, axis, hat, key) and the
//! small enums used to classify them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Device layer that produced a button or axis event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceSource {
    /// Raw joystick numbering as reported by the driver
    Joystick,
    /// Logical gamepad layer (SDL-style standard layout)
    Gamepad,
}

/// Origin of a physical input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputSource {
    Joystick,
    Gamepad,
    Keyboard,
}

impl From<DeviceSource> for InputSource {
    fn from(source: DeviceSource) -> Self {
        match source {
            DeviceSource::Joystick => InputSource::Joystick,
            DeviceSource::Gamepad => InputSource::Gamepad,
        }
    }
}

impl InputSource {
    pub fn name(&self) -> &'static str {
        match self {
            InputSource::Joystick => "joystick",
            InputSource::Gamepad => "gamepad",
            InputSource::Keyboard => "keyboard",
        }
    }
}

/// Kind of physical control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Button,
    Axis,
    Hat,
}

impl InputKind {
    pub fn name(&self) -> &'static str {
        match self {
            InputKind::Button => "button",
            InputKind::Axis => "axis",
            InputKind::Hat => "hat",
        }
    }
}

/// Identifier of a physical control: a device index or a keyboard key name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputId {
    Index(u32),
    Key(String),
}

impl fmt::Display for InputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputId::Index(index) => write!(f, "{}", index),
            InputId::Key(name) => f.write_str(name),
        }
    }
}

/// Sign of an axis reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisDirection {
    Positive,
    Negative,
    Neutral,
}

/// Classify an axis value by its sign. Exactly zero is neutral.
pub fn classify_axis_direction(value: f32) -> AxisDirection {
    if value > 0.0 {
        AxisDirection::Positive
    } else if value < 0.0 {
        AxisDirection::Negative
    } else {
        AxisDirection::Neutral
    }
}

/// Hat (POV switch) position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HatDirection {
    Centered,
    Up,
    Down,
    Left,
    Right,
    LeftUp,
    RightUp,
    LeftDown,
    RightDown,
}

#[derive(Debug, Error)]
#[error("unknown hat direction: {0}")]
pub struct UnknownHatDirection(pub String);

impl HatDirection {
    /// Compact tag used by host event feeds (`c`, `u`, `ld`, ...)
    pub fn tag(&self) -> &'static str {
        match self {
            HatDirection::Centered => "c",
            HatDirection::Up => "u",
            HatDirection::Down => "d",
            HatDirection::Left => "l",
            HatDirection::Right => "r",
            HatDirection::LeftUp => "lu",
            HatDirection::RightUp => "ru",
            HatDirection::LeftDown => "ld",
            HatDirection::RightDown => "rd",
        }
    }

    pub fn is_centered(&self) -> bool {
        *self == HatDirection::Centered
    }

    /// Direction carried by a binding, `None` when centered
    pub fn to_direction(self) -> Option<Direction> {
        match self {
            HatDirection::Centered => None,
            HatDirection::Up => Some(Direction::Up),
            HatDirection::Down => Some(Direction::Down),
            HatDirection::Left => Some(Direction::Left),
            HatDirection::Right => Some(Direction::Right),
            HatDirection::LeftUp => Some(Direction::LeftUp),
            HatDirection::RightUp => Some(Direction::RightUp),
            HatDirection::LeftDown => Some(Direction::LeftDown),
            HatDirection::RightDown => Some(Direction::RightDown),
        }
    }
}

impl FromStr for HatDirection {
    type Err = UnknownHatDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "c" => Ok(HatDirection::Centered),
            "u" => Ok(HatDirection::Up),
            "d" => Ok(HatDirection::Down),
            "l" => Ok(HatDirection::Left),
            "r" => Ok(HatDirection::Right),
            "lu" => Ok(HatDirection::LeftUp),
            "ru" => Ok(HatDirection::RightUp),
            "ld" => Ok(HatDirection::LeftDown),
            "rd" => Ok(HatDirection::RightDown),
            other => Err(UnknownHatDirection(other.to_string())),
        }
    }
}

/// Direction stored on a binding: an axis sign or a hat position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Positive,
    Negative,
    Up,
    Down,
    Left,
    Right,
    LeftUp,
    RightUp,
    LeftDown,
    RightDown,
}

impl Direction {
    pub fn is_axis(&self) -> bool {
        matches!(self, Direction::Positive | Direction::Negative)
    }

    pub fn is_hat(&self) -> bool {
        !self.is_axis()
    }

    /// Short label used in descriptions and the debug screen
    pub fn symbol(&self) -> &'static str {
        match self {
            Direction::Positive => "+",
            Direction::Negative => "-",
            Direction::Up => "u",
            Direction::Down => "d",
            Direction::Left => "l",
            Direction::Right => "r",
            Direction::LeftUp => "lu",
            Direction::RightUp => "ru",
            Direction::LeftDown => "ld",
            Direction::RightDown => "rd",
        }
    }
}

/// A single event delivered by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RawInput {
    /// Discrete button press
    Button { source: DeviceSource, id: u32 },
    /// Axis movement, value in [-1, 1]
    Axis {
        source: DeviceSource,
        id: u32,
        value: f32,
    },
    /// Hat position change (joystick layer only)
    Hat { id: u32, direction: HatDirection },
    /// Keyboard key press; `repeat` is set for auto-repeat deliveries
    Key { name: String, repeat: bool },
}

impl RawInput {
    pub fn button(source: DeviceSource, id: u32) -> Self {
        RawInput::Button { source, id }
    }

    pub fn axis(source: DeviceSource, id: u32, value: f32) -> Self {
        RawInput::Axis { source, id, value }
    }

    pub fn hat(id: u32, direction: HatDirection) -> Self {
        RawInput::Hat { id, direction }
    }

    pub fn key(name: impl Into<String>) -> Self {
        RawInput::Key {
            name: name.into(),
            repeat: false,
        }
    }

    pub fn source(&self) -> InputSource {
        match self {
            RawInput::Button { source, .. } | RawInput::Axis { source, .. } => (*source).into(),
            RawInput::Hat { .. } => InputSource::Joystick,
            RawInput::Key { .. } => InputSource::Keyboard,
        }
    }

    /// Keyboard keys are treated as buttons
    pub fn kind(&self) -> InputKind {
        match self {
            RawInput::Button { .. } | RawInput::Key { .. } => InputKind::Button,
            RawInput::Axis { .. } => InputKind::Axis,
            RawInput::Hat { .. } => InputKind::Hat,
        }
    }

    pub fn id(&self) -> InputId {
        match self {
            RawInput::Button { id, .. } | RawInput::Axis { id, .. } | RawInput::Hat { id, .. } => {
                InputId::Index(*id)
            }
            RawInput::Key { name, .. } => InputId::Key(name.clone()),
        }
    }

    /// Direction derived from the event payload, if any
    pub fn direction(&self) -> Option<Direction> {
        match self {
            RawInput::Axis { value, .. } => match classify_axis_direction(*value) {
                AxisDirection::Positive => Some(Direction::Positive),
                AxisDirection::Negative => Some(Direction::Negative),
                AxisDirection::Neutral => None,
            },
            RawInput::Hat { direction, .. } => direction.to_direction(),
            RawInput::Button { .. } | RawInput::Key { .. } => None,
        }
    }

    /// Human-readable one-liner for logs and the debug screen
    pub fn describe(&self) -> String {
        match self {
            RawInput::Button { source, id } => {
                format!("{} button {}", InputSource::from(*source).name(), id)
            }
            RawInput::Axis { source, id, value } => {
                format!("{} axis {} {:+.2}", InputSource::from(*source).name(), id, value)
            }
            RawInput::Hat { id, direction } => format!("joystick hat {} {}", id, direction.tag()),
            RawInput::Key { name, repeat } => {
                if *repeat {
                    format!("key {} (repeat)", name)
                } else {
                    format!("key {}", name)
                }
            }
        }
    }
}
