//! Controller input model
//!
//! Describes the raw events a host delivers (joystick/gamepad buttons and axes,
//! joystick hats, keyboard keys) and the `InputMapping` record that binds one
//! physical input to a logical button.
//!
//! # Example
//!
//! ```
//! use hellopad_input::{DeviceSource, InputMapping, RawInput};
//!
//! let tilt = RawInput::axis(DeviceSource::Gamepad, 3, 0.8);
//! let binding = InputMapping::from_input(&tilt).unwrap();
//!
//! assert!(binding.matches(&RawInput::axis(DeviceSource::Gamepad, 3, 0.9)));
//! assert!(!binding.matches(&RawInput::axis(DeviceSource::Gamepad, 3, -0.9)));
//! ```

pub mod binding;
pub mod event;
pub mod mock;

pub use binding::{BindingError, InputMapping};
pub use event::{
    AxisDirection, DeviceSource, Direction, HatDirection, InputId, InputKind, InputSource,
    RawInput, UnknownHatDirection, classify_axis_direction,
};
pub use mock::MockInput;
