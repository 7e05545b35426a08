//! Scripted input feed for testing without a controller
//!
//! # Usage
//!
//! ```
//! use hellopad_input::{DeviceSource, HatDirection, MockInput};
//!
//! let mut input = MockInput::new();
//! input.press(DeviceSource::Gamepad, 0);
//! input.hat(0, HatDirection::Up);
//!
//! let events = input.poll();
//! assert_eq!(events.len(), 2);
//! assert!(input.is_empty());
//! ```

use crate::event::{DeviceSource, HatDirection, RawInput};
use std::collections::VecDeque;

/// Queue of host events, drained in delivery order
#[derive(Debug, Clone, Default)]
pub struct MockInput {
    pending: VecDeque<RawInput>,
}

impl MockInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// A feed of `count` distinct gamepad button presses (ids 0..count)
    pub fn distinct_buttons(count: u32) -> Self {
        let mut input = Self::new();
        for id in 0..count {
            input.press(DeviceSource::Gamepad, id);
        }
        input
    }

    /// Simulate pressing a button
    pub fn press(&mut self, source: DeviceSource, id: u32) -> &mut Self {
        self.push(RawInput::button(source, id))
    }

    /// Simulate moving an axis to `value`
    pub fn tilt(&mut self, source: DeviceSource, id: u32, value: f32) -> &mut Self {
        self.push(RawInput::axis(source, id, value))
    }

    /// Simulate moving a hat
    pub fn hat(&mut self, id: u32, direction: HatDirection) -> &mut Self {
        self.push(RawInput::hat(id, direction))
    }

    /// Simulate a key press
    pub fn key(&mut self, name: &str) -> &mut Self {
        self.push(RawInput::key(name))
    }

    /// Simulate an auto-repeat delivery of a held key
    pub fn key_repeat(&mut self, name: &str) -> &mut Self {
        self.push(RawInput::Key {
            name: name.to_string(),
            repeat: true,
        })
    }

    pub fn push(&mut self, input: RawInput) -> &mut Self {
        self.pending.push_back(input);
        self
    }

    /// Take the next pending event
    pub fn next_event(&mut self) -> Option<RawInput> {
        self.pending.pop_front()
    }

    /// Drain all pending events
    pub fn poll(&mut self) -> Vec<RawInput> {
        self.pending.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl Iterator for MockInput {
    type Item = RawInput;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_event()
    }
}
