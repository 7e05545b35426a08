//! Input resolver
//!
//! Filters raw events (axis jitter, centered hats, key repeat), resolves them
//! against a device mapping and keeps a short log of recent events.

use hellopad_config::{Catalogue, DetectorConfig, DeviceMapping};
use hellopad_input::{DeviceSource, RawInput};
use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};
use std::time::Duration;

/// Whether `input` is a deliberate action rather than noise.
///
/// Buttons always pass. Axes pass only beyond `axis_threshold`, hats only off
/// center, keys only on the initial press.
pub fn should_process(config: &DetectorConfig, input: &RawInput) -> bool {
    match input {
        RawInput::Button { .. } => true,
        RawInput::Axis { value, .. } => value.abs() > config.axis_threshold,
        RawInput::Hat { direction, .. } => !direction.is_centered(),
        RawInput::Key { repeat, .. } => !repeat,
    }
}

/// One processed event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputLogEntry {
    /// Session time the event arrived
    pub at: Duration,
    pub description: String,
    /// Logical button the event resolved to or was captured for
    pub button: Option<String>,
}

/// Most recent events, newest first, bounded by capacity
#[derive(Debug, Clone)]
pub struct InputLog {
    entries: VecDeque<InputLogEntry>,
    capacity: usize,
}

impl InputLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, entry: InputLogEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
    }

    /// Entries, newest first
    pub fn entries(&self) -> impl Iterator<Item = &InputLogEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&InputLogEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

}

/// Last reported value of one axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisReading {
    pub source: DeviceSource,
    pub id: u32,
    pub value: f32,
    /// Beyond the display threshold
    pub active: bool,
}

/// Event filter, resolver and diagnostic log
#[derive(Debug, Clone)]
pub struct InputDetector {
    config: DetectorConfig,
    log: InputLog,
    axes: BTreeMap<(u8, u32), (DeviceSource, f32)>,
}

impl InputDetector {
    pub fn new(config: DetectorConfig) -> Self {
        let log = InputLog::new(config.input_log_capacity);
        Self {
            config,
            log,
            axes: BTreeMap::new(),
        }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn should_process(&self, input: &RawInput) -> bool {
        should_process(&self.config, input)
    }

    /// Whether a live axis value is shown as active. Uses the display
    /// threshold, which is lower than the capture threshold.
    pub fn is_axis_active(&self, value: f32) -> bool {
        value.abs() > self.config.display_threshold
    }

    /// Track live axis positions, including values below the capture threshold
    pub fn observe(&mut self, input: &RawInput) {
        if let RawInput::Axis { source, id, value } = input {
            let layer = match source {
                DeviceSource::Joystick => 0,
                DeviceSource::Gamepad => 1,
            };
            self.axes.insert((layer, *id), (*source, *value));
        }
    }

    /// Append a processed event to the log
    pub fn record(&mut self, input: &RawInput, at: Duration, button: Option<&str>) {
        self.log.push(InputLogEntry {
            at,
            description: input.describe(),
            button: button.map(str::to_string),
        });
    }

    /// Logical button bound to `input`.
    ///
    /// When several entries match (a hand-edited file with duplicate bindings),
    /// the earliest in catalogue order wins.
    pub fn find_logical_button<'a>(
        &self,
        mapping: &'a DeviceMapping,
        catalogue: &'a Catalogue,
        input: &RawInput,
    ) -> Option<&'a str> {
        mapping.resolve(catalogue, input)
    }

    pub fn log(&self) -> &InputLog {
        &self.log
    }

    /// Live axis readings, joystick layer first, by id
    pub fn axes(&self) -> Vec<AxisReading> {
        self.axes
            .iter()
            .map(|(&(_, id), &(source, value))| AxisReading {
                source,
                id,
                value,
                active: self.is_axis_active(value),
            })
            .collect()
    }
}
