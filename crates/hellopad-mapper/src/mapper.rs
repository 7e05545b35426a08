//! Capture wizard state machine
//!
//! Walks the catalogue one logical button at a time and records the physical
//! input the user performs for each step:
//!
//! ```text
//! Idle --start--> Capturing --last step--> Complete
//!   ^                 |  (WaitingForInput <-> Cooldown)
//!   +------stop-------+
//! ```
//!
//! After every accepted capture a cooldown blocks further input, so a single
//! press delivered twice (device and gamepad layers) cannot fill two steps.

use hellopad_config::{
    Catalogue, ConfigError, DetectorConfig, DeviceMapping, LogicalButton, MapperConfig,
    MappingStore,
};
use hellopad_input::{InputMapping, RawInput};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::detector::should_process;

/// Top-level mapper state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapperState {
    Idle,
    Capturing,
    Complete,
}

/// Transient state of one capture session
#[derive(Debug, Clone)]
pub struct MapperSession {
    /// 1-based pointer into the catalogue
    step: usize,
    waiting: bool,
    cooldown_remaining: Duration,
    captured: DeviceMapping,
}

impl MapperSession {
    fn new() -> Self {
        Self {
            step: 1,
            waiting: true,
            cooldown_remaining: Duration::ZERO,
            captured: DeviceMapping::new(),
        }
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn is_waiting(&self) -> bool {
        self.waiting
    }

    pub fn cooldown_remaining(&self) -> Duration {
        self.cooldown_remaining
    }

    pub fn captured(&self) -> &DeviceMapping {
        &self.captured
    }
}

/// Why a submitted event was not recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// No capture session is running
    NotCapturing,
    /// Still cooling down from the previous capture
    Cooldown,
    /// Below threshold, centered or a key repeat
    Filtered,
    /// Step pointer past the end of the catalogue
    StepOutOfRange,
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            IgnoreReason::NotCapturing => "not capturing",
            IgnoreReason::Cooldown => "cooling down",
            IgnoreReason::Filtered => "filtered",
            IgnoreReason::StepOutOfRange => "step out of range",
        };
        f.write_str(text)
    }
}

/// Result of `Mapper::submit`
#[derive(Debug)]
pub enum Submission {
    Ignored(IgnoreReason),
    /// Bound `key` at 1-based `step`; more steps remain
    Recorded { key: String, step: usize },
    /// Bound the last step. `persisted` carries the save outcome; the mapping
    /// is usable either way.
    Completed {
        key: String,
        mapping: DeviceMapping,
        persisted: Result<(), ConfigError>,
    },
}

impl Submission {
    /// Whether the event was recorded against a step
    pub fn consumed(&self) -> bool {
        !matches!(self, Submission::Ignored(_))
    }

    /// Logical button the event was recorded for
    pub fn key(&self) -> Option<&str> {
        match self {
            Submission::Ignored(_) => None,
            Submission::Recorded { key, .. } | Submission::Completed { key, .. } => Some(key.as_str()),
        }
    }
}

type CompletionCallback = Box<dyn FnMut(&DeviceMapping)>;

/// Step-by-step button capture
pub struct Mapper {
    catalogue: Catalogue,
    config: MapperConfig,
    filter: DetectorConfig,
    store: Box<dyn MappingStore>,
    on_complete: Option<CompletionCallback>,
    state: MapperState,
    session: Option<MapperSession>,
}

impl Mapper {
    pub fn new(
        catalogue: Catalogue,
        config: MapperConfig,
        filter: DetectorConfig,
        store: Box<dyn MappingStore>,
    ) -> Self {
        Self {
            catalogue,
            config,
            filter,
            store,
            on_complete: None,
            state: MapperState::Idle,
            session: None,
        }
    }

    /// Register a callback invoked with every finished mapping
    pub fn on_complete(mut self, callback: impl FnMut(&DeviceMapping) + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    /// Begin a fresh session, discarding any previous capture
    pub fn start(&mut self) {
        self.session = Some(MapperSession::new());
        self.state = MapperState::Capturing;
        info!("Button capture started ({} steps)", self.catalogue.len());
    }

    /// Abort the session. Nothing captured so far is persisted.
    pub fn stop(&mut self) {
        if let Some(session) = self.session.take() {
            info!(
                "Button capture cancelled at step {}/{}",
                session.step,
                self.catalogue.len()
            );
        }
        self.state = MapperState::Idle;
    }

    /// Advance the cooldown timer
    pub fn tick(&mut self, delta: Duration) {
        if self.state != MapperState::Capturing {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.waiting {
            return;
        }

        session.cooldown_remaining = session.cooldown_remaining.saturating_sub(delta);
        if session.cooldown_remaining.is_zero() && session.step <= self.catalogue.len() {
            session.waiting = true;
            debug!("Waiting for input for step {}", session.step);
        }
    }

    /// Offer an event to the current step
    pub fn submit(&mut self, input: &RawInput) -> Submission {
        if self.state != MapperState::Capturing {
            return Submission::Ignored(IgnoreReason::NotCapturing);
        }
        let Some(session) = self.session.as_mut() else {
            return Submission::Ignored(IgnoreReason::NotCapturing);
        };

        if !session.waiting || !session.cooldown_remaining.is_zero() {
            return Submission::Ignored(IgnoreReason::Cooldown);
        }
        if !should_process(&self.filter, input) {
            debug!("Capture ignored {}", input.describe());
            return Submission::Ignored(IgnoreReason::Filtered);
        }

        let Some(button) = self.catalogue.step(session.step) else {
            warn!(
                "Capture step {} is past the end of the catalogue, ignoring input",
                session.step
            );
            session.waiting = false;
            return Submission::Ignored(IgnoreReason::StepOutOfRange);
        };

        let mapping = match InputMapping::from_input(input) {
            Ok(mapping) => mapping,
            Err(e) => {
                debug!("Capture cannot bind {}: {}", input.describe(), e);
                return Submission::Ignored(IgnoreReason::Filtered);
            }
        };

        let key = button.key.clone();
        let step = session.step;
        info!(
            "Captured {} for '{}' ({}/{})",
            mapping,
            key,
            step,
            self.catalogue.len()
        );

        session.captured.insert(key.clone(), mapping);
        session.step += 1;
        session.waiting = false;
        session.cooldown_remaining = self.config.cooldown();

        if session.step > self.catalogue.len() {
            return self.complete(key);
        }

        Submission::Recorded { key, step }
    }

    fn complete(&mut self, key: String) -> Submission {
        let mapping = self
            .session
            .take()
            .map(|session| session.captured)
            .unwrap_or_default();
        self.state = MapperState::Complete;

        let persisted = self.store.save(&mapping);
        match &persisted {
            Ok(()) => info!(
                "Button capture complete, {} buttons saved to {}",
                mapping.len(),
                self.store.location()
            ),
            Err(e) => warn!(
                "Button capture complete but mapping was not saved to {}: {}",
                self.store.location(),
                e
            ),
        }

        if let Some(callback) = self.on_complete.as_mut() {
            callback(&mapping);
        }

        Submission::Completed {
            key,
            mapping,
            persisted,
        }
    }

    pub fn state(&self) -> MapperState {
        self.state
    }

    pub fn is_capturing(&self) -> bool {
        self.state == MapperState::Capturing
    }

    pub fn session(&self) -> Option<&MapperSession> {
        self.session.as_ref()
    }

    /// 1-based step being captured
    pub fn current_step(&self) -> Option<usize> {
        self.session.as_ref().map(|s| s.step)
    }

    pub fn total_steps(&self) -> usize {
        self.catalogue.len()
    }

    pub fn current_button(&self) -> Option<&LogicalButton> {
        self.current_step().and_then(|step| self.catalogue.step(step))
    }

    pub fn current_instruction(&self) -> Option<&str> {
        self.current_button().map(|b| b.instruction.as_str())
    }

    pub fn is_waiting(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.waiting)
    }

    pub fn cooldown_remaining(&self) -> Duration {
        self.session
            .as_ref()
            .map(|s| s.cooldown_remaining)
            .unwrap_or_default()
    }

    /// Bindings captured so far in the running session
    pub fn captured(&self) -> Option<&DeviceMapping> {
        self.session.as_ref().map(|s| &s.captured)
    }

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }
}

impl fmt::Debug for Mapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mapper")
            .field("state", &self.state)
            .field("session", &self.session)
            .field("store", &self.store.location())
            .finish()
    }
}
