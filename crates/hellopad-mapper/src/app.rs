//! Application context
//!
//! Owns the mapper, the resolver and the active mapping, and routes host
//! events to the screen that is showing: setup (capture wizard), main
//! (counter) or debug (input visualizer).

use hellopad_config::{Catalogue, DeviceMapping, HelloPadConfig, MappingStore, ValidationReport};
use hellopad_input::{DeviceSource, HatDirection, RawInput};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::detector::InputDetector;
use crate::mapper::{Mapper, Submission};
use crate::render::{BindingRow, DebugView, MainView, RenderData, SetupView};

/// Key reserved for cancel/quit; never captured or resolved
pub const ESCAPE_KEY: &str = "escape";

/// Host event callbacks, one per event shape
pub trait InputHandler {
    fn on_button(&mut self, source: DeviceSource, id: u32);

    fn on_axis(&mut self, source: DeviceSource, id: u32, value: f32);

    fn on_hat(&mut self, id: u32, direction: HatDirection);

    fn on_key(&mut self, name: &str, repeat: bool);

    /// Route a `RawInput` to the matching callback
    fn dispatch(&mut self, input: &RawInput) {
        match input {
            RawInput::Button { source, id } => self.on_button(*source, *id),
            RawInput::Axis { source, id, value } => self.on_axis(*source, *id, *value),
            RawInput::Hat { id, direction } => self.on_hat(*id, *direction),
            RawInput::Key { name, repeat } => self.on_key(name, *repeat),
        }
    }
}

/// Screen currently shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Setup,
    Main,
    Debug,
}

/// Demo application state
#[derive(Debug)]
pub struct App {
    catalogue: Catalogue,
    mapper: Mapper,
    detector: InputDetector,
    /// Active mapping; `None` until the first capture completes or a file loads
    mapping: Option<DeviceMapping>,
    report: ValidationReport,
    screen: Screen,
    counter: u32,
    last_button: Option<String>,
    status: String,
    clock: Duration,
    /// Set when a remap starts mid-frame; setup input is held until the next tick
    settling: bool,
    should_quit: bool,
}

impl App {
    /// Create the app with the standard catalogue
    pub fn new(config: &HelloPadConfig, store: Box<dyn MappingStore>) -> Self {
        Self::with_catalogue(Catalogue::standard(), config, store)
    }

    /// Create the app, loading a stored mapping or starting the wizard
    pub fn with_catalogue(
        catalogue: Catalogue,
        config: &HelloPadConfig,
        store: Box<dyn MappingStore>,
    ) -> Self {
        let loaded = store.load();
        let location = store.location();

        let mapper = Mapper::new(
            catalogue.clone(),
            config.mapper.clone(),
            config.detector.clone(),
            store,
        );

        let mut app = Self {
            catalogue,
            mapper,
            detector: InputDetector::new(config.detector.clone()),
            mapping: None,
            report: ValidationReport::default(),
            screen: Screen::Main,
            counter: 0,
            last_button: None,
            status: "Ready".to_string(),
            clock: Duration::ZERO,
            settling: false,
            should_quit: false,
        };

        match loaded {
            Ok(mapping) => {
                app.activate(mapping);
                app.status = format!("Mapping loaded from {}", location);
            }
            Err(e) => {
                warn!("No usable mapping at {}: {}", location, e);
                app.begin_setup();
            }
        }

        app
    }

    /// Start (or restart) the capture wizard
    pub fn begin_setup(&mut self) {
        self.mapper.start();
        self.screen = Screen::Setup;
        self.status = "Map your controller".to_string();
    }

    /// Restart the wizard from a mapped press. Layered drivers deliver the
    /// same press more than once per frame, so the rest of this frame is
    /// kept away from step 1.
    fn begin_remap(&mut self) {
        info!("Remap requested");
        self.begin_setup();
        self.settling = true;
    }

    fn activate(&mut self, mapping: DeviceMapping) {
        self.report = mapping.validate(&self.catalogue);
        for issue in self.report.issues() {
            warn!("Mapping issue: {}", issue);
        }
        let missing = mapping.missing_keys(&self.catalogue);
        if !missing.is_empty() {
            info!("Mapping has no binding for: {}", missing.join(", "));
        }

        self.mapping = Some(mapping);
        self.screen = Screen::Main;
    }

    /// Advance timers by one frame
    pub fn tick(&mut self, delta: Duration) {
        self.clock += delta;
        self.settling = false;
        self.mapper.tick(delta);
    }

    fn handle(&mut self, input: RawInput) {
        if let RawInput::Key { name, repeat: false } = &input {
            if name == ESCAPE_KEY {
                self.handle_escape();
                return;
            }
        }

        self.detector.observe(&input);
        if !self.detector.should_process(&input) {
            debug!("Dropped {}", input.describe());
            return;
        }

        match self.screen {
            Screen::Setup => self.handle_setup_input(&input),
            Screen::Main | Screen::Debug => self.handle_mapped_input(&input),
        }
    }

    fn handle_escape(&mut self) {
        match self.screen {
            Screen::Setup if self.mapping.is_some() => {
                self.mapper.stop();
                self.screen = Screen::Main;
                self.status = "Remap cancelled".to_string();
            }
            _ => {
                info!("Quit requested");
                self.should_quit = true;
            }
        }
    }

    fn handle_setup_input(&mut self, input: &RawInput) {
        if self.settling {
            debug!("Held {} until next frame", input.describe());
            return;
        }

        let submission = self.mapper.submit(input);
        if submission.consumed() {
            self.detector.record(input, self.clock, submission.key());
        }

        if let Submission::Completed {
            mapping, persisted, ..
        } = submission
        {
            self.status = match persisted {
                Ok(()) => "Mapping saved".to_string(),
                Err(e) => format!("Mapping not saved: {}", e),
            };
            self.activate(mapping);
        }
    }

    fn handle_mapped_input(&mut self, input: &RawInput) {
        let button = match &self.mapping {
            Some(mapping) => self
                .detector
                .find_logical_button(mapping, &self.catalogue, input)
                .map(str::to_string),
            None => None,
        };
        self.detector.record(input, self.clock, button.as_deref());

        let Some(button) = button else {
            return;
        };
        debug!("{} -> {}", input.describe(), button);

        match (self.screen, button.as_str()) {
            (Screen::Main, "a") => self.counter = self.counter.saturating_add(1),
            (Screen::Main, "b") => self.counter = 0,
            (Screen::Main, "start") => self.screen = Screen::Debug,
            (Screen::Debug, "start" | "b") => self.screen = Screen::Main,
            (_, "back") => self.begin_remap(),
            (_, "guide") => {
                info!("Quit requested");
                self.should_quit = true;
            }
            _ => {}
        }

        self.last_button = Some(button);
    }

    /// Describe the current screen for the renderer
    pub fn render(&self) -> RenderData {
        match self.screen {
            Screen::Setup => RenderData::Setup(self.setup_view()),
            Screen::Main => RenderData::Main(MainView {
                counter: self.counter,
                last_button: self.last_button.clone(),
                status: self.status.clone(),
                issues: self.report.messages(),
            }),
            Screen::Debug => RenderData::Debug(DebugView {
                bindings: self.mapping.as_ref().map(|m| self.binding_rows(m)).unwrap_or_default(),
                recent: self.detector.log().entries().cloned().collect(),
                axes: self.detector.axes(),
                issues: self.report.messages(),
                complete: self
                    .mapping
                    .as_ref()
                    .is_some_and(|m| m.is_complete(&self.catalogue)),
            }),
        }
    }

    fn setup_view(&self) -> SetupView {
        let (key, instruction) = self
            .mapper
            .current_button()
            .map(|b| (b.key.clone(), b.instruction.clone()))
            .unwrap_or_default();

        SetupView {
            step: self.mapper.current_step().unwrap_or_default(),
            total: self.mapper.total_steps(),
            key,
            instruction,
            waiting: self.mapper.is_waiting(),
            cooldown_ms: self.mapper.cooldown_remaining().as_millis() as u64,
            remapping: self.mapping.is_some(),
            captured: self
                .mapper
                .captured()
                .map(|m| {
                    m.ordered(&self.catalogue)
                        .into_iter()
                        .map(|(key, binding)| BindingRow {
                            key: key.to_string(),
                            binding: Some(binding.to_string()),
                        })
                        .collect()
                })
                .unwrap_or_default(),
        }
    }

    fn binding_rows(&self, mapping: &DeviceMapping) -> Vec<BindingRow> {
        let mut rows: Vec<_> = self
            .catalogue
            .keys()
            .map(|key| BindingRow {
                key: key.to_string(),
                binding: mapping.get(key).map(ToString::to_string),
            })
            .collect();

        rows.extend(
            mapping
                .iter()
                .filter(|(key, _)| !self.catalogue.contains(key))
                .map(|(key, binding)| BindingRow {
                    key: key.to_string(),
                    binding: Some(binding.to_string()),
                }),
        );
        rows
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn counter(&self) -> u32 {
        self.counter
    }

    pub fn last_button(&self) -> Option<&str> {
        self.last_button.as_deref()
    }

    pub fn mapping(&self) -> Option<&DeviceMapping> {
        self.mapping.as_ref()
    }

    pub fn report(&self) -> &ValidationReport {
        &self.report
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn mapper(&self) -> &Mapper {
        &self.mapper
    }

    pub fn detector(&self) -> &InputDetector {
        &self.detector
    }

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }
}

impl InputHandler for App {
    fn on_button(&mut self, source: DeviceSource, id: u32) {
        self.handle(RawInput::button(source, id));
    }

    fn on_axis(&mut self, source: DeviceSource, id: u32, value: f32) {
        self.handle(RawInput::axis(source, id, value));
    }

    fn on_hat(&mut self, id: u32, direction: HatDirection) {
        self.handle(RawInput::hat(id, direction));
    }

    fn on_key(&mut self, name: &str, repeat: bool) {
        self.handle(RawInput::Key {
            name: name.to_string(),
            repeat,
        });
    }
}
