//! Button mapping core for HelloPad
//!
//! - [`Mapper`]: walks the catalogue and captures one physical input per
//!   logical button, then persists the result.
//! - [`InputDetector`]: filters noise and resolves raw events to logical
//!   buttons through a [`DeviceMapping`](hellopad_config::DeviceMapping).
//! - [`App`]: the session context tying both to the setup, main and debug
//!   screens, driven through the [`InputHandler`] callbacks.
//!
//! # Example
//!
//! ```
//! use hellopad_config::{HelloPadConfig, InMemoryStore};
//! use hellopad_mapper::{App, InputHandler, Screen};
//! use hellopad_input::DeviceSource;
//! use std::time::Duration;
//!
//! let config = HelloPadConfig::default();
//! let mut app = App::new(&config, Box::new(InMemoryStore::new()));
//! assert_eq!(app.screen(), Screen::Setup);
//!
//! app.on_button(DeviceSource::Gamepad, 0);
//! app.tick(Duration::from_millis(16));
//! ```

pub mod app;
pub mod detector;
pub mod mapper;
pub mod render;

pub use app::{App, ESCAPE_KEY, InputHandler, Screen};
pub use detector::{AxisReading, InputDetector, InputLog, InputLogEntry, should_process};
pub use mapper::{IgnoreReason, Mapper, MapperSession, MapperState, Submission};
pub use render::{BindingRow, DebugView, MainView, RenderData, SetupView};
