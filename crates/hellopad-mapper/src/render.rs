//! Render data handed to the drawing layer
//!
//! Plain descriptive structures; the core never draws anything itself.

use serde::Serialize;

use crate::detector::{AxisReading, InputLogEntry};

/// Everything needed to draw the current screen
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum RenderData {
    Setup(SetupView),
    Main(MainView),
    Debug(DebugView),
}

/// Capture wizard progress
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetupView {
    /// 1-based step being captured
    pub step: usize,
    pub total: usize,
    pub key: String,
    pub instruction: String,
    pub waiting: bool,
    pub cooldown_ms: u64,
    /// Re-mapping over an existing mapping (escape cancels instead of quitting)
    pub remapping: bool,
    /// Bindings captured so far, in catalogue order
    pub captured: Vec<BindingRow>,
}

/// Interactive counter screen
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MainView {
    pub counter: u32,
    pub last_button: Option<String>,
    pub status: String,
    pub issues: Vec<String>,
}

/// Input visualizer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebugView {
    /// One row per catalogue entry, plus unknown keys from the file
    pub bindings: Vec<BindingRow>,
    /// Newest first
    pub recent: Vec<InputLogEntry>,
    pub axes: Vec<AxisReading>,
    pub issues: Vec<String>,
    pub complete: bool,
}

/// One logical button and what it is bound to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BindingRow {
    pub key: String,
    /// `None` when unbound
    pub binding: Option<String>,
}
