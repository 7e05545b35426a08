//! Mapping persistence
//!
//! The mapping file is TOML, one table per logical button:
//!
//! ```toml
//! version = 1
//!
//! [buttons.a]
//! source = "gamepad"
//! kind = "button"
//! id = 0
//!
//! [buttons.dpup]
//! source = "joystick"
//! kind = "hat"
//! id = 0
//! direction = "up"
//! ```

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::{ConfigError, DeviceMapping};

/// Current mapping file format version
pub const FORMAT_VERSION: u32 = 1;

const FILE_HEADER: &str = "# HelloPad button mapping\n\
# One table per logical button. Delete this file to run the setup wizard again.\n\n";

/// Durable home of a device mapping
pub trait MappingStore {
    /// Replace any stored mapping with `mapping`
    fn save(&self, mapping: &DeviceMapping) -> Result<(), ConfigError>;

    /// Read the stored mapping back
    fn load(&self) -> Result<DeviceMapping, ConfigError>;

    /// Where the mapping lives, for log and status messages
    fn location(&self) -> String;
}

#[derive(Debug, Serialize, Deserialize)]
struct MappingDocument {
    version: u32,
    #[serde(default)]
    buttons: DeviceMapping,
}

/// TOML mapping file at a fixed path
#[derive(Debug, Clone)]
pub struct MappingFile {
    path: PathBuf,
}

impl MappingFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Render a mapping in the file format
    pub fn to_toml(mapping: &DeviceMapping) -> Result<String, ConfigError> {
        let document = MappingDocument {
            version: FORMAT_VERSION,
            buttons: mapping.clone(),
        };
        let body = toml::to_string_pretty(&document)?;
        Ok(format!("{}{}", FILE_HEADER, body))
    }

    /// Parse and check text in the file format
    pub fn from_toml(contents: &str) -> Result<DeviceMapping, ConfigError> {
        let document: MappingDocument = toml::from_str(contents)?;

        if document.version != FORMAT_VERSION {
            return Err(ConfigError::Invalid(format!(
                "unsupported mapping format version {}",
                document.version
            )));
        }
        if document.buttons.is_empty() {
            return Err(ConfigError::Invalid("mapping has no buttons".to_string()));
        }
        document.buttons.check()?;

        Ok(document.buttons)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Write beside the target and rename so readers never see a partial file.
    /// The temp file is removed if either step fails.
    fn write_atomic(&self, contents: &str) -> std::io::Result<()> {
        let temp = self.temp_path();
        let result = fs::write(&temp, contents).and_then(|()| fs::rename(&temp, &self.path));
        if result.is_err() && temp.is_file() {
            let _ = fs::remove_file(&temp);
        }
        result
    }
}

impl MappingStore for MappingFile {
    fn save(&self, mapping: &DeviceMapping) -> Result<(), ConfigError> {
        let contents = Self::to_toml(mapping)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        self.write_atomic(&contents)?;

        tracing::info!("Mapping saved to {} ({} buttons)", self.path.display(), mapping.len());
        Ok(())
    }

    fn load(&self) -> Result<DeviceMapping, ConfigError> {
        if !self.path.exists() {
            return Err(ConfigError::NotFound(self.path.clone()));
        }

        let contents = fs::read_to_string(&self.path)?;
        let mapping = Self::from_toml(&contents)?;

        tracing::info!(
            "Mapping loaded from {} ({} buttons)",
            self.path.display(),
            mapping.len()
        );
        Ok(mapping)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Store kept in memory. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    slot: Rc<RefCell<Option<DeviceMapping>>>,
    saves: Rc<RefCell<usize>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mapping(mapping: DeviceMapping) -> Self {
        let store = Self::new();
        *store.slot.borrow_mut() = Some(mapping);
        store
    }

    /// Last saved (or seeded) mapping
    pub fn stored(&self) -> Option<DeviceMapping> {
        self.slot.borrow().clone()
    }

    pub fn save_count(&self) -> usize {
        *self.saves.borrow()
    }
}

impl MappingStore for InMemoryStore {
    fn save(&self, mapping: &DeviceMapping) -> Result<(), ConfigError> {
        *self.slot.borrow_mut() = Some(mapping.clone());
        *self.saves.borrow_mut() += 1;
        Ok(())
    }

    fn load(&self) -> Result<DeviceMapping, ConfigError> {
        self.slot
            .borrow()
            .clone()
            .ok_or_else(|| ConfigError::Invalid("no mapping stored".to_string()))
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
