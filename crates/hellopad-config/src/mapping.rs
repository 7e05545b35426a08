//! Device mapping table and validation
//!
//! A `DeviceMapping` binds logical button keys to physical inputs for one
//! controller. It is complete when every catalogue key is bound, and valid when
//! the required buttons are bound and no physical input is bound twice.

use hellopad_input::{InputMapping, RawInput};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::{Catalogue, ConfigError};

/// Logical button key to physical input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceMapping {
    buttons: BTreeMap<String, InputMapping>,
}

impl DeviceMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `key`, returning the binding it replaced
    pub fn insert(&mut self, key: impl Into<String>, mapping: InputMapping) -> Option<InputMapping> {
        self.buttons.insert(key.into(), mapping)
    }

    pub fn get(&self, key: &str) -> Option<&InputMapping> {
        self.buttons.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<InputMapping> {
        self.buttons.remove(key)
    }

    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &InputMapping)> {
        self.buttons.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Entries in catalogue order, followed by keys the catalogue does not know
    /// (hand-edited files) in key order.
    pub fn ordered<'a>(&'a self, catalogue: &'a Catalogue) -> Vec<(&'a str, &'a InputMapping)> {
        let mut entries: Vec<_> = catalogue
            .keys()
            .filter_map(|key| self.buttons.get(key).map(|mapping| (key, mapping)))
            .collect();

        entries.extend(
            self.iter()
                .filter(|(key, _)| !catalogue.contains(key)),
        );
        entries
    }

    /// First key bound to `input`, searched in catalogue order
    pub fn resolve<'a>(&'a self, catalogue: &'a Catalogue, input: &RawInput) -> Option<&'a str> {
        self.ordered(catalogue)
            .into_iter()
            .find(|(_, mapping)| mapping.matches(input))
            .map(|(key, _)| key)
    }

    /// Catalogue keys without a binding, in catalogue order
    pub fn missing_keys(&self, catalogue: &Catalogue) -> Vec<String> {
        catalogue
            .keys()
            .filter(|key| !self.buttons.contains_key(*key))
            .map(str::to_string)
            .collect()
    }

    pub fn is_complete(&self, catalogue: &Catalogue) -> bool {
        catalogue.keys().all(|key| self.buttons.contains_key(key))
    }

    /// Check required bindings and duplicate physical inputs
    pub fn validate(&self, catalogue: &Catalogue) -> ValidationReport {
        let mut issues = Vec::new();

        for button in catalogue.required() {
            if !self.buttons.contains_key(&button.key) {
                issues.push(ValidationIssue::MissingRequired {
                    key: button.key.clone(),
                });
            }
        }

        let mut seen: HashMap<&InputMapping, &str> = HashMap::new();
        for (key, mapping) in self.ordered(catalogue) {
            match seen.get(mapping) {
                Some(first) => issues.push(ValidationIssue::DuplicateBinding {
                    first: first.to_string(),
                    second: key.to_string(),
                    input: mapping.clone(),
                }),
                None => {
                    seen.insert(mapping, key);
                }
            }
        }

        ValidationReport { issues }
    }

    /// Structural check of every record, used when loading from disk
    pub fn check(&self) -> Result<(), ConfigError> {
        for (key, mapping) in self.iter() {
            if key.trim().is_empty() {
                return Err(ConfigError::Invalid("empty button key".to_string()));
            }
            mapping
                .check()
                .map_err(|e| ConfigError::Invalid(format!("button '{}': {}", key, e)))?;
        }
        Ok(())
    }
}

impl FromIterator<(String, InputMapping)> for DeviceMapping {
    fn from_iter<I: IntoIterator<Item = (String, InputMapping)>>(iter: I) -> Self {
        Self {
            buttons: iter.into_iter().collect(),
        }
    }
}

/// A single problem found by `DeviceMapping::validate`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    MissingRequired {
        key: String,
    },
    DuplicateBinding {
        first: String,
        second: String,
        input: InputMapping,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::MissingRequired { key } => {
                write!(f, "required button '{}' is not mapped", key)
            }
            ValidationIssue::DuplicateBinding {
                first,
                second,
                input,
            } => write!(f, "'{}' and '{}' are both bound to {}", first, second, input),
        }
    }
}

/// Outcome of validation. An invalid mapping is still usable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    /// Human-readable issue list
    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }
}
