//! Integration tests for mapping persistence

use hellopad_config::{
    Catalogue, ConfigError, DeviceMapping, MappingFile, MappingStore, ValidationIssue,
};
use hellopad_input::{DeviceSource, HatDirection, InputMapping, RawInput};
use std::fs;
use tempfile::TempDir;

/// Test environment with a scratch directory for mapping files
struct PersistenceTestEnv {
    temp_dir: TempDir,
}

impl PersistenceTestEnv {
    fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    fn mapping_file(&self) -> MappingFile {
        MappingFile::new(self.temp_dir.path().join("nested").join("mapping.toml"))
    }
}

/// A complete mapping mixing every input kind
fn mixed_mapping(catalogue: &Catalogue) -> DeviceMapping {
    let hats = [
        HatDirection::Up,
        HatDirection::Down,
        HatDirection::Left,
        HatDirection::Right,
    ];
    let mut mapping = DeviceMapping::new();

    for (i, key) in catalogue.keys().enumerate() {
        let event = match key {
            "dpup" | "dpdown" | "dpleft" | "dpright" => RawInput::hat(0, hats[i - 4]),
            "lefttrigger" => RawInput::axis(DeviceSource::Gamepad, 4, 1.0),
            "righttrigger" => RawInput::axis(DeviceSource::Gamepad, 5, 1.0),
            "guide" => RawInput::key("escape-menu"),
            _ => RawInput::button(DeviceSource::Joystick, i as u32),
        };
        mapping.insert(key, InputMapping::from_input(&event).unwrap());
    }
    mapping
}

#[test]
fn test_save_then_load_reconstructs_mapping() {
    let env = PersistenceTestEnv::new();
    let catalogue = Catalogue::standard();
    let mapping = mixed_mapping(&catalogue);
    assert!(mapping.is_complete(&catalogue));
    assert!(mapping.validate(&catalogue).is_valid());

    let store = env.mapping_file();
    store.save(&mapping).unwrap();
    let loaded = store.load().unwrap();

    assert_eq!(loaded, mapping);
}

#[test]
fn test_save_overwrites_and_leaves_no_temp_file() {
    let env = PersistenceTestEnv::new();
    let catalogue = Catalogue::standard();
    let store = env.mapping_file();

    let mut first = mixed_mapping(&catalogue);
    store.save(&first).unwrap();

    first.insert(
        "start",
        InputMapping::from_input(&RawInput::button(DeviceSource::Gamepad, 40)).unwrap(),
    );
    store.save(&first).unwrap();

    assert_eq!(store.load().unwrap(), first);

    let dir = store.path().parent().unwrap();
    let names: Vec<_> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["mapping.toml"]);
}

#[test]
fn test_missing_file_is_not_found() {
    let env = PersistenceTestEnv::new();
    let result = env.mapping_file().load();
    assert!(matches!(result, Err(ConfigError::NotFound(_))));
}

#[test]
fn test_garbage_file_is_parse_failure() {
    let env = PersistenceTestEnv::new();
    let store = env.mapping_file();
    fs::create_dir_all(store.path().parent().unwrap()).unwrap();
    fs::write(store.path(), "this is = = not toml").unwrap();

    assert!(matches!(store.load(), Err(ConfigError::TomlParse(_))));
}

#[test]
fn test_structurally_invalid_record_is_rejected() {
    let env = PersistenceTestEnv::new();
    let store = env.mapping_file();
    fs::create_dir_all(store.path().parent().unwrap()).unwrap();
    fs::write(
        store.path(),
        r#"
version = 1

[buttons.a]
source = "gamepad"
kind = "axis"
id = 2
"#,
    )
    .unwrap();

    match store.load() {
        Err(ConfigError::Invalid(reason)) => assert!(reason.contains("'a'")),
        other => panic!("expected invalid mapping, got {:?}", other),
    }
}

#[test]
fn test_hand_edited_file_loads_and_validation_flags_duplicates() {
    let env = PersistenceTestEnv::new();
    let store = env.mapping_file();
    fs::create_dir_all(store.path().parent().unwrap()).unwrap();
    fs::write(
        store.path(),
        r#"
# edited by hand
version = 1

[buttons.a]
source = "gamepad"
kind = "button"
id = 0

[buttons.b]
source = "gamepad"
kind = "button"
id = 0

[buttons.x]
source = "keyboard"
kind = "button"
id = "x"

[buttons.dpup]
source = "joystick"
kind = "hat"
id = 0
direction = "up"
"#,
    )
    .unwrap();

    let catalogue = Catalogue::standard();
    let mapping = store.load().unwrap();
    assert_eq!(mapping.len(), 4);

    let report = mapping.validate(&catalogue);
    assert!(report.issues().contains(&ValidationIssue::MissingRequired {
        key: "y".to_string()
    }));
    assert!(report.issues().iter().any(|issue| matches!(
        issue,
        ValidationIssue::DuplicateBinding { first, second, .. } if first == "a" && second == "b"
    )));

    // Ambiguous press resolves to the earlier catalogue entry
    let press = RawInput::button(DeviceSource::Gamepad, 0);
    assert_eq!(mapping.resolve(&catalogue, &press), Some("a"));
}

#[test]
fn test_unwritable_path_reports_failure() {
    let env = PersistenceTestEnv::new();
    let blocker = env.temp_dir.path().join("blocker");
    fs::write(&blocker, "not a directory").unwrap();

    let store = MappingFile::new(blocker.join("mapping.toml"));
    let result = store.save(&mixed_mapping(&Catalogue::standard()));
    assert!(matches!(result, Err(ConfigError::Io(_))));
}
