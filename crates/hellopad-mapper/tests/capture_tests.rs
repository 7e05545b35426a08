//! End-to-end tests for the capture wizard, resolver and persistence

use hellopad_config::{
    Catalogue, DetectorConfig, DeviceMapping, HelloPadConfig, InMemoryStore, MapperConfig,
    MappingFile, MappingStore, ValidationIssue,
};
use hellopad_input::{
    DeviceSource, Direction, HatDirection, InputId, InputKind, InputMapping, InputSource,
    MockInput, RawInput,
};
use hellopad_mapper::{
    App, IgnoreReason, InputHandler, Mapper, MapperState, RenderData, Screen, Submission,
};
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

const COOLDOWN: Duration = Duration::from_millis(500);
const FRAME: Duration = Duration::from_millis(16);

fn standard_mapper(store: &InMemoryStore) -> Mapper {
    Mapper::new(
        Catalogue::standard(),
        MapperConfig::default(),
        DetectorConfig::default(),
        Box::new(store.clone()),
    )
}

/// Feed one event per step, waiting out the cooldown in frame-sized ticks
fn run_capture(mapper: &mut Mapper, inputs: impl IntoIterator<Item = RawInput>) -> Vec<Submission> {
    let mut results = Vec::new();
    for input in inputs {
        results.push(mapper.submit(&input));
        for _ in 0..(COOLDOWN.as_millis() / FRAME.as_millis() + 1) {
            mapper.tick(FRAME);
        }
    }
    results
}

#[test]
fn test_capture_binds_in_catalogue_order() {
    let store = InMemoryStore::new();
    let mut mapper = standard_mapper(&store);
    let catalogue = Catalogue::standard();
    let n = catalogue.len() as u32;

    mapper.start();
    let results = run_capture(&mut mapper, MockInput::distinct_buttons(n));

    for (i, result) in results.iter().enumerate() {
        assert!(result.consumed());
        let is_last = i + 1 == n as usize;
        assert_eq!(
            matches!(result, Submission::Completed { .. }),
            is_last,
            "completion must happen exactly on step {}",
            n
        );
    }

    assert_eq!(mapper.state(), MapperState::Complete);
    let saved = store.stored().unwrap();
    for (i, key) in catalogue.keys().enumerate() {
        assert_eq!(
            saved.get(key).unwrap().id,
            InputId::Index(i as u32),
            "{} should hold the {}th press",
            key,
            i
        );
    }
    assert!(saved.is_complete(&catalogue));
    assert!(saved.validate(&catalogue).is_valid());
}

#[test]
fn test_not_complete_before_last_step() {
    let store = InMemoryStore::new();
    let mut mapper = standard_mapper(&store);
    let n = Catalogue::standard().len() as u32;

    mapper.start();
    run_capture(&mut mapper, MockInput::distinct_buttons(n - 1));

    assert_eq!(mapper.state(), MapperState::Capturing);
    assert_eq!(mapper.current_step(), Some(n as usize));
    assert_eq!(store.save_count(), 0);
}

#[test]
fn test_cooldown_rejects_then_accepts() {
    let store = InMemoryStore::new();
    let mut mapper = standard_mapper(&store);
    mapper.start();

    assert!(mapper.submit(&RawInput::button(DeviceSource::Gamepad, 0)).consumed());
    mapper.tick(Duration::from_millis(100));

    let early = mapper.submit(&RawInput::button(DeviceSource::Gamepad, 1));
    assert!(!early.consumed());
    assert!(matches!(early, Submission::Ignored(IgnoreReason::Cooldown)));
    assert_eq!(mapper.current_step(), Some(2));

    mapper.tick(Duration::from_millis(400));
    let later = mapper.submit(&RawInput::button(DeviceSource::Gamepad, 1));
    assert!(matches!(later, Submission::Recorded { ref key, step: 2 } if key == "b"));
}

#[test]
fn test_weak_axis_never_captured() {
    let store = InMemoryStore::new();
    let mut mapper = standard_mapper(&store);
    mapper.start();

    for value in [0.5, -0.5, 0.49, 0.1, -0.3, 0.0] {
        let result = mapper.submit(&RawInput::axis(DeviceSource::Gamepad, 2, value));
        assert!(!result.consumed(), "axis value {} must be filtered", value);
    }
    assert_eq!(mapper.current_step(), Some(1));

    let strong = mapper.submit(&RawInput::axis(DeviceSource::Gamepad, 2, -0.75));
    assert!(strong.consumed());
    let captured = mapper.captured().unwrap().get("a").unwrap();
    assert_eq!(captured.direction, Some(Direction::Negative));
}

#[test]
fn test_axis_resolution_is_direction_sensitive() {
    let catalogue = Catalogue::standard();
    let mut mapping = DeviceMapping::new();
    mapping.insert(
        "lefttrigger",
        InputMapping::new(
            InputSource::Gamepad,
            InputKind::Axis,
            InputId::Index(3),
            Some(Direction::Positive),
        ),
    );

    let positive = RawInput::axis(DeviceSource::Gamepad, 3, 0.8);
    let negative = RawInput::axis(DeviceSource::Gamepad, 3, -0.8);
    assert_eq!(mapping.resolve(&catalogue, &positive), Some("lefttrigger"));
    assert_eq!(mapping.resolve(&catalogue, &negative), None);
}

#[test]
fn test_stop_then_start_resets() {
    let store = InMemoryStore::new();
    let mut mapper = standard_mapper(&store);

    mapper.start();
    run_capture(&mut mapper, MockInput::distinct_buttons(3));
    assert_eq!(mapper.current_step(), Some(4));

    mapper.stop();
    mapper.start();

    assert_eq!(mapper.current_step(), Some(1));
    assert!(mapper.is_waiting());
    assert!(mapper.captured().unwrap().is_empty());
    assert_eq!(store.save_count(), 0);
}

#[test]
fn test_restart_while_capturing_discards_progress() {
    let store = InMemoryStore::new();
    let mut mapper = standard_mapper(&store);

    mapper.start();
    run_capture(&mut mapper, MockInput::distinct_buttons(2));
    mapper.start();

    assert_eq!(mapper.current_step(), Some(1));
    assert!(mapper.captured().unwrap().is_empty());
}

#[test]
fn test_mixed_capture_round_trips_through_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("mapping.toml");
    let catalogue = Catalogue::standard();

    let mut feed = MockInput::new();
    for (i, key) in catalogue.keys().enumerate() {
        match key {
            "dpup" => feed.hat(0, HatDirection::Up),
            "dpdown" => feed.hat(0, HatDirection::Down),
            "dpleft" => feed.hat(0, HatDirection::Left),
            "dpright" => feed.hat(0, HatDirection::Right),
            "lefttrigger" => feed.tilt(DeviceSource::Gamepad, 4, 0.9),
            "righttrigger" => feed.tilt(DeviceSource::Gamepad, 5, 0.9),
            "start" => feed.key("return"),
            _ => feed.press(DeviceSource::Joystick, i as u32),
        };
    }

    let mut mapper = Mapper::new(
        catalogue.clone(),
        MapperConfig::default(),
        DetectorConfig::default(),
        Box::new(MappingFile::new(&path)),
    );
    mapper.start();
    let results = run_capture(&mut mapper, feed);

    let finished = match results.into_iter().last() {
        Some(Submission::Completed { mapping, persisted, .. }) => {
            assert!(persisted.is_ok());
            mapping
        }
        other => panic!("expected completion, got {:?}", other),
    };

    let loaded = MappingFile::new(&path).load().unwrap();
    assert_eq!(loaded, finished);
    assert_eq!(
        loaded.get("dpleft").unwrap().direction,
        Some(Direction::Left)
    );
}

#[test]
fn test_save_failure_keeps_mapping_usable() {
    let temp_dir = TempDir::new().unwrap();
    let blocker = temp_dir.path().join("blocker");
    fs::write(&blocker, "file, not a directory").unwrap();

    let mut config = HelloPadConfig::default();
    config.paths.mapping_file = blocker.join("mapping.toml");

    let mut app = App::new(&config, Box::new(config.mapping_file()));
    assert_eq!(app.screen(), Screen::Setup);

    let n = app.catalogue().len() as u32;
    for input in MockInput::distinct_buttons(n) {
        app.dispatch(&input);
        app.tick(COOLDOWN);
    }

    assert_eq!(app.screen(), Screen::Main);
    assert!(app.status().starts_with("Mapping not saved"));
    assert!(app.mapping().is_some());

    app.on_button(DeviceSource::Gamepad, 0);
    assert_eq!(app.counter(), 1);
}

#[test]
fn test_app_reloads_saved_mapping_on_next_launch() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = HelloPadConfig::default();
    config.paths.mapping_file = temp_dir.path().join("mapping.toml");

    let mut first = App::new(&config, Box::new(config.mapping_file()));
    let n = first.catalogue().len() as u32;
    for input in MockInput::distinct_buttons(n) {
        first.dispatch(&input);
        first.tick(COOLDOWN);
    }
    assert_eq!(first.status(), "Mapping saved");

    let second = App::new(&config, Box::new(config.mapping_file()));
    assert_eq!(second.screen(), Screen::Main);
    assert_eq!(second.mapping(), first.mapping());
}

#[test]
fn test_corrupt_file_falls_back_to_wizard() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("mapping.toml");
    fs::write(&path, "[buttons.a\nkind = ").unwrap();

    let app = App::new(&HelloPadConfig::default(), Box::new(MappingFile::new(&path)));
    assert_eq!(app.screen(), Screen::Setup);
    assert_eq!(app.mapper().current_step(), Some(1));
}

#[test]
fn test_duplicate_bindings_flagged_but_usable() {
    let catalogue = Catalogue::standard();
    let mut mapping: DeviceMapping = catalogue
        .keys()
        .enumerate()
        .map(|(i, key)| {
            let input = RawInput::button(DeviceSource::Gamepad, i as u32);
            (key.to_string(), InputMapping::from_input(&input).unwrap())
        })
        .collect();
    let a_binding = mapping.get("a").unwrap().clone();
    mapping.insert("y", a_binding);

    let app = App::new(
        &HelloPadConfig::default(),
        Box::new(InMemoryStore::with_mapping(mapping)),
    );
    assert_eq!(app.screen(), Screen::Main);
    assert!(app.report().issues().iter().any(|issue| matches!(
        issue,
        ValidationIssue::DuplicateBinding { first, second, .. } if first == "a" && second == "y"
    )));

    match app.render() {
        RenderData::Main(view) => {
            assert_eq!(view.issues.len(), 1);
            assert!(view.issues[0].contains("'a'") && view.issues[0].contains("'y'"));
        }
        other => panic!("expected main view, got {:?}", other),
    }
}

#[test]
fn test_debug_screen_render_data() {
    let catalogue = Catalogue::standard();
    let mapping: DeviceMapping = catalogue
        .keys()
        .enumerate()
        .map(|(i, key)| {
            let input = RawInput::button(DeviceSource::Gamepad, i as u32);
            (key.to_string(), InputMapping::from_input(&input).unwrap())
        })
        .collect();
    let start = catalogue.position("start").unwrap() as u32;

    let mut app = App::new(
        &HelloPadConfig::default(),
        Box::new(InMemoryStore::with_mapping(mapping)),
    );
    app.on_button(DeviceSource::Gamepad, start);
    assert_eq!(app.screen(), Screen::Debug);

    app.tick(FRAME);
    app.on_axis(DeviceSource::Gamepad, 0, 0.2);
    app.on_hat(0, HatDirection::Centered);
    app.on_button(DeviceSource::Gamepad, 99);

    let view = match app.render() {
        RenderData::Debug(view) => view,
        other => panic!("expected debug view, got {:?}", other),
    };

    assert!(view.complete);
    assert_eq!(view.bindings.len(), catalogue.len());
    assert_eq!(view.bindings[0].binding.as_deref(), Some("gamepad button 0"));

    // The weak axis and centered hat are filtered out of the log
    let recent: Vec<_> = view.recent.iter().map(|e| e.description.as_str()).collect();
    assert_eq!(recent, vec!["gamepad button 99", "gamepad button 12"]);
    assert_eq!(view.recent[1].button.as_deref(), Some("start"));
    assert_eq!(view.recent[0].at, FRAME);

    // ...but the axis is still shown live
    assert_eq!(view.axes.len(), 1);
    assert!(view.axes[0].active);

    let json = serde_json::to_value(app.render()).unwrap();
    assert_eq!(json["screen"], "debug");
}
