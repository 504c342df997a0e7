//! Event-log loader tests against event files written to a temp directory

use std::fs;
use std::path::Path;

use prost::Message;
use runscope::loader::event_file::{frame_record, Event, Summary, SummaryValue};
use runscope::loader::{find_event_files, load_event_dir};

fn scalar(step: i64, tag: &str, value: f32) -> Vec<u8> {
    let event = Event {
        wall_time: 1_700_000_000.0,
        step,
        summary: Some(Summary {
            value: vec![SummaryValue {
                tag: tag.to_string(),
                simple_value: Some(value),
                tensor: None,
                metadata: None,
            }],
        }),
    };
    frame_record(&event.encode_to_vec())
}

fn write_events(path: &Path, points: &[(i64, &str, f32)]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let bytes: Vec<u8> = points
        .iter()
        .flat_map(|(step, tag, value)| scalar(*step, tag, *value))
        .collect();
    fs::write(path, bytes).unwrap();
}

#[test]
fn test_empty_directory_returns_none() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("notes.txt"), "not an event file").unwrap();

    assert!(find_event_files(dir.path()).is_empty());
    assert!(load_event_dir(dir.path()).unwrap().is_none());
}

#[test]
fn test_nested_event_files_are_prefixed_by_parent() {
    let dir = tempfile::tempdir().unwrap();
    write_events(
        &dir.path().join("policy/events.out.tfevents.1.host"),
        &[(0, "loss", 1.0), (1, "loss", 0.5), (0, "entropy", 0.9)],
    );
    write_events(
        &dir.path().join("critic/events.out.tfevents.2.host"),
        &[(10, "value_loss", 4.0), (20, "value_loss", 2.0)],
    );

    let set = load_event_dir(dir.path()).unwrap().expect("event data");
    let names: Vec<&str> = set.names().collect();
    assert_eq!(names, vec!["critic/value_loss", "policy/entropy", "policy/loss"]);

    let loss = set.get("policy/loss").unwrap();
    assert_eq!(loss.steps(), Some(&[0, 1][..]));
    assert_eq!(loss.values(), &[1.0, 0.5]);

    let value_loss = set.get("critic/value_loss").unwrap();
    assert_eq!(value_loss.steps(), Some(&[10, 20][..]));
}

#[test]
fn test_root_level_file_uses_root_name() {
    let dir = tempfile::tempdir().unwrap();
    write_events(&dir.path().join("events.out.tfevents.0.host"), &[(0, "reward", 3.0)]);

    let root_name = dir.path().file_name().unwrap().to_str().unwrap();
    let set = load_event_dir(dir.path()).unwrap().unwrap();
    assert_eq!(set.final_value(&format!("{root_name}/reward")), Some(3.0));
}

#[test]
fn test_undecodable_file_contributes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    write_events(
        &dir.path().join("good/events.out.tfevents.1.host"),
        &[(0, "loss", 1.0)],
    );

    let mut corrupt = scalar(0, "loss", 9.0);
    corrupt.extend(frame_record(&[0xff, 0xff, 0xff]));
    fs::create_dir_all(dir.path().join("bad")).unwrap();
    fs::write(dir.path().join("bad/events.out.tfevents.2.host"), corrupt).unwrap();

    let set = load_event_dir(dir.path()).unwrap().unwrap();
    assert_eq!(set.len(), 1);
    assert!(set.get("bad/loss").is_none());
    assert_eq!(set.final_value("good/loss"), Some(1.0));
}

#[test]
fn test_file_without_scalars_yields_empty_set() {
    let dir = tempfile::tempdir().unwrap();
    let version = Event {
        wall_time: 0.0,
        step: 0,
        summary: None,
    };
    fs::write(
        dir.path().join("events.out.tfevents.9.host"),
        frame_record(&version.encode_to_vec()),
    )
    .unwrap();

    let set = load_event_dir(dir.path()).unwrap().expect("file was found");
    assert!(set.is_empty());
}
