use std::path::PathBuf;
use std::time::Duration;

use rustc_hash::FxHashMap;
use tempfile::TempDir;

use super::classifier::EventClassifier;
use super::debouncer::{ChangeKind, Debouncer};
use crate::config::PipelineConfig;
use crate::core::AssetCategory;
use crate::utils::path::normalize_path;

fn make_config() -> (TempDir, PipelineConfig) {
    let temp = TempDir::new().unwrap();
    let root = normalize_path(temp.path());

    let mut config = PipelineConfig::default();
    config.set_root(&root);
    config.paths.source = root.join("static");
    config.paths.output = root.join("static-build");
    config.scripts.externs = root.join("closureexterns");

    for category in AssetCategory::ALL {
        std::fs::create_dir_all(config.paths.input_dir(category)).unwrap();
    }

    (temp, config)
}

fn make_event(paths: &[&str], kind: notify::EventKind) -> notify::Event {
    notify::Event {
        kind,
        paths: paths.iter().map(PathBuf::from).collect(),
        attrs: Default::default(),
    }
}

fn modify_kind() -> notify::EventKind {
    use notify::event::{DataChange, ModifyKind};
    notify::EventKind::Modify(ModifyKind::Data(DataChange::Any))
}

fn metadata_kind() -> notify::EventKind {
    use notify::event::{MetadataKind, ModifyKind};
    notify::EventKind::Modify(ModifyKind::Metadata(MetadataKind::Any))
}

fn create_kind() -> notify::EventKind {
    notify::EventKind::Create(notify::event::CreateKind::File)
}

fn remove_kind() -> notify::EventKind {
    notify::EventKind::Remove(notify::event::RemoveKind::File)
}

/// Debouncer that releases immediately, for routing tests.
fn quick_debouncer() -> Debouncer {
    Debouncer::new(Duration::ZERO, Duration::ZERO)
}

fn default_debouncer() -> Debouncer {
    Debouncer::new(Duration::from_millis(300), Duration::from_millis(800))
}

// ===== Debouncer =====

#[test]
fn test_debouncer_empty() {
    let debouncer = default_debouncer();
    assert!(!debouncer.is_ready());
}

#[test]
fn test_event_routing_by_kind() {
    let mut debouncer = quick_debouncer();

    debouncer.add_event(&make_event(&["/tmp/a.css"], create_kind()));
    debouncer.add_event(&make_event(&["/tmp/b.js"], modify_kind()));
    debouncer.add_event(&make_event(&["/tmp/c.png"], remove_kind()));

    assert_eq!(debouncer.changes.len(), 3);
    assert_eq!(
        debouncer.changes[&PathBuf::from("/tmp/a.css")],
        ChangeKind::Created
    );
    assert_eq!(
        debouncer.changes[&PathBuf::from("/tmp/b.js")],
        ChangeKind::Modified
    );
    assert_eq!(
        debouncer.changes[&PathBuf::from("/tmp/c.png")],
        ChangeKind::Removed
    );
}

#[test]
fn test_metadata_modify_ignored() {
    let mut debouncer = quick_debouncer();
    debouncer.add_event(&make_event(&["/tmp/a.css"], metadata_kind()));
    assert!(debouncer.changes.is_empty());
    assert!(debouncer.last_event.is_none());
}

#[test]
fn test_temp_file_ignored() {
    let mut debouncer = quick_debouncer();

    debouncer.add_event(&make_event(&["/tmp/real.css"], modify_kind()));
    assert!(debouncer.last_event.is_some());
    let first_time = debouncer.last_event.unwrap();

    std::thread::sleep(Duration::from_millis(5));

    // Editor artifacts must not update last_event or join the pending set
    debouncer.add_event(&make_event(&["/tmp/.app.css.swp"], modify_kind()));
    debouncer.add_event(&make_event(&["/tmp/app.css~"], modify_kind()));
    debouncer.add_event(&make_event(&["/tmp/app.css.tmp"], modify_kind()));
    assert_eq!(debouncer.last_event.unwrap(), first_time);
    assert_eq!(debouncer.changes.len(), 1);
}

#[test]
fn test_dedup_first_event_wins() {
    let mut debouncer = quick_debouncer();

    // Same path: create then modify, the first one (create) wins
    debouncer.add_event(&make_event(&["/tmp/a.css"], create_kind()));
    debouncer.add_event(&make_event(&["/tmp/a.css"], modify_kind()));

    assert_eq!(debouncer.changes.len(), 1);
    assert_eq!(
        debouncer.changes[&PathBuf::from("/tmp/a.css")],
        ChangeKind::Created
    );
}

#[test]
fn test_remove_then_create_restores() {
    let mut debouncer = quick_debouncer();

    debouncer.add_event(&make_event(&["/tmp/a.css"], remove_kind()));
    debouncer.add_event(&make_event(&["/tmp/a.css"], create_kind()));

    assert_eq!(debouncer.changes.len(), 1);
    assert_eq!(
        debouncer.changes[&PathBuf::from("/tmp/a.css")],
        ChangeKind::Created
    );
}

#[test]
fn test_create_then_remove_discards() {
    let mut debouncer = quick_debouncer();

    // File appeared then vanished within one window, net no-op
    debouncer.add_event(&make_event(&["/tmp/a.css"], create_kind()));
    debouncer.add_event(&make_event(&["/tmp/a.css"], remove_kind()));

    assert!(
        debouncer.changes.is_empty(),
        "created+removed should discard"
    );
}

#[test]
fn test_modify_then_remove_upgrades() {
    let mut debouncer = quick_debouncer();

    debouncer.add_event(&make_event(&["/tmp/a.css"], modify_kind()));
    debouncer.add_event(&make_event(&["/tmp/a.css"], remove_kind()));

    assert_eq!(debouncer.changes.len(), 1);
    assert_eq!(
        debouncer.changes[&PathBuf::from("/tmp/a.css")],
        ChangeKind::Removed
    );
}

#[test]
fn test_take_if_ready_clears_pending() {
    let mut debouncer = quick_debouncer();
    debouncer.add_event(&make_event(&["/tmp/a.css"], modify_kind()));

    let taken = debouncer.take_if_ready().unwrap();
    assert_eq!(taken.len(), 1);
    assert!(debouncer.take_if_ready().is_none());
}

#[test]
fn test_sleep_duration_no_events() {
    let debouncer = default_debouncer();
    assert!(debouncer.sleep_duration() >= Duration::from_secs(3600));
}

#[test]
fn test_sleep_duration_after_event() {
    let mut debouncer = default_debouncer();
    debouncer.last_event = Some(std::time::Instant::now());

    let dur = debouncer.sleep_duration();
    assert!(dur >= Duration::from_millis(290));
    assert!(dur <= Duration::from_millis(310));
}

#[test]
fn test_sleep_duration_respects_cooldown() {
    let mut debouncer = default_debouncer();
    debouncer.last_event = Some(std::time::Instant::now());
    debouncer.last_rebuild = Some(std::time::Instant::now());

    let dur = debouncer.sleep_duration();
    assert!(dur >= Duration::from_millis(790));
    assert!(dur <= Duration::from_millis(810));
}

// ===== Classifier =====

#[test]
fn test_modified_file_routes_to_its_unit() {
    let (_tmp, config) = make_config();
    let stylesheet = config.paths.input_dir(AssetCategory::Styles).join("app.css");
    std::fs::write(&stylesheet, "body{}").unwrap();

    let mut raw = FxHashMap::default();
    raw.insert(stylesheet, ChangeKind::Modified);

    let targets = EventClassifier::rebuild_targets(raw, &config);
    assert_eq!(targets, vec![AssetCategory::Styles]);
}

#[test]
fn test_created_then_deleted_is_not_routed() {
    let (_tmp, config) = make_config();
    let ghost = config.paths.input_dir(AssetCategory::Styles).join("ghost.css");

    let mut raw = FxHashMap::default();
    raw.insert(ghost, ChangeKind::Created);

    // File never materialized, nothing to rebuild
    assert!(EventClassifier::rebuild_targets(raw, &config).is_empty());
}

#[test]
fn test_stale_remove_downgrades_to_modified() {
    let (_tmp, config) = make_config();
    let script = config.paths.input_dir(AssetCategory::Scripts).join("app.js");
    std::fs::write(&script, "var x = 1;").unwrap();

    // Atomic saves often surface as Remove although the file is back
    let mut raw = FxHashMap::default();
    raw.insert(script, ChangeKind::Removed);

    let targets = EventClassifier::rebuild_targets(raw, &config);
    assert_eq!(targets, vec![AssetCategory::Scripts]);
}

#[test]
fn test_removed_file_rebuilds_unit() {
    let (_tmp, config) = make_config();
    let gone = config.paths.input_dir(AssetCategory::Images).join("gone.png");

    let mut raw = FxHashMap::default();
    raw.insert(gone, ChangeKind::Removed);

    let targets = EventClassifier::rebuild_targets(raw, &config);
    assert_eq!(targets, vec![AssetCategory::Images]);
}

#[test]
fn test_directory_event_not_routed() {
    let (_tmp, config) = make_config();
    let dir = config.paths.input_dir(AssetCategory::Styles);

    let mut raw = FxHashMap::default();
    raw.insert(dir, ChangeKind::Modified);

    assert!(EventClassifier::rebuild_targets(raw, &config).is_empty());
}

#[test]
fn test_targets_come_out_in_build_order() {
    let (_tmp, config) = make_config();
    let image = config.paths.input_dir(AssetCategory::Images).join("a.png");
    let script = config.paths.input_dir(AssetCategory::Scripts).join("a.js");
    let stylesheet = config.paths.input_dir(AssetCategory::Styles).join("a.css");
    for path in [&image, &script, &stylesheet] {
        std::fs::write(path, "x").unwrap();
    }

    let mut raw = FxHashMap::default();
    raw.insert(image, ChangeKind::Modified);
    raw.insert(script, ChangeKind::Modified);
    raw.insert(stylesheet, ChangeKind::Modified);

    let targets = EventClassifier::rebuild_targets(raw, &config);
    assert_eq!(
        targets,
        vec![
            AssetCategory::Styles,
            AssetCategory::Scripts,
            AssetCategory::Images
        ]
    );
}

#[test]
fn test_externs_change_routes_to_scripts() {
    let (_tmp, config) = make_config();
    std::fs::create_dir_all(config.externs_dir()).unwrap();
    let externs = config.externs_dir().join("gapi.js");
    std::fs::write(&externs, "var gapi;").unwrap();

    let mut raw = FxHashMap::default();
    raw.insert(externs, ChangeKind::Modified);

    let targets = EventClassifier::rebuild_targets(raw, &config);
    assert_eq!(targets, vec![AssetCategory::Scripts]);
}

#[test]
fn test_unrelated_path_ignored() {
    let (_tmp, config) = make_config();
    let readme = config.get_root().join("README.md");
    std::fs::write(&readme, "# hi").unwrap();

    let mut raw = FxHashMap::default();
    raw.insert(readme, ChangeKind::Modified);

    assert!(EventClassifier::rebuild_targets(raw, &config).is_empty());
}
