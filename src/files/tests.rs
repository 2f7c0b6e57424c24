use super::*;
use serde_json::{json, Value};
use tempfile::TempDir;

struct Fixture {
    inputs: TempDir,
    out: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self {
            inputs: TempDir::new().unwrap(),
            out: TempDir::new().unwrap(),
        }
    }

    fn input(&self, name: &str, content: &str) -> String {
        let path = self.inputs.path().join(name);
        fs::write(&path, content).unwrap();
        path.to_string_lossy().into_owned()
    }

    fn missing(&self, name: &str) -> String {
        self.inputs.path().join(name).to_string_lossy().into_owned()
    }

    fn staged(&self, kind: OptionalFileKind) -> PathBuf {
        self.out.path().join(kind.staged_name())
    }
}

fn config(value: Value) -> AppConfig {
    AppConfig::from_value(value).unwrap()
}

#[test]
fn test_no_optional_files() {
    let fx = Fixture::new();
    let mut cfg = config(json!({"fif": "raw.fif"}));

    let files = read_optional_files(&mut cfg, fx.out.path()).unwrap();

    assert_eq!(files, OptionalFiles::default());
    assert_eq!(cfg.len(), 1);
    assert_eq!(fs::read_dir(fx.out.path()).unwrap().count(), 0);
}

#[test]
fn test_existing_files_are_resolved_and_staged() {
    let fx = Fixture::new();
    let ct = fx.input("ct_sparse.fif", "crosstalk");
    let cal = fx.input("sss_cal.dat", "calibration");
    let events = fx.input("events.tsv", "onset\tduration");
    let mut cfg = config(json!({
        "fif": "raw.fif",
        "crosstalk": ct,
        "calibration": cal,
        "events": events,
    }));

    let files = read_optional_files(&mut cfg, fx.out.path()).unwrap();

    assert_eq!(files.cross_talk_file, Some(PathBuf::from(&ct)));
    assert_eq!(files.calibration_file, Some(PathBuf::from(&cal)));
    assert_eq!(files.events_file, Some(PathBuf::from(&events)));
    assert_eq!(files.channels_file, None);

    assert_eq!(
        fs::read_to_string(fx.staged(OptionalFileKind::CrossTalk)).unwrap(),
        "crosstalk"
    );
    assert_eq!(
        fs::read_to_string(fx.staged(OptionalFileKind::Calibration)).unwrap(),
        "calibration"
    );
    assert!(fx.staged(OptionalFileKind::Events).exists());

    // Only non-file parameters remain
    assert_eq!(cfg.len(), 1);
    assert!(cfg.contains("fif"));
}

#[test]
fn test_blank_and_missing_paths_resolve_to_none() {
    let fx = Fixture::new();
    let mut cfg = config(json!({
        "crosstalk": "",
        "calibration": fx.missing("nope.dat"),
        "headshape": null,
    }));

    let files = read_optional_files(&mut cfg, fx.out.path()).unwrap();

    assert_eq!(files, OptionalFiles::default());
    assert!(cfg.is_empty());
}

#[test]
fn test_override_replaces_original() {
    let fx = Fixture::new();
    let original = fx.input("channels.tsv", "original");
    let replacement = fx.input("channels_fixed.tsv", "override");
    let mut cfg = config(json!({
        "channels": original,
        "channels_override": replacement,
    }));

    let files = read_optional_files(&mut cfg, fx.out.path()).unwrap();

    assert_eq!(files.channels_file, Some(PathBuf::from(&replacement)));
    assert_eq!(
        fs::read_to_string(fx.staged(OptionalFileKind::Channels)).unwrap(),
        "override"
    );
    assert!(!cfg.contains("channels_override"));
}

#[test]
fn test_missing_override_keeps_original() {
    let fx = Fixture::new();
    let original = fx.input("headshape.pos", "original");
    let mut cfg = config(json!({
        "headshape": original,
        "headshape_override": fx.missing("other.pos"),
    }));

    let files = read_optional_files(&mut cfg, fx.out.path()).unwrap();

    assert_eq!(files.head_pos_file, Some(PathBuf::from(&original)));
    assert_eq!(
        fs::read_to_string(fx.staged(OptionalFileKind::HeadPos)).unwrap(),
        "original"
    );
}

#[test]
fn test_override_without_original() {
    let fx = Fixture::new();
    let destination = fx.input("dest.fif", "dest");
    let mut cfg = config(json!({"destination_override": destination}));

    let files = read_optional_files(&mut cfg, fx.out.path()).unwrap();

    assert_eq!(files.destination, Some(PathBuf::from(&destination)));
    assert!(fx.staged(OptionalFileKind::Destination).exists());
}

#[test]
fn test_non_string_path_is_rejected() {
    let fx = Fixture::new();
    let mut cfg = config(json!({"events": ["a.tsv"]}));

    let err = read_optional_files(&mut cfg, fx.out.path()).unwrap_err();

    assert_eq!(err.code(), crate::error::ErrorCode::VALIDATION_WRONG_TYPE);
    assert_eq!(err.field(), Some("events"));
}

#[test]
fn test_wrong_type_leaves_config_untouched() {
    let fx = Fixture::new();
    let cal = fx.input("sss_cal.dat", "cal");
    let mut cfg = config(json!({
        "crosstalk": null,
        "calibration": cal,
        "events": 5,
        "h_freq": 40,
    }));
    let before = cfg.clone();

    let err = read_optional_files(&mut cfg, fx.out.path()).unwrap_err();

    assert_eq!(err.field(), Some("events"));
    assert_eq!(cfg, before);
    assert_eq!(fs::read_dir(fx.out.path()).unwrap().count(), 0);
}

#[test]
fn test_wrong_type_override_is_rejected_up_front() {
    let mut cfg = config(json!({"channels_override": {"path": "x"}, "crosstalk": null}));

    let err = resolve_optional_files(&mut cfg).unwrap_err();

    assert_eq!(err.code(), crate::error::ErrorCode::VALIDATION_WRONG_TYPE);
    assert_eq!(err.field(), Some("channels_override"));
    assert!(cfg.contains("crosstalk"));
}

#[test]
fn test_copy_optional_files_reports_vanished_file() {
    let fx = Fixture::new();
    let mut files = OptionalFiles::default();
    files.set(OptionalFileKind::Events, Some(PathBuf::from(fx.missing("gone.tsv"))));

    let err = copy_optional_files(&files, fx.out.path()).unwrap_err();

    assert_eq!(err.code(), crate::error::ErrorCode::STORAGE_NOT_FOUND);
}

#[test]
fn test_copy_into_own_location_is_a_no_op() {
    let fx = Fixture::new();
    let staged = fx.staged(OptionalFileKind::Events);
    fs::write(&staged, "keep me").unwrap();
    let mut files = OptionalFiles::default();
    files.set(OptionalFileKind::Events, Some(staged.clone()));

    copy_optional_files(&files, fx.out.path()).unwrap();

    assert_eq!(fs::read_to_string(&staged).unwrap(), "keep me");
}

#[test]
fn test_ensure_output_dirs_is_idempotent() {
    let fx = Fixture::new();
    let report = fx.out.path().join("out_report");
    let nested = fx.out.path().join("out_dir").join("nested");

    ensure_output_dirs([&report, &nested]).unwrap();
    ensure_output_dirs([&report, &nested]).unwrap();

    assert!(report.is_dir());
    assert!(nested.is_dir());
}

#[test]
fn test_present_iterates_in_kind_order() {
    let mut files = OptionalFiles::default();
    files.set(OptionalFileKind::Destination, Some(PathBuf::from("d.fif")));
    files.set(OptionalFileKind::CrossTalk, Some(PathBuf::from("c.fif")));

    let kinds: Vec<_> = files.present().map(|(kind, _)| kind).collect();

    assert_eq!(
        kinds,
        vec![OptionalFileKind::CrossTalk, OptionalFileKind::Destination]
    );
}
