//! End-to-end scans over a simulated mod-manager data directory.

use presetcheck_core::{
    describe, ActivePluginSet, Diagnostic, HostEnvironment, MissingPluginScanner, PRESETS_DIR,
};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Host backed by a real directory tree, the way a mod manager's virtual
/// file system would resolve it.
struct DataDirHost {
    data_root: PathBuf,
    plugins: Vec<String>,
    origins: HashMap<String, Vec<String>>,
    enabled: Option<bool>,
}

impl DataDirHost {
    fn new(data_root: &Path) -> DataDirHost {
        DataDirHost {
            data_root: data_root.to_path_buf(),
            plugins: Vec::new(),
            origins: HashMap::new(),
            enabled: None,
        }
    }
}

impl HostEnvironment for DataDirHost {
    fn find_files(&self, relative_dir: &Path, predicate: &dyn Fn(&Path) -> bool) -> Vec<PathBuf> {
        let dir = self.data_root.join(relative_dir);
        let mut found: Vec<PathBuf> = match fs::read_dir(&dir) {
            Ok(entries) => entries
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .filter(|path| path.is_file() && predicate(path))
                .collect(),
            Err(_) => Vec::new(),
        };
        // Deterministic order for the asserts below.
        found.sort();
        found
    }

    fn plugin_names(&self) -> Vec<String> {
        self.plugins.clone()
    }

    fn file_origins(&self, path: &Path) -> anyhow::Result<Vec<String>> {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(self.origins.get(&name).cloned().unwrap_or_default())
    }

    fn setting_bool(&self, setting: &str) -> Option<bool> {
        if setting == presetcheck_core::SETTING_ENABLED {
            self.enabled
        } else {
            None
        }
    }
}

fn setup_data_dir() -> (TempDir, PathBuf) {
    let temp = TempDir::new().expect("Failed to create temp directory");
    let presets = temp.path().join(PRESETS_DIR);
    fs::create_dir_all(&presets).expect("Failed to create presets directory");
    (temp, presets)
}

#[test]
fn scan_reports_only_presets_with_missing_plugins() {
    let (temp, presets) = setup_data_dir();
    fs::write(
        presets.join("preset1.json"),
        r#"{"HairColor": "HairA.esp|0x001", "HeadParts": ["HeadB.esp|0x002"]}"#,
    )
    .expect("write preset1");
    fs::write(
        presets.join("preset2.json"),
        r#"{"HairColor": "HairA.esp|0x001"}"#,
    )
    .expect("write preset2");

    let mut host = DataDirHost::new(temp.path());
    host.plugins = vec!["HairA.esp".to_string()];
    host.origins
        .insert("preset1.json".to_string(), vec!["Face Pack".to_string()]);
    let mut scanner = MissingPluginScanner::new(host);

    let problems = scanner.active_problems();
    assert_eq!(
        problems.len(),
        1,
        "Only preset1 should be reported, preset2 is fully satisfied"
    );

    let snapshot = scanner.last_scan().expect("Scan should leave a snapshot");
    let report = snapshot.report(&problems[0]).expect("Report should resolve");
    assert_eq!(report.preset, "preset1.json");
    assert_eq!(report.missing_plugins, vec!["HeadB.esp"]);
    assert_eq!(report.source, "Face Pack");

    let description = describe(report);
    assert_eq!(
        description.short,
        "LooksMenu preset \"preset1.json\" is missing one or more plugins."
    );
    assert_eq!(
        description.full,
        "The LooksMenu preset \"preset1.json\" from the \"Face Pack\" mod is \
         missing one or more plugins: HeadB.esp"
    );
}

#[test]
fn empty_preset_directory_is_not_a_problem() {
    let (temp, _presets) = setup_data_dir();

    let mut scanner = MissingPluginScanner::new(DataDirHost::new(temp.path()));
    assert!(scanner.active_problems().is_empty());
    assert!(scanner.last_scan().expect("snapshot").is_empty());
}

#[test]
fn missing_preset_directory_is_not_a_problem() {
    let temp = TempDir::new().expect("Failed to create temp directory");

    let mut scanner = MissingPluginScanner::new(DataDirHost::new(temp.path()));
    assert!(scanner.active_problems().is_empty());
}

#[test]
fn non_preset_files_are_ignored_during_discovery() {
    let (temp, presets) = setup_data_dir();
    fs::write(presets.join("readme.txt"), "not a preset").expect("write readme");
    fs::write(
        presets.join("Face.json"),
        r#"{"HairColor": "Gone.esp|0x1"}"#,
    )
    .expect("write preset");

    let mut scanner = MissingPluginScanner::new(DataDirHost::new(temp.path()));
    let problems = scanner.active_problems();

    assert_eq!(problems.len(), 1);
    let snapshot = scanner.last_scan().expect("snapshot");
    assert_eq!(
        snapshot.report(&problems[0]).expect("report").preset,
        "Face.json"
    );
}

#[test]
fn malformed_preset_is_skipped_but_others_are_reported() {
    let (temp, presets) = setup_data_dir();
    fs::write(presets.join("broken.json"), "{ \"HairColor\": ").expect("write broken");
    fs::write(
        presets.join("valid.json"),
        r#"{"HeadParts": ["Gone.esp|0x1"]}"#,
    )
    .expect("write valid");

    let mut scanner = MissingPluginScanner::new(DataDirHost::new(temp.path()));
    let problems = scanner.active_problems();

    assert_eq!(
        problems.len(),
        1,
        "The broken preset should be skipped, not reported and not fatal"
    );
    let snapshot = scanner.last_scan().expect("snapshot");
    assert_eq!(
        snapshot.report(&problems[0]).expect("report").preset,
        "valid.json"
    );
}

#[test]
fn rescan_after_plugin_activation_clears_the_problem() {
    let (temp, presets) = setup_data_dir();
    let preset_path = presets.join("Face.json");
    fs::write(&preset_path, r#"{"HairColor": "Hair.esp|0x1"}"#).expect("write preset");

    let mut scanner = MissingPluginScanner::new(DataDirHost::new(temp.path()));
    assert_eq!(scanner.active_problems().len(), 1);

    // The user activates the plugin; the host re-runs the scan.
    let mut host = DataDirHost::new(temp.path());
    host.plugins = vec!["Hair.esp".to_string()];
    let mut scanner = MissingPluginScanner::new(host);
    assert!(scanner.active_problems().is_empty());
}

#[test]
fn direct_scan_with_explicit_paths_and_plugin_set() {
    let (temp, presets) = setup_data_dir();
    let preset1 = presets.join("preset1.json");
    let preset2 = presets.join("preset2.json");
    fs::write(
        &preset1,
        r#"{"HairColor": "HairA.esp|0x001", "HeadParts": ["HeadB.esp|0x002"]}"#,
    )
    .expect("write preset1");
    fs::write(&preset2, r#"{"HairColor": "HairA.esp|0x001"}"#).expect("write preset2");

    let mut scanner = MissingPluginScanner::new(DataDirHost::new(temp.path()));
    let active = ActivePluginSet::new(["HairA.esp"]);
    let snapshot = scanner.scan(&[preset1, preset2], &active);

    assert_eq!(snapshot.len(), 1);
    let report = snapshot.report(&snapshot.keys()[0]).expect("report");
    assert_eq!(report.preset, "preset1.json");
    assert_eq!(report.missing_plugins, vec!["HeadB.esp"]);
}

#[test]
fn disabled_setting_turns_the_diagnostic_off() {
    let (temp, presets) = setup_data_dir();
    fs::write(
        presets.join("Face.json"),
        r#"{"HairColor": "Gone.esp|0x1"}"#,
    )
    .expect("write preset");

    let mut host = DataDirHost::new(temp.path());
    host.enabled = Some(false);
    let mut scanner = MissingPluginScanner::new(host);

    assert!(!scanner.is_enabled());
    assert!(scanner.active_problems().is_empty());
}

#[test]
fn diagnostic_metadata_is_exposed_to_the_host() {
    let temp = TempDir::new().expect("Failed to create temp directory");
    let scanner = MissingPluginScanner::new(DataDirHost::new(temp.path()));

    let info = scanner.info();
    assert_eq!(info.name, presetcheck_core::DIAGNOSTIC_NAME);
    assert!(!info.version.is_empty());
    assert_eq!(scanner.tooltip(), info.description);

    let settings = scanner.settings();
    assert_eq!(settings.len(), 1);
    assert_eq!(settings[0].key, presetcheck_core::SETTING_ENABLED);
    assert!(settings[0].default);
}
