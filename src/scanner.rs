//! Preset scanning and missing-plugin reporting.
//!
//! The scanner walks a batch of preset files, diffs each preset's plugin
//! references against the host's active load order, and keeps the results
//! as an immutable [`ScanSnapshot`]. The snapshot maps opaque problem keys
//! to reports so the host's diagnostics UI can resolve a key to display
//! text at any later point.
//!
//! # Scan Model
//!
//! Every scan is a full re-scan. Nothing is diffed incrementally and no
//! state survives except the last snapshot, which is replaced wholesale on
//! the next invocation. Preset counts are small (tens of files), so
//! correctness wins over efficiency here.
//!
//! A preset that fails to parse is logged and skipped; it never aborts the
//! rest of the batch. Only presets with at least one missing plugin make it
//! into the snapshot at all.

use crate::host::{Diagnostic, DiagnosticInfo, HostEnvironment, SettingSpec};
use crate::plugins::ActivePluginSet;
use crate::preset::{is_preset_file, PresetRecord};
use crate::{DIAGNOSTIC_NAME, PRESETS_DIR, SETTING_ENABLED};
use chrono::{DateTime, Local};
use log::{debug, error, warn};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Source label used when the host cannot tell which mod a preset came from.
const UNKNOWN_SOURCE: &str = "<unknown>";

/// Opaque, stable identifier of one problem within a snapshot.
///
/// Derived from the preset's path, so the same file keeps the same key
/// across scans.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ProblemKey(String);

impl ProblemKey {
    fn for_path(path: &Path) -> ProblemKey {
        let digest = md5::compute(path.to_string_lossy().as_bytes());
        ProblemKey(format!("{:x}", digest))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One preset with at least one missing plugin.
///
/// Immutable once created; the next scan replaces it rather than updating
/// it in place.
#[derive(Debug, Clone, Serialize)]
pub struct MissingPluginReport {
    /// Display name of the preset (file name, not full path).
    pub preset: String,
    /// Missing plugin identifiers, in extraction order, duplicates removed.
    pub missing_plugins: Vec<String>,
    /// Which mod(s) contributed the preset file. Opaque display text; a
    /// preset shipped by several mods gets all of their names.
    pub source: String,
}

/// Short and full diagnostic text for one report.
#[derive(Debug, Clone, Serialize)]
pub struct ProblemDescription {
    pub short: String,
    pub full: String,
}

/// Result set of one scan invocation.
#[derive(Debug, Clone)]
pub struct ScanSnapshot {
    generated_at: DateTime<Local>,
    keys: Vec<ProblemKey>,
    reports: HashMap<ProblemKey, MissingPluginReport>,
}

impl ScanSnapshot {
    /// Problem keys in the order the preset paths were supplied to the scan.
    pub fn keys(&self) -> &[ProblemKey] {
        &self.keys
    }

    pub fn report(&self, key: &ProblemKey) -> Option<&MissingPluginReport> {
        self.reports.get(key)
    }

    pub fn generated_at(&self) -> DateTime<Local> {
        self.generated_at
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Scans LooksMenu presets for references to missing or inactive plugins.
///
/// Holds the host handle and the snapshot of the last completed scan,
/// nothing else.
pub struct MissingPluginScanner<H: HostEnvironment> {
    host: H,
    last_scan: Option<ScanSnapshot>,
}

impl<H: HostEnvironment> MissingPluginScanner<H> {
    pub fn new(host: H) -> MissingPluginScanner<H> {
        MissingPluginScanner {
            host,
            last_scan: None,
        }
    }

    /// Snapshot of the last completed scan, if any.
    pub fn last_scan(&self) -> Option<&ScanSnapshot> {
        self.last_scan.as_ref()
    }

    /// Discover presets through the host and scan them.
    ///
    /// Convenience wrapper around [`MissingPluginScanner::scan`] that pulls
    /// the preset paths and the active plugin list from the host.
    pub fn run(&mut self) -> &ScanSnapshot {
        let paths = self
            .host
            .find_files(Path::new(PRESETS_DIR), &is_preset_file);
        let active = ActivePluginSet::new(self.host.plugin_names());
        self.scan(&paths, &active)
    }

    /// Check every given preset against the active plugin set.
    ///
    /// Presets that fail to parse are logged and skipped. Reports come out
    /// in input-path order, so a deterministic input yields a deterministic
    /// snapshot. The previous snapshot is discarded whole.
    pub fn scan(&mut self, preset_paths: &[PathBuf], active: &ActivePluginSet) -> &ScanSnapshot {
        let mut keys = Vec::new();
        let mut reports = HashMap::new();

        if preset_paths.is_empty() {
            debug!("No LooksMenu presets found.");
        }

        for path in preset_paths {
            let record = match PresetRecord::load(path) {
                Ok(record) => record,
                Err(e) => {
                    // One broken preset must not abort the batch.
                    error!("{}", e);
                    continue;
                }
            };

            let missing_plugins = record.missing_plugins(active);
            if missing_plugins.is_empty() {
                continue;
            }

            let key = ProblemKey::for_path(path);
            let report = MissingPluginReport {
                preset: record.file_name(),
                missing_plugins,
                source: self.origin_label(path),
            };
            debug!(
                "{} is missing plugins: {}",
                report.preset,
                report.missing_plugins.join(", ")
            );
            keys.push(key.clone());
            reports.insert(key, report);
        }

        self.last_scan.insert(ScanSnapshot {
            generated_at: Local::now(),
            keys,
            reports,
        })
    }

    /// Ask the host which mod(s) a preset file came from.
    ///
    /// A failed lookup degrades to a placeholder label so the report can
    /// still be produced.
    fn origin_label(&self, path: &Path) -> String {
        match self.host.file_origins(path) {
            Ok(origins) if origins.is_empty() => UNKNOWN_SOURCE.to_string(),
            Ok(origins) => origins.join(", "),
            Err(e) => {
                warn!(
                    "Could not resolve the origin of {}: {}",
                    path.display(),
                    e
                );
                UNKNOWN_SOURCE.to_string()
            }
        }
    }
}

impl<H: HostEnvironment> Diagnostic for MissingPluginScanner<H> {
    fn info(&self) -> DiagnosticInfo {
        DiagnosticInfo {
            name: DIAGNOSTIC_NAME.to_string(),
            author: "PresetCheck contributors".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            description: "Looks over LooksMenu preset files and checks for any references \
                          to plugins that are either completely missing or currently not active."
                .to_string(),
        }
    }

    fn settings(&self) -> Vec<SettingSpec> {
        vec![SettingSpec {
            key: SETTING_ENABLED,
            caption: "Enable this diagnostic".to_string(),
            default: true,
        }]
    }

    fn is_enabled(&self) -> bool {
        self.host.setting_bool(SETTING_ENABLED).unwrap_or(true)
    }

    fn active_problems(&mut self) -> Vec<ProblemKey> {
        if !self.is_enabled() {
            debug!("{} is disabled, skipping scan.", DIAGNOSTIC_NAME);
            return Vec::new();
        }
        self.run().keys().to_vec()
    }

    fn short_description(&self, key: &ProblemKey) -> Option<String> {
        let report = self.last_scan.as_ref()?.report(key)?;
        Some(describe(report).short)
    }

    fn full_description(&self, key: &ProblemKey) -> Option<String> {
        let report = self.last_scan.as_ref()?.report(key)?;
        Some(describe(report).full)
    }

    fn invalidate(&mut self) {
        self.last_scan = None;
    }
}

/// Format a report as diagnostics text. Pure formatting, no I/O.
pub fn describe(report: &MissingPluginReport) -> ProblemDescription {
    ProblemDescription {
        short: format!(
            "LooksMenu preset \"{}\" is missing one or more plugins.",
            report.preset
        ),
        full: format!(
            "The LooksMenu preset \"{}\" from the \"{}\" mod is missing one or more plugins: {}",
            report.preset,
            report.source,
            report.missing_plugins.join(", ")
        ),
    }
}
