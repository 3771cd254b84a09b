//! PresetCheck Core Library
//!
//! Diagnostic core for mod-management applications: scans LooksMenu
//! character preset files and reports references to plugins that are
//! missing from, or not active in, the host's current load order.
//!
//! # Architecture
//!
//! This library is designed to be embedded by a mod-manager host. The host
//! owns the virtual file system, the plugin list, the settings store, and
//! the diagnostics UI; it hands those capabilities to this crate through
//! the [`HostEnvironment`] trait and consumes problem reports through the
//! [`Diagnostic`] trait.
//!
//! # Core Features
//!
//! ## Preset Parsing (`preset` module)
//! - [`PresetRecord::load`] - Parse a single preset file
//! - [`PresetRecord::plugin_references`] - Extract the plugins a preset depends on
//! - [`PresetRecord::missing_plugins`] - Diff references against the active load order
//!
//! ## Scanning and Reporting (`scanner` module)
//! - [`MissingPluginScanner::scan`] - Check a batch of preset files and build reports
//! - [`describe`] - Format a report as short/full diagnostic text
//! - [`ScanSnapshot`] - Keyed, immutable result set of the last scan
//!
//! ## Host Integration (`host` module)
//! - [`HostEnvironment`] - Capabilities the host provides to the scanner
//! - [`Diagnostic`] - Capabilities the scanner provides to the host

pub mod host;
pub mod plugins;
pub mod preset;
pub mod scanner;

pub use host::{Diagnostic, DiagnosticInfo, HostEnvironment, SettingSpec};
pub use plugins::ActivePluginSet;
pub use preset::{is_preset_file, PresetError, PresetRecord};
pub use scanner::{
    describe, MissingPluginReport, MissingPluginScanner, ProblemDescription, ProblemKey,
    ScanSnapshot,
};

/// Directory holding LooksMenu presets, relative to the game's data root.
pub const PRESETS_DIR: &str = "F4SE/Plugins/F4EE/Presets";

/// File extension of LooksMenu preset files.
pub const PRESET_EXTENSION: &str = "json";

/// Display name under which the host registers this diagnostic.
pub const DIAGNOSTIC_NAME: &str = "LooksMenu Missing Plugins";

/// Key of the host-persisted setting that gates scanning.
pub const SETTING_ENABLED: &str = "enabled";
