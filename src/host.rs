//! Host integration contract.
//!
//! This module defines both sides of the boundary between the library and
//! the mod-manager application embedding it:
//!
//! - [`HostEnvironment`] is what the host provides: file discovery over its
//!   virtual file system, the active plugin list, per-file origin lookup,
//!   and the persisted settings store.
//! - [`Diagnostic`] is what the scanner provides back: problem enumeration
//!   and key-to-text resolution for the host's diagnostics panel.
//!
//! The host holds a plain reference to a [`Diagnostic`] implementation;
//! there is no base type to inherit from and no registration machinery in
//! this crate.
//!
//! # Usage
//!
//! ```
//! use presetcheck_core::{Diagnostic, HostEnvironment, MissingPluginScanner};
//! use std::path::{Path, PathBuf};
//!
//! struct MyHost;
//!
//! impl HostEnvironment for MyHost {
//!     fn find_files(&self, _dir: &Path, _predicate: &dyn Fn(&Path) -> bool) -> Vec<PathBuf> {
//!         Vec::new() // walk the virtual file system here
//!     }
//!
//!     fn plugin_names(&self) -> Vec<String> {
//!         vec!["Fallout4.esm".to_string()]
//!     }
//!
//!     fn file_origins(&self, _path: &Path) -> anyhow::Result<Vec<String>> {
//!         Ok(Vec::new())
//!     }
//!
//!     fn setting_bool(&self, _setting: &str) -> Option<bool> {
//!         None
//!     }
//! }
//!
//! let mut scanner = MissingPluginScanner::new(MyHost);
//! for key in scanner.active_problems() {
//!     if let Some(text) = scanner.full_description(&key) {
//!         eprintln!("{text}");
//!     }
//! }
//! ```

use crate::scanner::ProblemKey;
use anyhow::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Capabilities the embedding application hands to the scanner.
///
/// All methods are snapshots of host state at call time; the library never
/// caches their results beyond a single scan.
pub trait HostEnvironment {
    /// Enumerate files under `relative_dir` (relative to the game's data
    /// root) that satisfy `predicate`. The host decides the order; the
    /// scanner reports problems in whatever order the host returns here.
    fn find_files(&self, relative_dir: &Path, predicate: &dyn Fn(&Path) -> bool) -> Vec<PathBuf>;

    /// Names of the plugins currently active in the load order.
    fn plugin_names(&self) -> Vec<String>;

    /// Which mod(s) contributed the given file. More than one entry means
    /// the file is overridden by several mods; how that is disambiguated is
    /// the host's business.
    fn file_origins(&self, path: &Path) -> Result<Vec<String>>;

    /// Look up a boolean setting persisted by the host. `None` means the
    /// setting was never stored; callers fall back to their declared
    /// default.
    fn setting_bool(&self, setting: &str) -> Option<bool>;
}

/// Identity of a diagnostic, for the host's plugin registry.
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticInfo {
    pub name: String,
    pub author: String,
    pub version: String,
    pub description: String,
}

/// A setting this diagnostic asks the host to register and persist.
#[derive(Debug, Clone, Serialize)]
pub struct SettingSpec {
    pub key: &'static str,
    pub caption: String,
    pub default: bool,
}

/// What a diagnostic offers to the host's diagnostics panel.
///
/// The expected call sequence is `active_problems` once per refresh, then
/// `short_description`/`full_description` for whichever keys the user
/// actually looks at.
pub trait Diagnostic {
    /// Name, author, version, and description for the host's plugin list.
    fn info(&self) -> DiagnosticInfo;

    /// Settings to register with the host's settings store.
    fn settings(&self) -> Vec<SettingSpec>;

    /// Tooltip text for the host UI. Defaults to the description.
    fn tooltip(&self) -> String {
        self.info().description
    }

    /// Whether the diagnostic should run at all, per host settings.
    fn is_enabled(&self) -> bool;

    /// Run a full scan and return the keys of all current problems.
    /// Returns an empty list without scanning when the diagnostic is
    /// disabled.
    fn active_problems(&mut self) -> Vec<ProblemKey>;

    /// One-line description of a problem from the last scan.
    fn short_description(&self, key: &ProblemKey) -> Option<String>;

    /// Complete description of a problem from the last scan, including the
    /// preset's source and every missing plugin.
    fn full_description(&self, key: &ProblemKey) -> Option<String>;

    /// Whether the diagnostic can walk the user through fixing the given
    /// problem. Missing plugins have to be installed or re-activated by
    /// hand, so the default is `false`.
    fn has_guided_fix(&self, _key: &ProblemKey) -> bool {
        false
    }

    /// Drop the last scan's results. Hosts call this when the mod list
    /// changes so that stale problems are not shown before the next scan.
    fn invalidate(&mut self);
}
