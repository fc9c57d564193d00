//! Configuration Settings
//!
//! Process-wide defaults for the document filter, read from `texdok.toml`:
//!
//! ```toml
//! format = "pdf"
//! output_path = "build/docs"
//! debug = false
//!
//! [programs]
//! latex = "/usr/bin/latex"
//! pdflatex = "/usr/bin/pdflatex"
//! dvips = "/usr/bin/dvips"
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::FilterConfig;
use crate::programs::ProgramPaths;

/// Top-level settings structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Default output format when a call names none
    pub format: Option<String>,
    /// Root directory that destination names are resolved against
    pub output_path: Option<PathBuf>,
    /// Per-call diagnostics at debug level
    pub debug: bool,
    /// Toolchain program locations
    pub programs: ProgramPaths,
}

impl Settings {
    /// Parse settings from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Serialize back to TOML
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Fill program paths the file leaves out from `PATH`
    pub fn with_detected_programs(mut self) -> Self {
        self.programs = self.programs.or_detect();
        self
    }

    /// Snapshot of the filter defaults these settings describe
    ///
    /// The result is a copy: changing the settings later does not affect
    /// filters registered with an earlier snapshot.
    pub fn filter_defaults(&self) -> FilterConfig {
        FilterConfig {
            format: self.format.clone(),
            output: None,
            programs: self.programs.clone(),
            debug: Some(self.debug),
        }
    }
}
