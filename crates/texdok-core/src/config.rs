//! Per-call filter configuration

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::format::{self, ResolvedJob};
use crate::programs::ProgramPaths;

/// Options recognised by the document filter
///
/// The same shape serves as registration-time defaults and as call-time
/// overrides; [`FilterConfig::merged_with`] combines the two.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// `pdf`, `ps` or `dvi`, any case
    pub format: Option<String>,
    /// Destination file name, relative to the output root
    pub output: Option<String>,
    #[serde(flatten)]
    pub programs: ProgramPaths,
    /// Emit per-call diagnostics at debug level
    pub debug: Option<bool>,
}

impl FilterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn with_programs(mut self, programs: ProgramPaths) -> Self {
        self.programs = programs;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = Some(debug);
        self
    }

    /// Combine with call-time overrides; a key set in `overrides` wins
    pub fn merged_with(&self, overrides: &FilterConfig) -> Self {
        Self {
            format: overrides.format.clone().or_else(|| self.format.clone()),
            output: overrides.output.clone().or_else(|| self.output.clone()),
            programs: self.programs.merged_with(&overrides.programs),
            debug: overrides.debug.or(self.debug),
        }
    }

    pub fn is_debug(&self) -> bool {
        self.debug.unwrap_or(false)
    }

    /// Resolve the format, program and destination this configuration asks for
    pub fn resolve(&self) -> Result<ResolvedJob> {
        format::resolve(
            self.format.as_deref(),
            self.output.as_deref(),
            &self.programs,
        )
    }
}
