//! Locations of the typesetting programs

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Paths of the external toolchain programs
///
/// A missing or empty path means the program is not available; calls that
/// need it fail with `ProgramNotFound` before anything is run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgramPaths {
    pub latex: Option<PathBuf>,
    pub pdflatex: Option<PathBuf>,
    pub dvips: Option<PathBuf>,
}

impl ProgramPaths {
    /// Find all three programs on `PATH`
    pub fn detect() -> Self {
        Self {
            latex: locate("latex"),
            pdflatex: locate("pdflatex"),
            dvips: locate("dvips"),
        }
    }

    /// Keep configured paths and look up the missing ones on `PATH`
    pub fn or_detect(self) -> Self {
        Self {
            latex: self.latex.or_else(|| locate("latex")),
            pdflatex: self.pdflatex.or_else(|| locate("pdflatex")),
            dvips: self.dvips.or_else(|| locate("dvips")),
        }
    }

    /// Per-key override: values present in `overrides` win
    pub fn merged_with(&self, overrides: &ProgramPaths) -> Self {
        Self {
            latex: overrides.latex.clone().or_else(|| self.latex.clone()),
            pdflatex: overrides.pdflatex.clone().or_else(|| self.pdflatex.clone()),
            dvips: overrides.dvips.clone().or_else(|| self.dvips.clone()),
        }
    }

    /// Path configured for a program by name
    pub fn for_program(&self, program: &str) -> Option<&PathBuf> {
        match program {
            "latex" => self.latex.as_ref(),
            "pdflatex" => self.pdflatex.as_ref(),
            "dvips" => self.dvips.as_ref(),
            _ => None,
        }
    }
}

fn locate(program: &str) -> Option<PathBuf> {
    match which::which(program) {
        Ok(path) => {
            log::debug!("Located {} at {}", program, path.display());
            Some(path)
        }
        Err(e) => {
            log::debug!("{} not found on PATH: {}", program, e);
            None
        }
    }
}
