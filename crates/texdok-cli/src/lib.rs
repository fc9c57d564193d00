//! texdok CLI - Command-line interface library
//!
//! This library provides the CLI functionality for texdok:
//! - Render: Render a Tera template with the `latex` filters registered
//! - Compile: Typeset a LaTeX file to PDF, PostScript or DVI
//! - Config: Print the effective settings
//!
//! # Library Usage
//!
//! ```ignore
//! use texdok_cli::{compile_command, load_settings, apply_overrides};
//!
//! let settings = apply_overrides(load_settings(None)?, &Default::default());
//! let pdf = compile_command(Path::new("report.tex"), None, Some("pdf"), &settings)?;
//! ```
//!
//! # Binary Usage
//!
//! ```bash
//! # Render a letter; the filter writes letters/smith.pdf
//! texdok render letter.tex.tera --var name="Smith & Sons" --output-path build
//!
//! # Typeset a file to stdout
//! texdok compile report.tex --format pdf > report.pdf
//!
//! # Typeset a file into the working directory
//! texdok compile report.tex report.ps
//! ```

pub mod app;

// Re-export main entry point and commands
pub use app::{apply_overrides, compile_command, config_command, load_settings, render_command};
pub use app::run_cli;
