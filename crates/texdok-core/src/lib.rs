//! texdok-core - LaTeX document generation via the external toolchain
//!
//! This crate turns LaTeX text into PDF, PostScript or DVI documents by
//! running `pdflatex`, `latex` and `dvips`.
//!
//! # Architecture
//!
//! A compile call goes through three stages:
//!
//! 1. **Resolver** - picks the format, program and destination from the
//!    call's [`FilterConfig`]
//! 2. **Compiler** - runs the toolchain in a private [`WorkDir`] and scrapes
//!    the TeX log when a program fails
//! 3. **Delivery** - returns the document bytes, or moves the document to
//!    its destination under the output root
//!
//! # Example
//!
//! ```ignore
//! use texdok_core::{Compiler, FilterConfig, ProgramPaths};
//!
//! let config = FilterConfig::new()
//!     .with_format("pdf")
//!     .with_programs(ProgramPaths::detect());
//! let pdf_bytes = Compiler::new().compile(latex.as_bytes(), &config)?;
//! ```

mod compiler;
mod config;
mod error;
mod format;
pub mod logscan;
mod programs;
mod settings;
mod workdir;

pub use compiler::{compile, Compiler, SOURCE_NAME};
pub use config::FilterConfig;
pub use error::{Result, TexdokError};
pub use format::{resolve, Format, ResolvedJob};
pub use programs::ProgramPaths;
pub use settings::Settings;
pub use workdir::WorkDir;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_structure() {
        // Verify exports are accessible
        let _ = Compiler::compile;
        let _ = resolve;
        let _ = logscan::extract_errors::<std::io::Cursor<Vec<u8>>>;
        assert!(!VERSION.is_empty());
    }
}
