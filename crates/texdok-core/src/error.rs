//! Error types for document compilation

use std::path::PathBuf;

use thiserror::Error;

/// Result type for texdok operations
pub type Result<T> = std::result::Result<T, TexdokError>;

/// Errors that can occur while turning LaTeX text into a document
///
/// Every variant is terminal for the current call. None of them is retried.
#[derive(Error, Debug)]
pub enum TexdokError {
    /// The host platform cannot run the toolchain as a child process
    #[error("{os} does not support running the LaTeX toolchain")]
    UnsupportedPlatform { os: String },

    /// Neither a format nor an output name was given
    #[error("output format not specified")]
    FormatNotSpecified,

    /// An explicit format is not one of pdf, ps or dvi
    #[error("invalid output format: {format}")]
    InvalidFormat { format: String },

    /// The output name implies no known format
    #[error("cannot determine output format from file name: {output}")]
    UnresolvableFormat { output: String },

    /// The program needed for the format has no configured path
    #[error("{program} cannot be found, please specify its location")]
    ProgramNotFound { program: String },

    /// The per-call working directory could not be created
    #[error("failed to create temporary directory: {source}")]
    TempDirCreationFailed {
        #[source]
        source: std::io::Error,
    },

    /// The LaTeX source could not be written into the working directory
    #[error("failed to write {}: {source}", path.display())]
    SourceWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The working directory vanished while the toolchain ran
    ///
    /// Fatal even when the toolchain succeeded. This is the
    /// `ChdirRestoreFailed` case of the error taxonomy: the calling process
    /// never changes directory, so losing the child's directory takes its place.
    #[error("lost track of working directory {}: {source}", path.display())]
    WorkDirLost {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A toolchain program could not be started
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// A toolchain program exited with a non-zero status
    #[error("{program} errors:\n{detail}")]
    Toolchain { program: String, detail: String },

    /// A destination was requested but no output root is configured
    #[error("output path is not set")]
    OutputPathUnset,

    /// The produced document could not be read back
    #[error("failed to read {}: {source}", path.display())]
    OutputReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The produced document could not be written to its destination
    #[error("failed to write {}: {source}", path.display())]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TexdokError {
    /// True for failures detected before any external process was started
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedPlatform { .. }
                | Self::FormatNotSpecified
                | Self::InvalidFormat { .. }
                | Self::UnresolvableFormat { .. }
                | Self::ProgramNotFound { .. }
                | Self::OutputPathUnset
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toolchain_message_carries_detail() {
        let err = TexdokError::Toolchain {
            program: "pdflatex".to_string(),
            detail: "! Undefined control sequence.\nl.3 \\foo\n".to_string(),
        };
        let message = err.to_string();
        assert!(message.starts_with("pdflatex errors:"));
        assert!(message.contains("l.3 \\foo"));
    }

    #[test]
    fn test_precondition_classification() {
        assert!(TexdokError::FormatNotSpecified.is_precondition());
        assert!(TexdokError::OutputPathUnset.is_precondition());
        assert!(!TexdokError::Toolchain {
            program: "latex".to_string(),
            detail: String::new(),
        }
        .is_precondition());
    }
}
