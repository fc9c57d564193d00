//! Output formats and format resolution
//!
//! Decides which document format a call produces and which toolchain
//! program builds it. Precedence is fixed: an explicit format wins, then the
//! extension of the output name, then an output name that is itself a format
//! keyword (legacy single-argument usage), and anything else is an error.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TexdokError};
use crate::programs::ProgramPaths;

/// Documents the toolchain can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// PDF via pdflatex
    Pdf,
    /// PostScript via latex and dvips
    Ps,
    /// DVI via latex
    Dvi,
}

impl Format {
    /// Lowercase format keyword, also the produced file's extension
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Ps => "ps",
            Self::Dvi => "dvi",
        }
    }

    /// Name of the program that typesets the source for this format
    pub fn program(&self) -> &'static str {
        match self {
            Self::Pdf => "pdflatex",
            Self::Ps | Self::Dvi => "latex",
        }
    }

    /// Whether the DVI output has to be converted by dvips afterwards
    pub fn needs_dvips(&self) -> bool {
        matches!(self, Self::Ps)
    }

    /// Case-insensitive keyword lookup
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|f| f.extension().eq_ignore_ascii_case(keyword))
    }

    pub fn all() -> &'static [Format] {
        &[Self::Pdf, Self::Ps, Self::Dvi]
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for Format {
    type Err = TexdokError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_keyword(s).ok_or_else(|| TexdokError::InvalidFormat {
            format: s.to_string(),
        })
    }
}

/// Everything a compile call needs to know about what to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedJob {
    pub format: Format,
    /// `pdflatex` or `latex`
    pub program: &'static str,
    pub program_path: Option<PathBuf>,
    /// Only resolved for PostScript output
    pub dvips_path: Option<PathBuf>,
    /// Output name relative to the output root, if the document is to be
    /// written to a file rather than returned
    pub destination: Option<String>,
}

impl ResolvedJob {
    /// Fail unless every program the job runs has a configured path
    pub fn check_programs(&self) -> Result<()> {
        self.program_path()?;
        if self.format.needs_dvips() {
            self.dvips_path()?;
        }
        Ok(())
    }

    /// Configured path of the typesetting program
    pub fn program_path(&self) -> Result<&Path> {
        configured(self.program_path.as_deref(), self.program)
    }

    /// Configured path of dvips
    pub fn dvips_path(&self) -> Result<&Path> {
        configured(self.dvips_path.as_deref(), "dvips")
    }
}

fn configured<'a>(path: Option<&'a Path>, program: &str) -> Result<&'a Path> {
    path.filter(|p| !p.as_os_str().is_empty())
        .ok_or_else(|| TexdokError::ProgramNotFound {
            program: program.to_string(),
        })
}

/// Resolve the format, program and destination of a call
pub fn resolve(
    format: Option<&str>,
    output: Option<&str>,
    programs: &ProgramPaths,
) -> Result<ResolvedJob> {
    let (format, destination) = match (format, output) {
        (Some(format), output) => (format.parse::<Format>()?, output.map(str::to_string)),
        (None, Some(output)) => infer_from_output(output)?,
        (None, None) => return Err(TexdokError::FormatNotSpecified),
    };

    Ok(ResolvedJob {
        format,
        program: format.program(),
        program_path: programs.for_program(format.program()).cloned(),
        dvips_path: if format.needs_dvips() {
            programs.dvips.clone()
        } else {
            None
        },
        destination,
    })
}

fn infer_from_output(output: &str) -> Result<(Format, Option<String>)> {
    if let Some(format) = output
        .rsplit_once('.')
        .and_then(|(_, ext)| Format::from_keyword(ext))
    {
        return Ok((format, Some(output.to_string())));
    }

    // Legacy form: `latex("pdf")` names the format, not a file
    if let Some(format) = Format::from_keyword(output) {
        return Ok((format, None));
    }

    Err(TexdokError::UnresolvableFormat {
        output: output.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_programs() -> ProgramPaths {
        ProgramPaths {
            latex: Some(PathBuf::from("/usr/bin/latex")),
            pdflatex: Some(PathBuf::from("/usr/bin/pdflatex")),
            dvips: Some(PathBuf::from("/usr/bin/dvips")),
        }
    }

    #[test]
    fn test_explicit_format_selects_program() {
        let programs = all_programs();
        for (keyword, program) in [
            ("pdf", "pdflatex"),
            ("PS", "latex"),
            ("Dvi", "latex"),
        ] {
            let job = resolve(Some(keyword), None, &programs).unwrap();
            assert_eq!(job.program, program);
            assert_eq!(job.destination, None);
        }
    }

    #[test]
    fn test_ps_carries_dvips_path() {
        let programs = all_programs();
        let ps = resolve(Some("ps"), None, &programs).unwrap();
        assert_eq!(ps.dvips_path, Some(PathBuf::from("/usr/bin/dvips")));

        let pdf = resolve(Some("pdf"), None, &programs).unwrap();
        assert_eq!(pdf.dvips_path, None);
    }

    #[test]
    fn test_extension_matches_explicit_format() {
        let programs = all_programs();
        for format in Format::all() {
            let name = format!("report.{}", format.extension().to_uppercase());
            let inferred = resolve(None, Some(&name), &programs).unwrap();
            let explicit = resolve(Some(format.extension()), None, &programs).unwrap();
            assert_eq!(inferred.format, explicit.format);
            assert_eq!(inferred.program, explicit.program);
            assert_eq!(inferred.destination.as_deref(), Some(name.as_str()));
        }
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        let programs = all_programs();
        let upper = resolve(None, Some("EXAMPLE.PDF"), &programs).unwrap();
        let lower = resolve(None, Some("example.pdf"), &programs).unwrap();
        assert_eq!(upper.format, lower.format);
        assert_eq!(upper.program, lower.program);
    }

    #[test]
    fn test_bare_keyword_output_clears_destination() {
        let programs = all_programs();
        let job = resolve(None, Some("pdf"), &programs).unwrap();
        assert_eq!(job.format, Format::Pdf);
        assert_eq!(job.destination, None);

        let job = resolve(None, Some("PS"), &programs).unwrap();
        assert_eq!(job.format, Format::Ps);
        assert_eq!(job.destination, None);
    }

    #[test]
    fn test_unresolvable_output() {
        let programs = all_programs();
        for output in ["example.txt", "example", "pdf.doc"] {
            let err = resolve(None, Some(output), &programs).unwrap_err();
            assert!(
                matches!(err, TexdokError::UnresolvableFormat { output: ref o } if o == output),
                "unexpected error for {output}: {err:?}"
            );
        }
    }

    #[test]
    fn test_nothing_specified() {
        let err = resolve(None, None, &all_programs()).unwrap_err();
        assert!(matches!(err, TexdokError::FormatNotSpecified));
    }

    #[test]
    fn test_invalid_format_ignores_output() {
        let programs = all_programs();
        let err = resolve(Some("nonsense"), Some("example.pdf"), &programs).unwrap_err();
        assert!(matches!(err, TexdokError::InvalidFormat { ref format } if format == "nonsense"));
    }

    #[test]
    fn test_explicit_format_keeps_output_as_destination() {
        let job = resolve(Some("dvi"), Some("out/book.pdf"), &all_programs()).unwrap();
        assert_eq!(job.format, Format::Dvi);
        assert_eq!(job.destination.as_deref(), Some("out/book.pdf"));
    }

    #[test]
    fn test_check_programs() {
        let missing = ProgramPaths {
            latex: Some(PathBuf::from("/usr/bin/latex")),
            pdflatex: None,
            dvips: Some(PathBuf::new()),
        };

        let err = resolve(None, Some("example.pdf"), &missing)
            .unwrap()
            .check_programs()
            .unwrap_err();
        assert!(matches!(err, TexdokError::ProgramNotFound { ref program } if program == "pdflatex"));

        let err = resolve(None, Some("example.ps"), &missing)
            .unwrap()
            .check_programs()
            .unwrap_err();
        assert!(matches!(err, TexdokError::ProgramNotFound { ref program } if program == "dvips"));

        assert!(resolve(Some("dvi"), None, &missing)
            .unwrap()
            .check_programs()
            .is_ok());
    }

    #[test]
    fn test_format_properties() {
        assert_eq!("PDF".parse::<Format>().unwrap(), Format::Pdf);
        assert_eq!(Format::Ps.to_string(), "ps");
        assert!(Format::Ps.needs_dvips());
        assert!(!Format::Dvi.needs_dvips());
    }
}
