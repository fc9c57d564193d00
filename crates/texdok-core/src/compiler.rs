//! LaTeX to document compiler
//!
//! Runs the external toolchain on LaTeX text inside a disposable working
//! directory and hands back the produced document, either as bytes or as a
//! file under the output root.
//!
//! The working directory is given to each child process; the calling
//! process's own working directory is never changed, so compile calls can
//! run concurrently.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::process::{Command, Stdio};

use crate::config::FilterConfig;
use crate::error::{Result, TexdokError};
use crate::format::ResolvedJob;
use crate::logscan;
use crate::workdir::WorkDir;

/// Base name of every file the toolchain reads or writes
pub const SOURCE_NAME: &str = "tt2latex";

// Per-call diagnostics: visible at debug level when the call asks for them
macro_rules! diag {
    ($debug:expr, $($arg:tt)+) => {
        if $debug {
            log::debug!($($arg)+)
        } else {
            log::trace!($($arg)+)
        }
    };
}

/// Compiler for converting LaTeX text to PDF, PostScript or DVI
#[derive(Debug, Clone)]
pub struct Compiler {
    /// Directory destination names are resolved against
    output_root: Option<PathBuf>,
    /// Where working directories are created
    temp_root: PathBuf,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Compiler {
    /// Compiler without an output root, using the system temp directory
    pub fn new() -> Self {
        Self {
            output_root: None,
            temp_root: std::env::temp_dir(),
        }
    }

    /// Set the directory that destination names are relative to
    pub fn with_output_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.output_root = Some(root.into());
        self
    }

    /// Create working directories under `root` instead of the system temp
    /// directory
    pub fn with_temp_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.temp_root = root.into();
        self
    }

    pub fn output_root(&self) -> Option<&Path> {
        self.output_root.as_deref()
    }

    /// Compile LaTeX text into a document
    ///
    /// # Arguments
    /// * `text` - Complete LaTeX source, written verbatim
    /// * `config` - Format, destination and program paths for this call
    ///
    /// # Returns
    /// The document bytes, or an empty vector when the document was written
    /// to its destination under the output root
    pub fn compile(&self, text: &[u8], config: &FilterConfig) -> Result<Vec<u8>> {
        check_platform()?;

        let job = config.resolve()?;
        job.check_programs()?;
        let destination = job
            .destination
            .as_deref()
            .map(|name| self.destination_path(name))
            .transpose()?;

        let debug = config.is_debug();
        let workdir = WorkDir::create_in(&self.temp_root)
            .map_err(|source| TexdokError::TempDirCreationFailed { source })?;
        diag!(
            debug,
            "Compiling {} bytes to {} in {}",
            text.len(),
            job.format,
            workdir.path().display()
        );

        let source = workdir.join(format!("{SOURCE_NAME}.tex"));
        fs::write(&source, text).map_err(|source_err| TexdokError::SourceWriteFailed {
            path: source.clone(),
            source: source_err,
        })?;

        self.run_toolchain(&job, &workdir, debug)?;

        // The toolchain succeeded, but a vanished working directory means
        // its output cannot be trusted.
        fs::metadata(workdir.path()).map_err(|source| TexdokError::WorkDirLost {
            path: workdir.path().to_path_buf(),
            source,
        })?;

        let produced = workdir.join(format!("{SOURCE_NAME}.{}", job.format.extension()));

        if let Some(dest) = &destination {
            create_parent(dest)?;
            match fs::rename(&produced, dest) {
                Ok(()) => {
                    diag!(debug, "Moved {} to {}", produced.display(), dest.display());
                    return Ok(Vec::new());
                }
                Err(e) => diag!(
                    debug,
                    "Cannot move {} to {} ({}), copying instead",
                    produced.display(),
                    dest.display(),
                    e
                ),
            }
        }

        let bytes = fs::read(&produced).map_err(|source| TexdokError::OutputReadFailed {
            path: produced.clone(),
            source,
        })?;
        drop(workdir);

        match destination {
            Some(dest) => {
                fs::write(&dest, &bytes).map_err(|source| TexdokError::OutputWriteFailed {
                    path: dest.clone(),
                    source,
                })?;
                diag!(debug, "Wrote {} bytes to {}", bytes.len(), dest.display());
                Ok(Vec::new())
            }
            None => Ok(bytes),
        }
    }

    fn run_toolchain(&self, job: &ResolvedJob, workdir: &WorkDir, debug: bool) -> Result<()> {
        let program_path = job.program_path()?;
        let source = format!("{SOURCE_NAME}.tex");
        let status = run(
            job.program,
            program_path,
            &["-interaction=nonstopmode", source.as_str()],
            workdir.path(),
            debug,
        )?;
        if !status.success() {
            diag!(debug, "{} exited with {}", job.program, status);
            let detail = logscan::read_log_errors(&workdir.join(format!("{SOURCE_NAME}.log")));
            return Err(TexdokError::Toolchain {
                program: job.program.to_string(),
                detail,
            });
        }

        if job.format.needs_dvips() {
            let dvips_path = job.dvips_path()?;
            let status = run("dvips", dvips_path, &[SOURCE_NAME, "-o"], workdir.path(), debug)?;
            if !status.success() {
                diag!(debug, "dvips exited with {}", status);
                return Err(TexdokError::Toolchain {
                    program: "dvips".to_string(),
                    detail: format!("{} {SOURCE_NAME}.dvi failed", dvips_path.display()),
                });
            }
        }

        Ok(())
    }

    /// Destination name joined onto the output root
    ///
    /// Root and prefix components of `name` are dropped, so an absolute name
    /// still lands under the output root.
    fn destination_path(&self, name: &str) -> Result<PathBuf> {
        let root = self.output_root.as_ref().ok_or(TexdokError::OutputPathUnset)?;
        let mut path = root.clone();
        for component in Path::new(name).components() {
            match component {
                Component::Prefix(_) | Component::RootDir | Component::CurDir => {}
                other => path.push(other),
            }
        }
        Ok(path)
    }
}

/// Compile with a default [`Compiler`] and the given output root
pub fn compile(text: &[u8], config: &FilterConfig, output_root: Option<&Path>) -> Result<Vec<u8>> {
    let mut compiler = Compiler::new();
    if let Some(root) = output_root {
        compiler = compiler.with_output_root(root);
    }
    compiler.compile(text, config)
}

fn check_platform() -> Result<()> {
    if cfg!(any(unix, windows)) {
        Ok(())
    } else {
        Err(TexdokError::UnsupportedPlatform {
            os: std::env::consts::OS.to_string(),
        })
    }
}

fn run(
    program: &str,
    path: &Path,
    args: &[&str],
    dir: &Path,
    debug: bool,
) -> Result<std::process::ExitStatus> {
    let path = absolute_program_path(path);
    diag!(debug, "Running {} {} in {}", path.display(), args.join(" "), dir.display());

    Command::new(&path)
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => TexdokError::ProgramNotFound {
                program: program.to_string(),
            },
            _ => TexdokError::Spawn {
                program: program.to_string(),
                source,
            },
        })
}

/// Relative paths such as `bin/pdflatex` would otherwise be looked up from
/// the child's working directory. Bare names are left for the `PATH` search.
fn absolute_program_path(path: &Path) -> PathBuf {
    if path.is_relative() && path.components().count() > 1 {
        if let Ok(cwd) = std::env::current_dir() {
            return cwd.join(path);
        }
    }
    path.to_path_buf()
}

fn create_parent(dest: &Path) -> Result<()> {
    match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|source| TexdokError::OutputWriteFailed {
                path: dest.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}
