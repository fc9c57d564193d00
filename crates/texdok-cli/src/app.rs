//! CLI Application logic
//!
//! Contains the command-line interface implementation.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tera::Tera;
use texdok_core::{FilterConfig, ProgramPaths, Settings};
use texdok_filter::{DocumentFilter, FilterArgs};
use tracing::{debug, info};

/// Config files looked up in the working directory when `--config` is absent
const CONFIG_CANDIDATES: [&str; 2] = ["texdok.toml", ".texdok.toml"];

#[derive(Parser)]
#[command(name = "texdok")]
#[command(author, version, about = "Typeset LaTeX rendered by templates", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Location of the latex program
    #[arg(long, global = true)]
    latex: Option<PathBuf>,

    /// Location of the pdflatex program
    #[arg(long, global = true)]
    pdflatex: Option<PathBuf>,

    /// Location of the dvips program
    #[arg(long, global = true)]
    dvips: Option<PathBuf>,

    /// Log toolchain runs and cleanup
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a Tera template with the latex filters registered
    Render {
        /// Template file
        template: PathBuf,

        /// Template variable, may be repeated
        #[arg(long = "var", value_name = "KEY=VALUE", value_parser = parse_var)]
        vars: Vec<(String, String)>,

        /// Directory that filter destinations are written under
        #[arg(long)]
        output_path: Option<PathBuf>,
    },

    /// Typeset a LaTeX file
    Compile {
        /// Input LaTeX file
        input: PathBuf,

        /// Destination file name, or a bare format keyword
        destination: Option<String>,

        /// Output format (pdf, ps or dvi)
        #[arg(short, long)]
        format: Option<String>,
    },

    /// Print the effective settings
    Config,
}

/// Run the CLI application
///
/// This is the main entry point for the command-line interface.
/// It parses arguments and dispatches to the appropriate command.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let overrides = ProgramPaths {
        latex: cli.latex,
        pdflatex: cli.pdflatex,
        dvips: cli.dvips,
    };
    let mut settings = apply_overrides(load_settings(cli.config.as_deref())?, &overrides);
    if cli.verbose {
        settings.debug = true;
    }

    match cli.command {
        Commands::Render {
            template,
            vars,
            output_path,
        } => {
            if output_path.is_some() {
                settings.output_path = output_path;
            }
            let rendered = render_command(&template, &vars, &with_cwd_output_root(settings))?;
            print!("{}", rendered);
        }
        Commands::Compile {
            input,
            destination,
            format,
        } => {
            let bytes = compile_command(
                &input,
                destination.as_deref(),
                format.as_deref(),
                &with_cwd_output_root(settings),
            )?;
            if !bytes.is_empty() {
                let mut stdout = std::io::stdout().lock();
                stdout
                    .write_all(&bytes)
                    .and_then(|_| stdout.flush())
                    .context("Failed to write document to stdout")?;
            }
        }
        Commands::Config => {
            print!("{}", config_command(&settings)?);
        }
    }

    Ok(())
}

/// Render `template` with `vars` and return the output
///
/// Filter calls that name a destination write their document there and
/// contribute nothing to the returned text.
pub fn render_command(
    template: &Path,
    vars: &[(String, String)],
    settings: &Settings,
) -> Result<String> {
    let source = fs::read_to_string(template)
        .with_context(|| format!("Failed to read template: {}", template.display()))?;
    let name = template
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "template".to_string());

    let mut tera = Tera::default();
    texdok_filter::register_all(&mut tera, settings);
    tera.add_raw_template(&name, &source)
        .with_context(|| format!("Failed to parse template: {}", template.display()))?;

    let mut context = tera::Context::new();
    for (key, value) in vars {
        context.insert(key.as_str(), value);
    }

    info!("Rendering {}", template.display());
    tera.render(&name, &context)
        .with_context(|| format!("Failed to render template: {}", template.display()))
}

/// Typeset the LaTeX file `input`
///
/// `destination` follows the filter's positional rule: a file name writes
/// the document there, a bare format keyword selects the format. Returns
/// the document bytes when nothing was written.
pub fn compile_command(
    input: &Path,
    destination: Option<&str>,
    format: Option<&str>,
    settings: &Settings,
) -> Result<Vec<u8>> {
    let text = fs::read(input)
        .with_context(|| format!("Failed to read input: {}", input.display()))?;

    let mut named = FilterConfig::new();
    named.format = format.map(str::to_string);
    let args = FilterArgs {
        positional: destination.map(str::to_string).into_iter().collect(),
        named,
    };

    info!("Compiling {}", input.display());
    DocumentFilter::from_settings(settings)
        .apply(&text, args)
        .with_context(|| format!("Failed to compile {}", input.display()))
}

/// The effective settings as TOML
pub fn config_command(settings: &Settings) -> Result<String> {
    settings
        .to_toml_string()
        .context("Failed to serialize settings")
}

/// Load settings from a config file or use defaults
///
/// Program paths the file leaves out are not filled here; see
/// [`apply_overrides`].
pub fn load_settings(config_path: Option<&Path>) -> Result<Settings> {
    match config_path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            read_settings(path)
        }
        None => {
            for candidate in CONFIG_CANDIDATES {
                let path = Path::new(candidate);
                if path.exists() {
                    return read_settings(path);
                }
            }
            Ok(Settings::default())
        }
    }
}

fn read_settings(path: &Path) -> Result<Settings> {
    debug!("Loading config: {}", path.display());
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    Settings::from_toml_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.display()))
}

/// Apply command-line program paths, then look up whatever is still missing
pub fn apply_overrides(settings: Settings, overrides: &ProgramPaths) -> Settings {
    let programs = settings.programs.merged_with(overrides);
    Settings {
        programs,
        ..settings
    }
    .with_detected_programs()
}

// Relative destinations from the command line land in the working directory
fn with_cwd_output_root(mut settings: Settings) -> Settings {
    settings
        .output_path
        .get_or_insert_with(|| PathBuf::from("."));
    settings
}

fn parse_var(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got `{}`", s)),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();
}
