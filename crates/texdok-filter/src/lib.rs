//! Template engine filters for texdok
//!
//! This crate exposes the texdok document compiler as a named filter of a
//! host template engine. A template renders LaTeX text, the filter runs the
//! toolchain on it, and the host receives either the finished document or
//! nothing when the document was written to a file.
//!
//! # Example
//!
//! ```ignore
//! use tera::Tera;
//! use texdok_core::Settings;
//!
//! let mut tera = Tera::default();
//! texdok_filter::register_all(&mut tera, &Settings::default().with_detected_programs());
//!
//! tera.add_raw_template("letter.tex", r#"
//! {% filter latex(output="letter.pdf") %}
//! \documentclass{letter}
//! \begin{document}Dear {{ name | latex_encode }},\end{document}
//! {% endfilter %}
//! "#)?;
//! ```

mod escape;
mod tera_host;

use texdok_core::{Compiler, FilterConfig, Result, Settings};

pub use escape::latex_encode;
pub use tera_host::TeraDocumentFilter;

/// Name the document filter is registered under unless told otherwise
pub const DEFAULT_FILTER_NAME: &str = "latex";

/// Name of the LaTeX escaping companion filter
pub const ENCODE_FILTER_NAME: &str = "latex_encode";

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// A template engine that can receive texdok filters
pub trait FilterHost {
    /// Register the document filter under `name`
    fn register_document_filter(&mut self, name: &str, filter: DocumentFilter);

    /// Register the LaTeX escaping filter under `name`
    fn register_encode_filter(&mut self, name: &str);
}

/// Arguments of a single filter call, as the host passed them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterArgs {
    /// Positional arguments; the first one is a destination file name
    pub positional: Vec<String>,
    /// Named arguments
    pub named: FilterConfig,
}

impl FilterArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call with named arguments only
    pub fn named(named: FilterConfig) -> Self {
        Self {
            positional: Vec::new(),
            named,
        }
    }

    /// Legacy call syntax: `latex("report.pdf")`
    pub fn destination(output: impl Into<String>) -> Self {
        Self {
            positional: vec![output.into()],
            named: FilterConfig::default(),
        }
    }

    /// The call-time overrides these arguments describe
    ///
    /// A positional destination is used only when no named `output` is
    /// given.
    pub fn into_overrides(self) -> FilterConfig {
        let mut overrides = self.named;
        let mut positional = self.positional.into_iter();
        if overrides.output.is_none() {
            overrides.output = positional.next();
        }
        let ignored: Vec<String> = positional.collect();
        if !ignored.is_empty() {
            log::debug!("Ignoring extra positional arguments: {:?}", ignored);
        }
        overrides
    }
}

/// The document filter bound to its registration-time defaults
#[derive(Debug, Clone)]
pub struct DocumentFilter {
    defaults: FilterConfig,
    compiler: Compiler,
}

impl DocumentFilter {
    pub fn new(defaults: FilterConfig, compiler: Compiler) -> Self {
        Self { defaults, compiler }
    }

    /// Filter bound to a snapshot of `settings`
    pub fn from_settings(settings: &Settings) -> Self {
        let mut compiler = Compiler::new();
        if let Some(root) = &settings.output_path {
            compiler = compiler.with_output_root(root);
        }
        Self::new(settings.filter_defaults(), compiler)
    }

    /// Same filter with `overrides` applied on top of its defaults
    pub fn with_defaults(mut self, overrides: &FilterConfig) -> Self {
        self.defaults = self.defaults.merged_with(overrides);
        self
    }

    /// Defaults captured when the filter was registered
    pub fn defaults(&self) -> &FilterConfig {
        &self.defaults
    }

    pub fn compiler(&self) -> &Compiler {
        &self.compiler
    }

    /// Merge the call's arguments over the defaults and compile `text`
    ///
    /// Returns the document bytes, or an empty vector when the document was
    /// written to a destination.
    pub fn apply(&self, text: &[u8], args: FilterArgs) -> Result<Vec<u8>> {
        let config = self.defaults.merged_with(&args.into_overrides());
        if config.is_debug() {
            log::debug!("latex filter called with {:?}", config);
        }
        self.compiler.compile(text, &config)
    }
}

/// Register the document filter with `host`
///
/// The filter captures a snapshot of `settings` (program paths, default
/// format, output root, debug flag) overlaid with `defaults`. Later changes
/// to `settings` do not reach filters that are already registered.
pub fn register<H: FilterHost + ?Sized>(
    host: &mut H,
    settings: &Settings,
    name: Option<&str>,
    defaults: Option<&FilterConfig>,
) {
    let name = name.unwrap_or(DEFAULT_FILTER_NAME);
    let mut filter = DocumentFilter::from_settings(settings);
    if let Some(defaults) = defaults {
        filter = filter.with_defaults(defaults);
    }

    log::debug!("Registering document filter '{}'", name);
    host.register_document_filter(name, filter);
}

/// Register `latex` and `latex_encode` under their default names
pub fn register_all<H: FilterHost + ?Sized>(host: &mut H, settings: &Settings) {
    register(host, settings, None, None);
    host.register_encode_filter(ENCODE_FILTER_NAME);
}
