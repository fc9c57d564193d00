//! Tera binding for the texdok filters
//!
//! Tera passes named arguments only, so the legacy positional destination
//! is spelled `output="name.pdf"` here. Tera renders to strings: a document
//! that is not valid UTF-8 has to go to a file through `output`.

use std::collections::HashMap;
use std::path::PathBuf;

use tera::{Filter, Result, Tera, Value};
use texdok_core::FilterConfig;

use crate::escape::latex_encode_filter;
use crate::{DocumentFilter, FilterArgs, FilterHost};

impl FilterHost for Tera {
    fn register_document_filter(&mut self, name: &str, filter: DocumentFilter) {
        self.register_filter(name, TeraDocumentFilter::new(filter));
    }

    fn register_encode_filter(&mut self, name: &str) {
        self.register_filter(name, latex_encode_filter);
    }
}

/// [`DocumentFilter`] as a Tera filter
#[derive(Debug, Clone)]
pub struct TeraDocumentFilter {
    inner: DocumentFilter,
}

impl TeraDocumentFilter {
    pub fn new(inner: DocumentFilter) -> Self {
        Self { inner }
    }
}

impl Filter for TeraDocumentFilter {
    fn filter(&self, value: &Value, args: &HashMap<String, Value>) -> Result<Value> {
        let text = value
            .as_str()
            .ok_or_else(|| tera::Error::msg("latex filter expects a string"))?;
        let overrides = parse_args(args)?;

        let bytes = self
            .inner
            .apply(text.as_bytes(), FilterArgs::named(overrides))
            .map_err(|e| tera::Error::chain("latex filter failed", e))?;

        String::from_utf8(bytes).map(Value::String).map_err(|_| {
            tera::Error::msg(
                "latex filter produced a binary document; pass `output` to write it to a file",
            )
        })
    }

    // The result is a typeset document, never HTML
    fn is_safe(&self) -> bool {
        true
    }
}

fn parse_args(args: &HashMap<String, Value>) -> Result<FilterConfig> {
    let mut config = FilterConfig::new();
    for (key, value) in args {
        match key.as_str() {
            "format" => config.format = Some(string_arg(key, value)?),
            "output" => config.output = Some(string_arg(key, value)?),
            "latex" => config.programs.latex = Some(PathBuf::from(string_arg(key, value)?)),
            "pdflatex" => config.programs.pdflatex = Some(PathBuf::from(string_arg(key, value)?)),
            "dvips" => config.programs.dvips = Some(PathBuf::from(string_arg(key, value)?)),
            "debug" => {
                config.debug = Some(value.as_bool().ok_or_else(|| {
                    tera::Error::msg("latex filter argument `debug` must be a boolean")
                })?)
            }
            other => {
                return Err(tera::Error::msg(format!(
                    "latex filter does not accept argument `{}`",
                    other
                )))
            }
        }
    }
    Ok(config)
}

fn string_arg(key: &str, value: &Value) -> Result<String> {
    value.as_str().map(str::to_string).ok_or_else(|| {
        tera::Error::msg(format!("latex filter argument `{}` must be a string", key))
    })
}
