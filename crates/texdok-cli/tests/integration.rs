//! Integration tests for the texdok CLI commands
//!
//! The toolchain programs are shell scripts: pdflatex copies its input to
//! the PDF, latex prefixes it with `DVI:`.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use serial_test::serial;
use tempfile::TempDir;
use texdok_cli::{compile_command, config_command, render_command};
use texdok_core::{ProgramPaths, Settings};

fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

struct Workspace {
    bin: TempDir,
    docs: TempDir,
    out: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            bin: tempfile::tempdir().unwrap(),
            docs: tempfile::tempdir().unwrap(),
            out: tempfile::tempdir().unwrap(),
        }
    }

    fn settings(&self, pdflatex: &str) -> Settings {
        Settings {
            format: None,
            output_path: Some(self.out.path().to_path_buf()),
            debug: false,
            programs: ProgramPaths {
                pdflatex: Some(script(self.bin.path(), "pdflatex", pdflatex)),
                latex: Some(script(
                    self.bin.path(),
                    "latex",
                    "printf 'DVI:' > tt2latex.dvi\ncat tt2latex.tex >> tt2latex.dvi",
                )),
                dvips: None,
            },
        }
    }

    fn doc(&self, name: &str, content: &str) -> PathBuf {
        let path = self.docs.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }
}

const COPY: &str = "cp tt2latex.tex tt2latex.pdf";

#[test]
#[serial]
fn test_compile_to_stdout_bytes() {
    let ws = Workspace::new();
    let input = ws.doc("report.tex", "\\documentclass{article}");

    let bytes = compile_command(&input, None, Some("pdf"), &ws.settings(COPY)).unwrap();
    assert_eq!(bytes, b"\\documentclass{article}");
}

#[test]
#[serial]
fn test_compile_to_destination() {
    let ws = Workspace::new();
    let input = ws.doc("report.tex", "body");

    let bytes = compile_command(&input, Some("reports/q3.pdf"), None, &ws.settings(COPY)).unwrap();
    assert!(bytes.is_empty());
    assert_eq!(fs::read(ws.out.path().join("reports/q3.pdf")).unwrap(), b"body");
}

#[test]
#[serial]
fn test_compile_bare_keyword_selects_format() {
    let ws = Workspace::new();
    let input = ws.doc("report.tex", "body");

    let bytes = compile_command(&input, Some("dvi"), None, &ws.settings(COPY)).unwrap();
    assert_eq!(bytes, b"DVI:body");
    assert_eq!(fs::read_dir(ws.out.path()).unwrap().count(), 0);
}

#[test]
#[serial]
fn test_compile_reports_toolchain_errors() {
    let ws = Workspace::new();
    let input = ws.doc("broken.tex", "\\oops");
    let failing = "printf '! Undefined control sequence.\\nl.1 \\\\oops\\n' > tt2latex.log\nexit 1";

    let err = compile_command(&input, None, Some("pdf"), &ws.settings(failing)).unwrap_err();
    let message = format!("{:#}", err);
    assert!(message.contains("Failed to compile"));
    assert!(message.contains("pdflatex errors:"));
    assert!(message.contains("! Undefined control sequence."));
    assert!(message.contains("l.1 \\oops"));
}

#[test]
#[serial]
fn test_compile_missing_input() {
    let ws = Workspace::new();
    let err = compile_command(
        &ws.docs.path().join("absent.tex"),
        None,
        Some("pdf"),
        &ws.settings(COPY),
    )
    .unwrap_err();
    assert!(err.to_string().contains("Failed to read input"));
}

#[test]
#[serial]
fn test_render_with_vars_writes_document() {
    let ws = Workspace::new();
    let template = ws.doc(
        "letter.tex.tera",
        "Sent to {{ name }}.{% filter latex(output=\"letters/letter.pdf\") %}Dear {{ name | latex_encode }},{% endfilter %}",
    );
    let vars = vec![("name".to_string(), "Smith & Sons".to_string())];

    let rendered = render_command(&template, &vars, &ws.settings(COPY)).unwrap();
    assert_eq!(rendered, "Sent to Smith & Sons.");
    assert_eq!(
        fs::read_to_string(ws.out.path().join("letters/letter.pdf")).unwrap(),
        "Dear Smith \\& Sons,"
    );
}

#[test]
#[serial]
fn test_render_surfaces_filter_errors() {
    let ws = Workspace::new();
    let template = ws.doc("bad.tera", "{{ \"x\" | latex(format=\"docx\") }}");

    let err = render_command(&template, &[], &ws.settings(COPY)).unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to render template"));
}

#[test]
fn test_config_lists_programs() {
    let settings = Settings {
        format: Some("ps".to_string()),
        programs: ProgramPaths {
            dvips: Some(PathBuf::from("/opt/tex/dvips")),
            ..Default::default()
        },
        ..Default::default()
    };

    let text = config_command(&settings).unwrap();
    assert!(text.contains("format = \"ps\""));
    assert!(text.contains("[programs]"));
    assert!(text.contains("dvips = \"/opt/tex/dvips\""));
}
