//! Error excerpts from TeX log files
//!
//! TeX reports an error as a line starting with `!`, followed some lines
//! later by a `l.<number>` line that locates it in the source. The excerpt
//! keeps each `!` line and the first location line after it, and nothing
//! else.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Extract error records from a TeX log
pub fn extract_errors<R: BufRead>(log: R) -> String {
    let mut excerpt = String::new();
    let mut in_error = false;

    for line in log.split(b'\n') {
        let Ok(raw) = line else { break };
        let text = String::from_utf8_lossy(&raw);
        let line = text.strip_suffix('\r').unwrap_or(&text);

        if line.starts_with('!') {
            in_error = true;
            excerpt.push_str(line);
            excerpt.push('\n');
        } else if in_error && is_line_designator(line) {
            in_error = false;
            excerpt.push_str(line);
            excerpt.push('\n');
        }
    }

    excerpt
}

/// Excerpt of the log file at `path`, or a note that it could not be read
pub fn read_log_errors(path: &Path) -> String {
    match File::open(path) {
        Ok(file) => extract_errors(BufReader::new(file)),
        Err(e) => {
            log::debug!("Cannot open {}: {}", path.display(), e);
            let name = path.file_name().unwrap_or(path.as_os_str());
            format!("failed to open {} for input", Path::new(name).display())
        }
    }
}

fn is_line_designator(line: &str) -> bool {
    line.strip_prefix("l.")
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| c.is_ascii_digit())
}
