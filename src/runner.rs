//! Applying a rule set to a list of Java files.
//!
//! Every file is read, parsed, rewritten and, when a rule changed it and
//! this is not a dry run, written back in place. A file that cannot be read
//! or parsed is recorded in the report and skipped; a file that cannot be
//! written stops the run.

use std::fmt::Write as _;
use std::fs;
use std::io::{self, Write};

use serde::Serialize;
use tugstyle_cst::visitor::Rule;
use tugstyle_checks::rewrite_source;

use crate::error::TugstyleError;
use crate::files::SourceFile;

/// Options for a run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Compute fixes without writing them.
    pub dry_run: bool,
}

/// A file that at least one rule changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixedFile {
    pub path: String,
    /// Names of the rules that changed the file, sorted.
    pub rules: Vec<String>,
}

/// A file that was skipped because it could not be read or parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub path: String,
    pub message: String,
}

/// Summary of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FixReport {
    pub files_scanned: usize,
    pub fixed: Vec<FixedFile>,
    pub skipped: Vec<SkippedFile>,
    pub dry_run: bool,
}

impl FixReport {
    /// Plain text rendering: each fixed file followed by its rules, indented.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for file in &self.fixed {
            let _ = writeln!(out, "{}", file.path);
            for rule in &file.rules {
                let _ = writeln!(out, "  {rule}");
            }
        }
        for file in &self.skipped {
            let _ = writeln!(out, "skipped {}: {}", file.path, file.message);
        }
        out
    }
}

/// Emit a response as pretty-printed JSON to a writer.
pub fn emit_response<T: Serialize>(response: &T, writer: &mut impl Write) -> io::Result<()> {
    let json = serde_json::to_string_pretty(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}

/// Runs `rules` over `files` in order.
pub fn run(
    files: &[SourceFile],
    rules: &[Box<dyn Rule>],
    options: RunOptions,
) -> Result<FixReport, TugstyleError> {
    let mut report = FixReport {
        dry_run: options.dry_run,
        ..FixReport::default()
    };

    for file in files {
        report.files_scanned += 1;
        let _span = tracing::debug_span!("fix_file", path = %file.relative).entered();

        let source = match fs::read_to_string(&file.path) {
            Ok(source) => source,
            Err(e) => {
                tracing::warn!(path = %file.relative, error = %e, "cannot read file");
                report.skipped.push(SkippedFile {
                    path: file.relative.clone(),
                    message: e.to_string(),
                });
                continue;
            }
        };

        let (fixed, changed) = match rewrite_source(&source, rules) {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(path = %file.relative, error = %e, "cannot parse file");
                report.skipped.push(SkippedFile {
                    path: file.relative.clone(),
                    message: e.to_string(),
                });
                continue;
            }
        };

        if changed.is_empty() {
            continue;
        }

        if !options.dry_run {
            fs::write(&file.path, &fixed).map_err(|source| TugstyleError::ApplyError {
                path: file.relative.clone(),
                source,
            })?;
        }
        tracing::info!(path = %file.relative, rules = changed.len(), "fixed file");
        report.fixed.push(FixedFile {
            path: file.relative.clone(),
            rules: changed.into_iter().collect(),
        });
    }

    Ok(report)
}
