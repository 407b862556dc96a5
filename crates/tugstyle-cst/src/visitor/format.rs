// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Whitespace for nodes that a rule inserts or moves.
//!
//! The formatter samples the file once: the indentation unit is the most
//! common positive step between the indentation of consecutive code lines, and
//! the line break is `\r\n` if the file uses it anywhere. Indentation of an
//! existing construct is read off the cursor path: the nearest node, starting
//! from the given frame, whose prefix contains a line break.

use std::collections::BTreeMap;

use super::cursor::Cursor;
use crate::nodes::Space;

const DEFAULT_INDENT: &str = "    ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatter {
    indent_unit: String,
    line_break: &'static str,
}

impl Default for Formatter {
    fn default() -> Self {
        Self {
            indent_unit: DEFAULT_INDENT.to_string(),
            line_break: "\n",
        }
    }
}

impl Formatter {
    pub fn new(indent_unit: impl Into<String>, line_break: &'static str) -> Self {
        Self {
            indent_unit: indent_unit.into(),
            line_break,
        }
    }

    /// Samples indentation style and line breaks from source text.
    pub fn detect(source: &str) -> Self {
        let line_break = if source.contains("\r\n") { "\r\n" } else { "\n" };

        let mut steps: BTreeMap<usize, usize> = BTreeMap::new();
        let mut tab_lines = 0usize;
        let mut space_lines = 0usize;
        let mut previous = 0usize;
        for line in source.lines() {
            let code = line.trim_start_matches([' ', '\t']);
            // Blank lines and javadoc continuation lines say nothing about
            // the indentation step.
            if code.is_empty() || code.starts_with('*') {
                continue;
            }
            let indent = &line[..line.len() - code.len()];
            if indent.starts_with('\t') {
                tab_lines += 1;
            } else if !indent.is_empty() {
                space_lines += 1;
            }
            let width = indent.len();
            if width > previous {
                *steps.entry(width - previous).or_default() += 1;
            }
            previous = width;
        }

        if tab_lines > space_lines {
            return Self::new("\t", line_break);
        }
        // Ties go to the smaller step.
        let unit = steps
            .iter()
            .fold(None, |best: Option<(usize, usize)>, (&step, &count)| match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((step, count)),
            })
            .map(|(step, _)| " ".repeat(step))
            .unwrap_or_else(|| DEFAULT_INDENT.to_string());
        Self::new(unit, line_break)
    }

    pub fn indent_unit(&self) -> &str {
        &self.indent_unit
    }

    pub fn line_break(&self) -> &str {
        self.line_break
    }

    /// Indentation of the line on which the node at `cursor` starts.
    pub fn line_indent(&self, cursor: &Cursor<'_>) -> String {
        cursor
            .path()
            .find_map(|frame| frame.tree().prefix().and_then(Space::indent))
            .unwrap_or_default()
            .to_string()
    }

    /// `indent` plus one indentation unit.
    pub fn deeper(&self, indent: &str) -> String {
        format!("{indent}{}", self.indent_unit)
    }

    /// A line break followed by `indent`.
    pub fn newline(&self, indent: &str) -> Space {
        Space::from(format!("{}{indent}", self.line_break))
    }

    /// `prefix` moved onto its own line at `indent`. Comments in `prefix` are
    /// kept; only the whitespace after its last line break is replaced.
    pub fn reindent(&self, prefix: &Space, indent: &str) -> Space {
        let text = prefix.as_str();
        match text.rfind('\n') {
            Some(pos) => {
                let line = &text[pos + 1..];
                let rest = line.trim_start_matches([' ', '\t']);
                Space::from(format!("{}{indent}{rest}", &text[..=pos]))
            }
            None => {
                let rest = text.trim_start_matches([' ', '\t']);
                Space::from(format!("{}{indent}{rest}", self.line_break))
            }
        }
    }
}
