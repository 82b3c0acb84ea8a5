//! Whole-file telemetry parsing
//!
//! Lines are read lazily and turned into a sequence of [`LineOutcome`]s,
//! which is then folded into a [`ParseResult`]. Structural problems on one
//! line never stop the rest of the file from being parsed.

use std::collections::BTreeSet;
use std::io::BufRead;

use super::catalog::FieldCatalog;
use super::line_parser::{ParsedLine, parse_line};
use super::stats::ParseResult;

/// What happened to one physical line of a file
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    /// The line was structurally valid; it may or may not carry a record
    Parsed { line: usize, parsed: ParsedLine },

    /// The line was rejected with a structural error
    Failed { line: usize, message: String },

    /// Reading the file failed; no further outcomes follow
    Aborted { message: String },
}

/// Lazy iterator over the outcomes of each non-blank line in a reader
///
/// Lines are numbered from 1 over all physical lines, blank ones included.
pub struct LineOutcomes<'a, R> {
    catalog: &'a FieldCatalog,
    reader: R,
    line: usize,
    buf: Vec<u8>,
    finished: bool,
}

impl<'a, R: BufRead> LineOutcomes<'a, R> {
    pub fn new(catalog: &'a FieldCatalog, reader: R) -> Self {
        Self {
            catalog,
            reader,
            line: 0,
            buf: Vec::new(),
            finished: false,
        }
    }
}

impl<R: BufRead> Iterator for LineOutcomes<'_, R> {
    type Item = LineOutcome;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.finished {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => self.finished = true,
                Ok(_) => {
                    self.line += 1;
                    let text = match std::str::from_utf8(&self.buf) {
                        Ok(text) => text.trim(),
                        Err(e) => {
                            return Some(LineOutcome::Failed {
                                line: self.line,
                                message: format!("Line {}: invalid UTF-8 text ({})", self.line, e),
                            });
                        }
                    };
                    if text.is_empty() {
                        continue;
                    }
                    return Some(match parse_line(self.catalog, text) {
                        Ok(parsed) => LineOutcome::Parsed {
                            line: self.line,
                            parsed,
                        },
                        Err(e) => LineOutcome::Failed {
                            line: self.line,
                            message: format!("Line {}: {}", self.line, e),
                        },
                    });
                }
                Err(e) => {
                    self.finished = true;
                    return Some(LineOutcome::Aborted {
                        message: format!("File error: {}", e),
                    });
                }
            }
        }
        None
    }
}

/// Fold line outcomes into records, diagnostics and unsupported labels
///
/// Record order follows line order. An aborted read discards the records and
/// unsupported labels gathered so far but keeps earlier line errors.
impl FromIterator<LineOutcome> for ParseResult {
    fn from_iter<I: IntoIterator<Item = LineOutcome>>(outcomes: I) -> Self {
        let mut records = Vec::new();
        let mut errors = Vec::new();
        let mut unsupported = BTreeSet::new();
        let mut lines_seen = 0;

        for outcome in outcomes {
            match outcome {
                LineOutcome::Parsed { parsed, .. } => {
                    lines_seen += 1;
                    records.extend(parsed.record);
                    unsupported.extend(parsed.unsupported);
                }
                LineOutcome::Failed { message, .. } => {
                    lines_seen += 1;
                    errors.push(message);
                }
                LineOutcome::Aborted { message } => {
                    errors.push(message);
                    return ParseResult {
                        records: Vec::new(),
                        errors,
                        unsupported_fields: Vec::new(),
                        lines_seen,
                    };
                }
            }
        }

        ParseResult {
            records,
            errors,
            unsupported_fields: unsupported.into_iter().collect(),
            lines_seen,
        }
    }
}

/// Parse every line of a reader
pub fn parse_reader<R: BufRead>(catalog: &FieldCatalog, reader: R) -> ParseResult {
    LineOutcomes::new(catalog, reader).collect()
}
