//! Bounded line reading for the cheap prefix scans
//!
//! The format validator and field census only ever look at the first few
//! non-blank lines of a file.

use std::io::{self, BufRead};

/// One non-blank line from the start of a file
#[derive(Debug)]
pub(super) enum PrefixLine {
    /// Trimmed text with its 1-based physical line number
    Text { line: usize, text: String },

    /// A line whose bytes are not valid UTF-8
    Undecodable { line: usize },
}

/// Iterator over non-blank lines; ends on end of input or the first read error
pub(super) struct NonBlankLines<R> {
    reader: R,
    line: usize,
    buf: Vec<u8>,
    error: Option<io::Error>,
    finished: bool,
}

impl<R: BufRead> NonBlankLines<R> {
    pub(super) fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            buf: Vec::new(),
            error: None,
            finished: false,
        }
    }

    /// Read error that ended the iteration, if any
    pub(super) fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }
}

impl<R: BufRead> Iterator for NonBlankLines<R> {
    type Item = PrefixLine;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.finished {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => self.finished = true,
                Ok(_) => {
                    self.line += 1;
                    match std::str::from_utf8(&self.buf) {
                        Ok(text) if text.trim().is_empty() => continue,
                        Ok(text) => {
                            return Some(PrefixLine::Text {
                                line: self.line,
                                text: text.trim().to_string(),
                            });
                        }
                        Err(_) => return Some(PrefixLine::Undecodable { line: self.line }),
                    }
                }
                Err(e) => {
                    self.finished = true;
                    self.error = Some(e);
                }
            }
        }
        None
    }
}
