//! Locating brace-delimited blocks in a source document.
//!
//! Passes that remove or relocate whole blocks (test functions, nested
//! declarations) need to know where a block ends. [`Delimiters`] records the
//! structural delimiters of every line, as reported by the [lexer], and
//! answers those questions by depth counting.
//!
//! [lexer]: crate::lexer

use codespan_reporting::diagnostic::{Diagnostic, Label};
use std::ops::RangeInclusive;

use crate::files::FileId;
use crate::lexer::{self, Delimiter};
use crate::source::SourceDocument;

/// A range of lines, inclusive of both ends.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ScopeSpan {
    pub start: usize,
    pub end: usize,
}

impl ScopeSpan {
    /// The index of the line immediately after the span.
    pub fn next_line(&self) -> usize {
        self.end + 1
    }

    pub fn len(&self) -> usize {
        self.end + 1 - self.start
    }

    pub fn lines(&self) -> RangeInclusive<usize> {
        self.start..=self.end
    }
}

/// The end of the document was reached before a block was closed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unterminated block starting on line {}", .line + 1)]
pub struct ScopeUnterminated {
    /// The line at which scanning began.
    pub line: usize,
}

impl ScopeUnterminated {
    pub fn to_diagnostic(&self, file_id: FileId, document: &SourceDocument) -> Diagnostic<FileId> {
        let labels = document
            .line_range(self.line)
            .map(|range| Label::primary(file_id, range).with_message("block starts here"))
            .into_iter()
            .collect();

        Diagnostic::error()
            .with_message(self.to_string())
            .with_labels(labels)
            .with_notes(vec!["no matching `}` before the end of the document".to_owned()])
    }
}

/// The delimiters found on each line of a document.
pub struct Delimiters {
    lines: Vec<Vec<Delimiter>>,
}

impl Delimiters {
    pub fn new(document: &SourceDocument) -> Delimiters {
        let line_starts = document.line_starts();
        let mut lines = vec![Vec::new(); document.len()];

        for (offset, delimiter) in lexer::delimiters(&document.to_text()) {
            let line = line_starts.partition_point(|start| *start <= offset) - 1;
            lines[line].push(delimiter);
        }

        Delimiters { lines }
    }

    pub fn line(&self, index: usize) -> &[Delimiter] {
        self.lines.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Openers minus closers on a line.
    pub fn net(&self, index: usize) -> i64 {
        self.line(index).iter().fold(0, |net, delimiter| match delimiter {
            Delimiter::Open => net + 1,
            Delimiter::Close => net - 1,
            Delimiter::Semicolon => net,
        })
    }

    /// The first `{` or `;` at or after `start`, with the line it was found
    /// on. Closers are skipped.
    pub fn first_structural(&self, start: usize) -> Option<(usize, Delimiter)> {
        self.lines.iter().enumerate().skip(start).find_map(|(index, line)| {
            line.iter()
                .find(|delimiter| **delimiter != Delimiter::Close)
                .map(|delimiter| (index, *delimiter))
        })
    }

    /// Find the block that follows `start`.
    ///
    /// Scanning advances to the first line containing a `{`, then counts
    /// depth from that opener until it returns to zero. The returned span runs
    /// from `start` to the line holding the matching `}`.
    pub fn scope_span(&self, start: usize) -> Result<ScopeSpan, ScopeUnterminated> {
        let mut depth: i64 = 0;
        let mut opened = false;

        for (index, line) in self.lines.iter().enumerate().skip(start) {
            for delimiter in line {
                match delimiter {
                    Delimiter::Open => {
                        depth += 1;
                        opened = true;
                    }
                    Delimiter::Close if opened => {
                        depth -= 1;
                        if depth == 0 {
                            return Ok(ScopeSpan { start, end: index });
                        }
                    }
                    Delimiter::Close | Delimiter::Semicolon => {}
                }
            }
        }

        Err(ScopeUnterminated { line: start })
    }

    /// Find the extent of the item that follows `start`: either up to the
    /// first `;`, or the block that opens before any `;` is seen.
    pub fn item_span(&self, start: usize) -> Result<ScopeSpan, ScopeUnterminated> {
        match self.first_structural(start) {
            Some((end, Delimiter::Semicolon)) => Ok(ScopeSpan { start, end }),
            Some((_, _)) => self.scope_span(start),
            None => Err(ScopeUnterminated { line: start }),
        }
    }
}
