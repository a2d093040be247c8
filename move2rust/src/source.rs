//! Types related to source documents.

use std::ops::Range;

/// A source document, held as an ordered sequence of lines.
///
/// Each translation pass takes the document, replaces its lines, and hands it
/// on to the next pass. Line terminators are not stored: [`to_text`] joins the
/// lines with `\n` and always ends a non-empty document with a newline.
///
/// [`to_text`]: SourceDocument::to_text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceDocument {
    lines: Vec<String>,
}

impl SourceDocument {
    pub fn from_text(text: &str) -> SourceDocument {
        SourceDocument {
            lines: text.lines().map(str::to_owned).collect(),
        }
    }

    pub fn from_lines(lines: Vec<String>) -> SourceDocument {
        SourceDocument { lines }
    }

    pub fn to_text(&self) -> String {
        let mut text = String::with_capacity(self.lines.iter().map(|line| line.len() + 1).sum());
        for line in &self.lines {
            text.push_str(line);
            text.push('\n');
        }
        text
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn lines_mut(&mut self) -> &mut Vec<String> {
        &mut self.lines
    }

    pub fn replace_lines(&mut self, lines: Vec<String>) {
        self.lines = lines;
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Byte offset of the start of each line in [`SourceDocument::to_text`].
    pub fn line_starts(&self) -> Vec<usize> {
        self.lines
            .iter()
            .scan(0, |offset, line| {
                let start = *offset;
                *offset += line.len() + 1;
                Some(start)
            })
            .collect()
    }

    /// The byte range of a line in [`SourceDocument::to_text`], excluding its
    /// newline.
    pub fn line_range(&self, line_index: usize) -> Option<Range<usize>> {
        let start = *self.line_starts().get(line_index)?;
        Some(start..start + self.lines[line_index].len())
    }
}

/// Returns true if the line holds nothing but whitespace.
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// The leading whitespace of a line.
pub fn indentation(line: &str) -> &str {
    &line[..line.len() - line.trim_start().len()]
}
