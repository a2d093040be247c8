//! Collapsing of runs of blank lines.
//!
//! Earlier passes leave gaps where they removed or moved code.

use crate::source::{is_blank, SourceDocument};

/// Remove every blank line that directly follows another blank line. Returns
/// the number of lines removed.
pub fn collapse_blank_lines(document: &mut SourceDocument) -> usize {
    let before = document.len();
    document
        .lines_mut()
        .dedup_by(|line, previous| is_blank(line) && is_blank(previous));
    before - document.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_become_single_separators() {
        let mut document = SourceDocument::from_text("a\n\n  \n\t\nb\n\nc\n\n\n");
        assert_eq!(collapse_blank_lines(&mut document), 3);
        assert_eq!(document.lines(), ["a", "", "b", "", "c", ""]);
    }

    #[test]
    fn leading_blank_lines() {
        let mut document = SourceDocument::from_text("\n\nfn f() {}\n");
        collapse_blank_lines(&mut document);
        assert_eq!(document.lines(), ["", "fn f() {}"]);
    }
}
