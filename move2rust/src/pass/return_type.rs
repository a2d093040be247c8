//! Conversion of `): T` return type annotations into `) -> T`.
//!
//! The `return-arrow` rewrite rule only handles single identifier types on the
//! same line as the body. This pass covers the rest: generic and tuple return
//! types, and signatures split over several lines.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::lexer::Delimiter;
use crate::scope::Delimiters;
use crate::source::SourceDocument;

static FN_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?:pub(?:\s*\([^)]*\))?\s+)?(?:(?:native|inline)\s+)*fn\s+[A-Za-z_][A-Za-z0-9_]*",
    )
    .unwrap()
});

static NO_PARAMS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bfn\s+[A-Za-z_][A-Za-z0-9_]*\s*(?:<[^()]*>)?\s*\(\s*\)").unwrap()
});

/// A closing parenthesis followed by a single colon.
static RETURN_COLON: Lazy<Regex> = Lazy::new(|| Regex::new(r"\)([ \t]*:)(?:[^:]|$)").unwrap());

/// Rewrite the return type annotation of a single line, if it has one.
fn rewrite_line(line: &str) -> Option<String> {
    let captures = RETURN_COLON.captures(line)?;
    let paren = captures.get(0)?.start();
    let colon = captures.get(1)?.end();

    Some(format!(
        "{} -> {}",
        &line[..=paren],
        line[colon..].trim_start(),
    ))
}

/// Returns the number of signatures rewritten.
pub fn rewrite_return_types(document: &mut SourceDocument) -> usize {
    let delimiters = Delimiters::new(document);
    let lines = document.lines_mut();
    let mut rewritten = 0;

    for header in 0..lines.len() {
        if !FN_HEADER.is_match(&lines[header]) || NO_PARAMS.is_match(&lines[header]) {
            continue;
        }

        // Signatures without a body end in `;` instead.
        let body = match delimiters.first_structural(header) {
            Some((body, Delimiter::Open)) => body,
            Some((_, Delimiter::Semicolon | Delimiter::Close)) | None => continue,
        };

        for index in (header..=body).rev() {
            if let Some(line) = rewrite_line(&lines[index]) {
                log::trace!("rewrote return type on line {}", index + 1);
                lines[index] = line;
                rewritten += 1;
                break;
            }
        }
    }

    rewritten
}
