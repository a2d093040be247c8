//! Replacement of object construction with a local id allocator.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::source::SourceDocument;
use crate::support::ID_GETTER_PRELUDE;

static OBJECT_NEW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:sui::)?object::new\s*\([^()]*\)").unwrap());

const ID_GETTER_CALL: &str = "ID_GETTER.get_new_id()";

/// Rewrite every `object::new(..)` call to draw from `ID_GETTER`, and define
/// `ID_GETTER` at the top of the document unless it is already defined.
///
/// Returns the number of call sites rewritten.
pub fn inject_id_allocator(document: &mut SourceDocument) -> usize {
    let mut call_sites = 0;

    for line in document.lines_mut() {
        let count = OBJECT_NEW.find_iter(line).count();
        if count > 0 {
            *line = OBJECT_NEW.replace_all(line, ID_GETTER_CALL).into_owned();
            call_sites += count;
        }
    }

    let defined = document
        .lines()
        .iter()
        .any(|line| line.contains("static ID_GETTER"));

    if !defined {
        let lines = (ID_GETTER_PRELUDE.lines().map(str::to_owned))
            .chain([String::new()])
            .chain(document.lines().iter().cloned())
            .collect();
        document.replace_lines(lines);
    }

    call_sites
}
