//! Hoisting of nested declarations.
//!
//! Rust does not allow struct or constant declarations inside an `impl`
//! block, and translated modules put everything inside one. Any `struct` or
//! `const` that starts on a line nested inside a block is moved out, together
//! with the doc comments and attributes directly above it.
//!
//! Each hoisted declaration is prepended to the set of declarations already
//! hoisted to the same place, so declarations end up in the reverse of the
//! order in which they were found.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::scope::{Delimiters, ScopeSpan, ScopeUnterminated};
use crate::source::{indentation, is_blank, SourceDocument};

/// Where hoisted declarations are placed.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum HoistScope {
    /// Directly before the top-level item that encloses the declaration.
    #[default]
    Item,
    /// At the start of the document.
    File,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum DeclarationKind {
    Struct,
    Const,
}

#[derive(Debug, Copy, Clone)]
struct Declaration {
    kind: DeclarationKind,
    span: ScopeSpan,
}

static DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:pub(?:\s*\([^)]*\))?\s+)?(struct|const)\s+[A-Za-z_]").unwrap()
});

fn declaration_kind(line: &str) -> Option<DeclarationKind> {
    let captures = DECLARATION.captures(line)?;
    match captures.get(1)?.as_str() {
        "struct" => Some(DeclarationKind::Struct),
        _ => Some(DeclarationKind::Const),
    }
}

/// Doc comments and attributes stay with the item that follows them.
fn is_attached(line: &str) -> bool {
    let line = line.trim_start();
    line.starts_with("///") || line.starts_with("#[")
}

fn is_preamble(line: &str) -> bool {
    let line = line.trim_start();
    line.starts_with("//") || line.starts_with("/*") || line.starts_with("#[")
}

/// Remove the leading whitespace shared by all non-blank lines.
fn dedent(lines: Vec<String>) -> Vec<String> {
    let width = (lines.iter())
        .filter(|line| !is_blank(line))
        .map(|line| indentation(line).len())
        .min()
        .unwrap_or(0);

    lines
        .into_iter()
        .map(|line| match line.get(width..) {
            _ if is_blank(&line) => String::new(),
            Some(rest) => rest.to_owned(),
            None => line.trim_start().to_owned(),
        })
        .collect()
}

/// Declarations hoisted to just before the line at `anchor`.
struct Hoisted {
    anchor: usize,
    lines: Vec<String>,
}

fn prepend(hoisted: &mut Vec<Hoisted>, anchor: usize, mut lines: Vec<String>) {
    lines.push(String::new());
    match hoisted.last_mut() {
        Some(last) if last.anchor == anchor => {
            lines.append(&mut last.lines);
            last.lines = lines;
        }
        _ => hoisted.push(Hoisted { anchor, lines }),
    }
}

/// Move nested declarations out of their enclosing blocks. Returns the number
/// of declarations moved.
pub fn hoist_declarations(
    document: &mut SourceDocument,
    scope: HoistScope,
) -> Result<usize, ScopeUnterminated> {
    let delimiters = Delimiters::new(document);
    let lines = document.lines();

    let mut body: Vec<String> = Vec::with_capacity(lines.len());
    let mut hoisted = Vec::new();
    let mut count = 0;

    let mut depth: i64 = 0;
    // Start of the current top-level item in `body`, including its comments
    // and attributes.
    let mut item_start = 0;
    let mut preamble = None;

    let mut index = 0;
    while index < lines.len() {
        let line = &lines[index];

        if depth > 0 {
            if let Some(kind) = declaration_kind(line) {
                let declaration = Declaration {
                    kind,
                    span: delimiters.item_span(index)?,
                };
                log::debug!(
                    "hoisting {:?} declaration on lines {}-{}",
                    declaration.kind,
                    declaration.span.start + 1,
                    declaration.span.end + 1,
                );

                let mut block = Vec::new();
                while body.len() > item_start
                    && body.last().is_some_and(|line| is_attached(line))
                {
                    block.extend(body.pop());
                }
                block.reverse();
                block.extend(lines[declaration.span.lines()].iter().cloned());

                let anchor = match scope {
                    HoistScope::Item => item_start,
                    HoistScope::File => 0,
                };
                prepend(&mut hoisted, anchor, dedent(block));
                count += 1;

                for span_index in declaration.span.lines() {
                    depth += delimiters.net(span_index);
                }
                depth = depth.max(0);
                index = declaration.span.next_line();
                continue;
            }
        } else if is_blank(line) {
            preamble = None;
        } else if is_preamble(line) {
            preamble.get_or_insert(body.len());
        } else {
            item_start = preamble.take().unwrap_or(body.len());
        }

        body.push(line.clone());
        depth = (depth + delimiters.net(index)).max(0);
        index += 1;
    }

    let mut output = Vec::with_capacity(lines.len() + count);
    let mut hoisted = hoisted.into_iter().peekable();
    for (index, line) in body.into_iter().enumerate() {
        while let Some(group) = hoisted.next_if(|group| group.anchor == index) {
            output.extend(group.lines);
        }
        output.push(line);
    }
    output.extend(hoisted.flat_map(|group| group.lines));

    document.replace_lines(output);
    Ok(count)
}
