//! Normalization of framework imports.
//!
//! Imports of the Sui framework are replaced by imports of the matching
//! modules in the target crate's `sui_std` module, and gathered at the top of
//! the document. Other imports are left where they are.

use itertools::Itertools;

use crate::source::{is_blank, SourceDocument};

/// Import lines mentioning `symbol` are replaced with `imports`.
#[derive(Debug)]
pub struct ImportMapping {
    pub symbol: &'static str,
    pub imports: &'static [&'static str],
}

pub const IMPORT_MAPPINGS: &[ImportMapping] = &[
    ImportMapping {
        symbol: "sui::transfer",
        imports: &["use crate::sui_std::transfer::transfer;"],
    },
    ImportMapping {
        symbol: "sui::table",
        imports: &[
            "use crate::sui_std::table::table;",
            "use crate::sui_std::table::table::Table;",
        ],
    },
    ImportMapping {
        symbol: "sui::balance",
        imports: &[
            "use crate::sui_std::balance::balance;",
            "use crate::sui_std::balance::balance::Balance;",
        ],
    },
    ImportMapping {
        symbol: "sui::coin",
        imports: &[
            "use crate::sui_std::coin::coin;",
            "use crate::sui_std::coin::coin::Coin;",
        ],
    },
    ImportMapping {
        symbol: "sui::sui::SUI",
        imports: &["use crate::sui_std::sui::SUI;"],
    },
];

/// The imports that replace `line`, if it is an import of a mapped symbol.
/// The first matching mapping wins.
pub fn canonical_imports(line: &str) -> Option<&'static [&'static str]> {
    if !line.trim_start().starts_with("use ") {
        return None;
    }
    IMPORT_MAPPINGS
        .iter()
        .find(|mapping| line.contains(mapping.symbol))
        .map(|mapping| mapping.imports)
}

/// Replace mapped imports and move them to the top of the document. Returns
/// the number of import lines replaced.
pub fn normalize_imports(document: &mut SourceDocument) -> usize {
    let mut canonical = Vec::new();
    let mut rest = Vec::with_capacity(document.len());
    let mut replaced = 0;

    for line in document.lines() {
        match canonical_imports(line) {
            Some(imports) => {
                log::trace!("replacing `{}`", line.trim());
                canonical.extend_from_slice(imports);
                replaced += 1;
            }
            None => rest.push(line.clone()),
        }
    }

    if replaced == 0 {
        return 0;
    }

    let mut lines: Vec<String> = canonical.into_iter().unique().map(str::to_owned).collect();
    if !rest.first().is_some_and(|line| is_blank(line)) {
        lines.push(String::new());
    }
    lines.extend(rest);

    document.replace_lines(lines);
    replaced
}
