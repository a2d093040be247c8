//! The translation pipeline.
//!
//! A document passes through the following stages, in order:
//!
//! 1. [pattern rewriting](rewrite), over the whole text
//! 2. [test stripping](strip_tests)
//! 3. [return type rewriting](return_type)
//! 4. [id allocator injection](id_allocator)
//! 5. [declaration hoisting](hoist)
//! 6. [blank line collapsing](blank_lines)
//! 7. [import normalization](imports)
//!
//! Rewrite rules that fail are collected and reported alongside the output,
//! leaving it to the caller to decide whether a partial translation is
//! acceptable. Stages that fail to find the end of a block stop the pipeline.

use std::fmt;

use codespan_reporting::diagnostic::Diagnostic;
use itertools::Itertools;

use crate::files::FileId;
use crate::lexer;
use crate::scope::ScopeUnterminated;
use crate::source::SourceDocument;

pub mod blank_lines;
pub mod hoist;
pub mod id_allocator;
pub mod imports;
pub mod return_type;
pub mod rewrite;


pub use self::hoist::HoistScope;
pub use self::rewrite::{RuleFailure, RuleFailureKind, RuleSet};

/// First line of a translation that some rules could not be applied to.
pub const PARTIAL_HEADER: &str = "// move2rust: partial translation, rules not applied:";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Stage {
    Rewrite,
    StripTests,
    ReturnTypes,
    IdAllocator,
    Hoist,
    BlankLines,
    Imports,
}

impl Stage {
    pub fn name(self) -> &'static str {
        match self {
            Stage::Rewrite => "pattern rewriting",
            Stage::StripTests => "test stripping",
            Stage::ReturnTypes => "return type rewriting",
            Stage::IdAllocator => "id allocator injection",
            Stage::Hoist => "declaration hoisting",
            Stage::BlankLines => "blank line collapsing",
            Stage::Imports => "import normalization",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Options {
    pub hoist_scope: HoistScope,
}

/// A stage that could not complete.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{stage} failed: {source}")]
pub struct StageError {
    pub stage: Stage,
    pub source: ScopeUnterminated,
    /// The document as it was handed to the failing stage.
    pub snapshot: SourceDocument,
}

impl StageError {
    /// The diagnostic for this error, labelled against `file_id`, which should
    /// hold the text of [`StageError::snapshot`].
    pub fn to_diagnostic(&self, file_id: FileId) -> Diagnostic<FileId> {
        self.source
            .to_diagnostic(file_id, &self.snapshot)
            .with_message(self.to_string())
    }
}

/// The output of the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Translation {
    text: String,
    failures: Vec<RuleFailure>,
}

impl Translation {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn failures(&self) -> &[RuleFailure] {
        &self.failures
    }

    /// Returns true if any rewrite rules could not be applied.
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }

    /// The translated text, preceded by a [`PARTIAL_HEADER`] line naming the
    /// failed rules if there were any.
    pub fn into_text(self) -> String {
        if self.failures.is_empty() {
            return self.text;
        }
        let rules = self.failures.iter().map(|failure| failure.rule).join(", ");
        format!("{PARTIAL_HEADER} {rules}\n{}", self.text)
    }
}

pub struct Pipeline<'rules> {
    rules: &'rules RuleSet,
    options: Options,
}

impl Pipeline<'static> {
    pub fn new(options: &Options) -> Pipeline<'static> {
        Pipeline::with_rules(RuleSet::standard(), options)
    }
}

impl<'rules> Pipeline<'rules> {
    pub fn with_rules(rules: &'rules RuleSet, options: &Options) -> Pipeline<'rules> {
        Pipeline {
            rules,
            options: *options,
        }
    }

    pub fn translate(&self, source: &str) -> Result<Translation, StageError> {
        // Rules anchored on line ends expect `\n` terminators.
        let source = SourceDocument::from_text(source).to_text();
        let rewritten = self.rules.apply(&source);
        log::debug!(
            "{}: {} rules could not be applied",
            Stage::Rewrite,
            rewritten.failures.len(),
        );

        let mut document = SourceDocument::from_text(&rewritten.text);

        run_stage(Stage::StripTests, &mut document, strip_tests::strip_tests)?;
        run_stage(Stage::ReturnTypes, &mut document, |document| {
            Ok(return_type::rewrite_return_types(document))
        })?;
        run_stage(Stage::IdAllocator, &mut document, |document| {
            Ok(id_allocator::inject_id_allocator(document))
        })?;
        run_stage(Stage::Hoist, &mut document, |document| {
            hoist::hoist_declarations(document, self.options.hoist_scope)
        })?;
        run_stage(Stage::BlankLines, &mut document, |document| {
            Ok(blank_lines::collapse_blank_lines(document))
        })?;
        run_stage(Stage::Imports, &mut document, |document| {
            Ok(imports::normalize_imports(document))
        })?;

        Ok(Translation {
            text: document.to_text(),
            failures: rewritten.failures,
        })
    }
}

/// Run a single stage over the document. Stages leave the document unchanged
/// when they fail.
fn run_stage(
    stage: Stage,
    document: &mut SourceDocument,
    pass: impl FnOnce(&mut SourceDocument) -> Result<usize, ScopeUnterminated>,
) -> Result<(), StageError> {
    let before = lexer::brace_balance(&document.to_text());

    match pass(document) {
        Ok(changes) => {
            log::debug!("{stage}: {changes} changes");
            let after = lexer::brace_balance(&document.to_text());
            if before != after {
                log::warn!("{stage} changed the brace balance from {before} to {after}");
            }
            Ok(())
        }
        Err(source) => Err(StageError {
            stage,
            source,
            snapshot: document.clone(),
        }),
    }
}

/// Translate `source` with the standard rewrite rules.
pub fn translate(source: &str, options: &Options) -> Result<Translation, StageError> {
    Pipeline::new(options).translate(source)
}
