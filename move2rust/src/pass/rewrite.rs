//! Pattern rewriting of Move syntax into Rust syntax.
//!
//! The rules in [`RULES`] are applied in order, each exactly once, across the
//! entire document. Later rules see the output of earlier ones, so the order
//! matters: `friend-visibility`, for example, matches the `pub` produced by
//! `visibility`.

use std::borrow::Cow;

use codespan_reporting::diagnostic::{Diagnostic, Severity};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::files::FileId;
use crate::lexer;

/// A named regular expression substitution.
///
/// Replacements may refer to capture groups with `${n}`.
#[derive(Debug)]
pub struct RewriteRule {
    pub name: &'static str,
    pub pattern: &'static str,
    pub replacement: &'static str,
}

macro_rules! rules {
    ($($name:literal: $pattern:literal => $replacement:literal,)*) => {
        &[$(RewriteRule {
            name: $name,
            pattern: $pattern,
            replacement: $replacement,
        },)*]
    };
}

#[rustfmt::skip]
pub const RULES: &[RewriteRule] = rules! {
    "module-skeleton":
        r"\bmodule\s+([A-Za-z0-9_]+)::([A-Za-z0-9_]+)\s*\{"
        => "pub struct ${1}__${2} {}\nimpl ${1}__${2} {",
    "module-label":
        r"(?m)^([ \t]*)module\s+([A-Za-z0-9_]+)::([A-Za-z0-9_]+)\s*;"
        => "${1}pub struct ${2}__${3} {}",
    "resource-struct":
        r"\bresource\s+struct\b"
        => "struct",
    "visibility":
        r"\bpublic\b"
        => "pub",
    "friend-visibility":
        r"\bpub\s*\(\s*(?:friend|package)\s*\)"
        => "pub(crate)",
    "entry-marker":
        r"\bentry\s+(fun\b)"
        => "${1}",
    "ability-clause":
        r"\bstruct\s+([A-Za-z0-9_]+)\s*(<[^{};]*?>)?\s+has\s+[^{};]*\{"
        => "struct ${1}${2} {",
    "ability-clause-unit":
        r"\bstruct\s+([A-Za-z0-9_]+)\s*(<[^{};]*?>)?\s+has\s+[^{};]*;"
        => "struct ${1}${2};",
    "function-keyword":
        r"\bfun\b"
        => "fn",
    "return-arrow":
        r"\)\s*:\s*([A-Za-z0-9_]+)\s*\{"
        => ") -> ${1} {",
    "option-is-some":
        r"\boption::is_some\(\s*&(?:mut\s+)?([^()]+?)\s*\)"
        => "${1}.is_some()",
    "option-is-none":
        r"\boption::is_none\(\s*&(?:mut\s+)?([^()]+?)\s*\)"
        => "${1}.is_none()",
    "option-fill":
        r"\boption::fill\(\s*&mut\s+([^(),]+?)\s*,\s*([^()]+?)\s*\)"
        => "${1} = Some(${2})",
    "option-extract":
        r"\boption::extract\(\s*&mut\s+([^()]+?)\s*\)"
        => "${1}.take().unwrap()",
    "option-none":
        r"\boption::none\s*(?:<[^<>()]*>)?\(\s*\)"
        => "None",
    "option-some":
        r"\boption::some\(([^()]*)\)"
        => "Some(${1})",
    "assert-abort-code":
        r"\bassert!\((.+),\s*([A-Za-z0-9_:]+)\s*\)\s*;"
        => r#"assert!(${1}, "{}", ${2});"#,
    "context-parameter-line":
        r"(?m)^[ \t]*[A-Za-z_][A-Za-z0-9_]*[ \t]*:[ \t]*&(?:mut[ \t]+)?(?:tx_context::)?TxContext\b[ \t]*,?[ \t]*\n"
        => "",
    "context-parameter":
        r"\b[A-Za-z_][A-Za-z0-9_]*\s*:\s*&(?:mut\s+)?(?:tx_context::)?TxContext\b\s*,?\s*"
        => "",
    "context-argument":
        r",\s*ctx\s*\)"
        => ")",
    "phantom-marker":
        r"\bphantom\s+"
        => "",
    "container-generics":
        r"\b(Balance|Supply|Receiving)\s*<[^<>]*>"
        => "${1}",
    "uid-type":
        r"\bUID\b"
        => "u8",
    "address-type":
        r"\baddress\b"
        => "String",
    "vector-empty":
        r"\bvector::empty\s*(?:<[^<>()]*>)?\(\s*\)"
        => "Vec::new()",
    "vector-type":
        r"\bvector\s*<"
        => "Vec<",
    "return-flatten":
        r"\breturn\s*\(\s*([^(),;]+?)\s*\)\s*;"
        => "return ${1};",
    "share-object":
        r"\b(?:sui::)?transfer::(?:public_)?share_object\s*\("
        => "transfer::share_object(",
    "tests-banner":
        r"(?m)^[ \t]*//[ \t]*=+[ \t]*Tests[ \t]*=+[ \t]*$"
        => "",
};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuleFailureKind {
    #[error("the pattern is invalid: {0}")]
    InvalidPattern(regex::Error),
    #[error("the rewrite changed the brace balance of the document from {before} to {after}")]
    BraceBalance { before: i64, after: i64 },
}

/// A rule that could not be applied. Its output, if any, was discarded.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("rule `{rule}` was not applied: {kind}")]
pub struct RuleFailure {
    pub rule: &'static str,
    pub kind: RuleFailureKind,
}

impl RuleFailure {
    pub fn to_diagnostic(&self, severity: Severity) -> Diagnostic<FileId> {
        Diagnostic::new(severity)
            .with_message(format!("rule `{}` was not applied", self.rule))
            .with_notes(vec![self.kind.to_string()])
    }
}

/// The result of running a [`RuleSet`] over a document.
#[derive(Debug, Clone, PartialEq)]
pub struct Rewritten {
    pub text: String,
    pub failures: Vec<RuleFailure>,
}

/// An ordered list of rules with their compiled patterns.
pub struct RuleSet {
    rules: Vec<(&'static RewriteRule, Result<Regex, regex::Error>)>,
}

static STANDARD: Lazy<RuleSet> = Lazy::new(|| RuleSet::new(RULES));

impl RuleSet {
    /// Compile a list of rules. Patterns that fail to compile are kept, and
    /// reported each time the set is applied.
    pub fn new(rules: &'static [RewriteRule]) -> RuleSet {
        RuleSet {
            rules: rules
                .iter()
                .map(|rule| (rule, Regex::new(rule.pattern)))
                .collect(),
        }
    }

    /// The rules in [`RULES`], compiled once per process.
    pub fn standard() -> &'static RuleSet {
        &STANDARD
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|(rule, _)| rule.name)
    }

    pub fn apply(&self, text: &str) -> Rewritten {
        let mut text = text.to_owned();
        let mut failures = Vec::new();

        for (rule, regex) in &self.rules {
            let regex = match regex {
                Ok(regex) => regex,
                Err(error) => {
                    log::warn!("skipping rule `{}`: {}", rule.name, error);
                    failures.push(RuleFailure {
                        rule: rule.name,
                        kind: RuleFailureKind::InvalidPattern(error.clone()),
                    });
                    continue;
                }
            };

            let rewritten = match regex.replace_all(&text, rule.replacement) {
                Cow::Borrowed(_) => {
                    log::trace!("rule `{}` did not match", rule.name);
                    continue;
                }
                Cow::Owned(rewritten) => rewritten,
            };

            let before = lexer::brace_balance(&text);
            let after = lexer::brace_balance(&rewritten);
            if before != after {
                log::warn!("discarding the output of rule `{}`", rule.name);
                failures.push(RuleFailure {
                    rule: rule.name,
                    kind: RuleFailureKind::BraceBalance { before, after },
                });
                continue;
            }

            log::debug!("applied rule `{}`", rule.name);
            text = rewritten;
        }

        Rewritten { text, failures }
    }
}
