//! A literal-aware tokenizer for delimiter counting.
//!
//! The translation passes work on lines of text, but they need to know where
//! blocks open and close. Counting `{` and `}` characters directly breaks as
//! soon as a brace turns up inside a string literal (`"{}"`) or a comment, so
//! this lexer classifies those spans first and only reports the delimiters
//! found outside of them.

use logos::Logos;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Logos)]
pub enum Token {
    #[token("{")]
    OpenBrace,
    #[token("}")]
    CloseBrace,
    #[token(";")]
    Semicolon,
    // Move string literals never span lines.
    #[regex(r#""([^"\\\n]|\\.)*""#)]
    StringLiteral,
    #[regex(r"//[^\n]*")]
    LineComment,
    #[token("/*", block_comment)]
    BlockComment,

    #[error]
    #[regex(r#"[^{};"/]+"#, logos::skip)]
    #[token("/", logos::skip)]
    Error,
}

const OPEN: &str = "/*";
const CLOSE: &str = "*/";

/// Consume a (possibly nested) block comment. Returns `false` if the end of
/// the source was reached before the comment was closed, in which case the
/// rest of the source is swallowed into an error token.
fn block_comment<'source>(lexer: &mut logos::Lexer<'source, Token>) -> bool {
    let mut depth: u32 = 1;
    while let Some(c) = lexer.remainder().chars().next() {
        if lexer.remainder().starts_with(OPEN) {
            lexer.bump(OPEN.len());
            depth += 1;
        } else if lexer.remainder().starts_with(CLOSE) {
            lexer.bump(CLOSE.len());
            depth -= 1;
            if depth == 0 {
                return true;
            }
        } else {
            lexer.bump(c.len_utf8());
        }
    }
    false
}

/// A structural delimiter found outside of string literals and comments.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delimiter {
    Open,
    Close,
    Semicolon,
}

impl Token {
    pub fn delimiter(self) -> Option<Delimiter> {
        match self {
            Token::OpenBrace => Some(Delimiter::Open),
            Token::CloseBrace => Some(Delimiter::Close),
            Token::Semicolon => Some(Delimiter::Semicolon),
            Token::StringLiteral | Token::LineComment | Token::BlockComment | Token::Error => None,
        }
    }
}

/// The delimiters of `source`, paired with their byte offsets.
pub fn delimiters(source: &str) -> impl Iterator<Item = (usize, Delimiter)> + '_ {
    Token::lexer(source)
        .spanned()
        .filter_map(|(token, range)| Some((range.start, token.delimiter()?)))
}

/// Number of opening braces minus the number of closing braces in `source`,
/// ignoring any that appear inside literals or comments.
pub fn brace_balance(source: &str) -> i64 {
    delimiters(source).fold(0, |balance, (_, delimiter)| match delimiter {
        Delimiter::Open => balance + 1,
        Delimiter::Close => balance - 1,
        Delimiter::Semicolon => balance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Delimiter> {
        delimiters(source).map(|(_, delimiter)| delimiter).collect()
    }

    #[test]
    fn plain_delimiters() {
        assert_eq!(
            kinds("fun f() { let x = 1; }"),
            [Delimiter::Open, Delimiter::Semicolon, Delimiter::Close],
        );
    }

    #[test]
    fn braces_in_strings_are_ignored() {
        assert_eq!(kinds(r#"assert!(x, "{}", E);"#), [Delimiter::Semicolon]);
        assert_eq!(kinds(r#"let s = b"}\"{";"#), [Delimiter::Semicolon]);
    }

    #[test]
    fn braces_in_comments_are_ignored() {
        assert_eq!(kinds("// a { comment\n}"), [Delimiter::Close]);
        assert_eq!(kinds("/// doc { }\n{"), [Delimiter::Open]);
        assert_eq!(kinds("/* { /* } */ { */ }"), [Delimiter::Close]);
    }

    #[test]
    fn stray_quote_stays_on_its_line() {
        assert_eq!(
            kinds("let s = b\"abc;\nfun f() {\n}"),
            [Delimiter::Semicolon, Delimiter::Open, Delimiter::Close],
        );
        assert_eq!(brace_balance("x = \"a\n{\ny = \"b\n"), 1);
    }

    #[test]
    fn unterminated_block_comment_swallows_the_rest() {
        assert_eq!(kinds("{ /* never closed }"), [Delimiter::Open]);
    }

    #[test]
    fn offsets_point_at_the_delimiter() {
        let offsets: Vec<_> = delimiters("a {\n}").map(|(offset, _)| offset).collect();
        assert_eq!(offsets, [2, 4]);
    }

    #[test]
    fn balance() {
        assert_eq!(brace_balance("{ { }"), 1);
        assert_eq!(brace_balance(r#"} "{{{""#), -1);
        assert_eq!(brace_balance("struct A {}"), 0);
    }
}
