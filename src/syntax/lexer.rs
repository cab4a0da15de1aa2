//! Java tokens.
//!
//! Only reserved words that shape a compilation unit get their own kind.
//! Restricted identifiers (`module`, `requires`, `record`, ...) lex as
//! [`SyntaxKind::Ident`] and are recognised by text in the parser, since
//! they remain valid identifiers everywhere else.

use logos::{FilterResult, Lexer, Logos};

use crate::base::{TextRange, TextSize};

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
pub enum SyntaxKind {
    /// `/* ... */` and `/** ... */`; skipped, never emitted.
    #[token("/*", block_comment)]
    BlockComment,

    #[token("package")]
    Package,
    #[token("import")]
    Import,
    #[token("static")]
    Static,
    #[token("class")]
    Class,
    #[token("interface")]
    Interface,
    #[token("enum")]
    Enum,

    #[regex(r"[\p{XID_Start}_$][\p{XID_Continue}$]*")]
    Ident,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    #[regex(r#""""([^"\\]|\\.|"[^"\\]|""[^"\\])*""""#)]
    StringLit,
    #[regex(r"'([^'\\\n]|\\.)+'")]
    CharLit,
    #[regex(r"[0-9][0-9a-zA-Z_.]*")]
    NumberLit,

    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(";")]
    Semi,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("...")]
    Ellipsis,
    #[token("*")]
    Star,
    #[token("@")]
    At,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    /// Any other operator run (`=`, `->`, `::`, `&&`, ...).
    #[regex(r"[=+\-%&|^!~?:]+")]
    #[token("/")]
    Op,
}

/// Skip to the closing `*/`. An unterminated comment swallows the rest of
/// the input and is an error.
fn block_comment(lex: &mut Lexer<'_, SyntaxKind>) -> FilterResult<(), ()> {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            FilterResult::Skip
        }
        None => {
            lex.bump(lex.remainder().len());
            FilterResult::Error(())
        }
    }
}

impl SyntaxKind {
    /// Human-readable form used in syntax error messages.
    pub fn describe(self) -> &'static str {
        match self {
            SyntaxKind::BlockComment => "comment",
            SyntaxKind::Package => "'package'",
            SyntaxKind::Import => "'import'",
            SyntaxKind::Static => "'static'",
            SyntaxKind::Class => "'class'",
            SyntaxKind::Interface => "'interface'",
            SyntaxKind::Enum => "'enum'",
            SyntaxKind::Ident => "identifier",
            SyntaxKind::StringLit => "string literal",
            SyntaxKind::CharLit => "character literal",
            SyntaxKind::NumberLit => "number literal",
            SyntaxKind::LBrace => "'{'",
            SyntaxKind::RBrace => "'}'",
            SyntaxKind::LParen => "'('",
            SyntaxKind::RParen => "')'",
            SyntaxKind::LBracket => "'['",
            SyntaxKind::RBracket => "']'",
            SyntaxKind::Semi => "';'",
            SyntaxKind::Comma => "','",
            SyntaxKind::Dot => "'.'",
            SyntaxKind::Ellipsis => "'...'",
            SyntaxKind::Star => "'*'",
            SyntaxKind::At => "'@'",
            SyntaxKind::Lt => "'<'",
            SyntaxKind::Gt => "'>'",
            SyntaxKind::Op => "operator",
        }
    }
}

/// A lexed token borrowing its text from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    pub kind: SyntaxKind,
    pub text: &'src str,
    pub range: TextRange,
}

/// Tokenize `source`, stopping at the first unrecognised input.
///
/// On failure returns the range of the offending text.
pub fn tokenize(source: &str) -> Result<Vec<Token<'_>>, TextRange> {
    let mut lexer = SyntaxKind::lexer(source);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let range = TextRange::new(
            TextSize::from(span.start as u32),
            TextSize::from(span.end as u32),
        );
        match result {
            Ok(kind) => tokens.push(Token {
                kind,
                text: lexer.slice(),
                range,
            }),
            Err(()) => return Err(range),
        }
    }
    Ok(tokens)
}
