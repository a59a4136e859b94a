//! Lexer for mutation procedures, built on logos.
//!
//! This lexer:
//! - Interns every identifier and string literal into the procedure's interner
//! - Drops whitespace and comments (`//` and `/* */`)
//! - Stores number literals as `f64` bits
//!
//! The first untokenizable byte aborts lexing with a [`LexError`].

use imut_ir::{Span, StringInterner, Token, TokenKind, TokenList};
use logos::Logos;
use thiserror::Error;

/// Raw token from logos (before interning).
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
enum RawToken {
    #[regex(r"//[^\n]*")]
    LineComment,

    #[token("/*", block_comment)]
    BlockComment,

    // Keywords
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,
    #[token("undefined")]
    Undefined,
    #[token("function")]
    Function,
    #[token("let")]
    Let,
    #[token("const")]
    Const,
    #[token("var")]
    Var,
    #[token("return")]
    Return,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("for")]
    For,
    #[token("while")]
    While,
    #[token("do")]
    Do,
    #[token("switch")]
    Switch,
    #[token("break")]
    Break,
    #[token("continue")]
    Continue,
    #[token("new")]
    New,
    #[token("this")]
    This,
    #[token("class")]
    Class,
    #[token("throw")]
    Throw,
    #[token("try")]
    Try,

    // Delimiters
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token(";")]
    Semicolon,
    #[token(".")]
    Dot,
    #[token("=>")]
    FatArrow,

    // Assignment
    #[token("=")]
    Eq,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("%=")]
    PercentEq,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,

    // Operators
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("!")]
    Bang,

    // Hex integer
    #[regex(r"0[xX][0-9a-fA-F]+", |lex| parse_hex(&lex.slice()[2..]))]
    HexNumber(f64),

    // Decimal with optional fraction and exponent
    #[regex(r"[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    #[regex(r"'([^'\\\n]|\\.)*'")]
    String,

    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*")]
    Ident,
}

/// Lexing failure.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum LexError {
    #[error("unexpected character `{ch}`")]
    UnexpectedCharacter { ch: char, span: Span },

    #[error("unterminated string literal")]
    UnterminatedString { span: Span },

    #[error("unterminated block comment")]
    UnterminatedComment { span: Span },
}

impl LexError {
    pub fn span(&self) -> Span {
        match self {
            LexError::UnexpectedCharacter { span, .. }
            | LexError::UnterminatedString { span }
            | LexError::UnterminatedComment { span } => *span,
        }
    }
}

/// Tokenize `source`, interning names into `interner`.
///
/// The returned list always ends with [`TokenKind::Eof`].
pub fn lex(source: &str, interner: &mut StringInterner) -> Result<TokenList, LexError> {
    let mut result = TokenList::new();
    let mut logos = RawToken::lexer(source);

    while let Some(token_result) = logos.next() {
        let range = logos.span();
        let span = Span::from_range(range.clone());
        match token_result {
            Ok(RawToken::LineComment | RawToken::BlockComment) => {}
            Ok(raw) => {
                let kind = convert_token(raw, logos.slice(), interner);
                result.push(Token::new(kind, span));
            }
            Err(()) => return Err(classify_error(source, range.start)),
        }
    }

    let eof = Span::from_range(source.len()..source.len());
    result.push(Token::new(TokenKind::Eof, eof));
    Ok(result)
}

fn classify_error(source: &str, start: usize) -> LexError {
    let rest = &source[start..];
    let to_end = Span::from_range(start..source.len());
    if rest.starts_with("/*") {
        return LexError::UnterminatedComment { span: to_end };
    }
    match rest.chars().next() {
        Some('"' | '\'') => {
            let line_end = rest.find('\n').map_or(source.len(), |i| start + i);
            LexError::UnterminatedString {
                span: Span::from_range(start..line_end),
            }
        }
        Some(ch) => LexError::UnexpectedCharacter {
            ch,
            span: Span::from_range(start..start + ch.len_utf8()),
        },
        None => LexError::UnexpectedCharacter {
            ch: '\0',
            span: Span::from_range(start..start),
        },
    }
}

/// Convert a raw token to a `TokenKind`, interning text.
fn convert_token(raw: RawToken, slice: &str, interner: &mut StringInterner) -> TokenKind {
    match raw {
        RawToken::HexNumber(n) | RawToken::Number(n) => TokenKind::Number(n.to_bits()),
        RawToken::String => {
            let content = &slice[1..slice.len() - 1];
            TokenKind::String(interner.intern(&unescape_string(content)))
        }
        RawToken::Ident => TokenKind::Ident(interner.intern(slice)),

        RawToken::True => TokenKind::True,
        RawToken::False => TokenKind::False,
        RawToken::Null => TokenKind::Null,
        RawToken::Undefined => TokenKind::Undefined,
        RawToken::Function => TokenKind::Function,
        RawToken::Let => TokenKind::Let,
        RawToken::Const => TokenKind::Const,
        RawToken::Var => TokenKind::Var,
        RawToken::Return => TokenKind::Return,
        RawToken::If => TokenKind::If,
        RawToken::Else => TokenKind::Else,
        RawToken::For => TokenKind::For,
        RawToken::While => TokenKind::While,
        RawToken::Do => TokenKind::Do,
        RawToken::Switch => TokenKind::Switch,
        RawToken::Break => TokenKind::Break,
        RawToken::Continue => TokenKind::Continue,
        RawToken::New => TokenKind::New,
        RawToken::This => TokenKind::This,
        RawToken::Class => TokenKind::Class,
        RawToken::Throw => TokenKind::Throw,
        RawToken::Try => TokenKind::Try,

        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::LBracket => TokenKind::LBracket,
        RawToken::RBracket => TokenKind::RBracket,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Colon => TokenKind::Colon,
        RawToken::Semicolon => TokenKind::Semicolon,
        RawToken::Dot => TokenKind::Dot,
        RawToken::FatArrow => TokenKind::FatArrow,

        RawToken::Eq => TokenKind::Eq,
        RawToken::PlusEq => TokenKind::PlusEq,
        RawToken::MinusEq => TokenKind::MinusEq,
        RawToken::StarEq => TokenKind::StarEq,
        RawToken::SlashEq => TokenKind::SlashEq,
        RawToken::PercentEq => TokenKind::PercentEq,
        RawToken::PlusPlus => TokenKind::PlusPlus,
        RawToken::MinusMinus => TokenKind::MinusMinus,

        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Percent => TokenKind::Percent,
        RawToken::Bang => TokenKind::Bang,

        // Filtered out by `lex`
        RawToken::LineComment | RawToken::BlockComment => TokenKind::Error,
    }
}

/// Consume a block comment body; fails if it is never closed.
fn block_comment(lex: &mut logos::Lexer<RawToken>) -> bool {
    if let Some(end) = lex.remainder().find("*/") {
        lex.bump(end + 2);
        true
    } else {
        false
    }
}

fn parse_hex(digits: &str) -> Option<f64> {
    digits.chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(16).map(|d| acc * 16.0 + f64::from(d))
    })
}

/// Process string escape sequences.
///
/// Unknown escapes keep the escaped character (`\q` is `q`).
fn unescape_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => result.push('\n'),
                Some('r') => result.push('\r'),
                Some('t') => result.push('\t'),
                Some('0') => result.push('\0'),
                Some(other) => result.push(other),
                None => result.push('\\'),
            }
        } else {
            result.push(c);
        }
    }

    result
}

#[cfg(test)]
mod tests;
