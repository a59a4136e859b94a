//! Tokens produced by the lexer.

use crate::{Name, Span};
use std::fmt;

/// A token with its source location.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[inline]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }
}

/// Token kinds.
///
/// Number literals are stored as `f64` bits so the enum stays `Eq + Hash`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TokenKind {
    // Literals
    Number(u64),
    String(Name),
    Ident(Name),

    // Keywords the grammar accepts
    True,
    False,
    Null,
    Undefined,
    Function,
    Let,
    Const,
    Var,
    Return,

    // Keywords the grammar recognizes only to reject
    If,
    Else,
    For,
    While,
    Do,
    Switch,
    Break,
    Continue,
    New,
    This,
    Class,
    Throw,
    Try,

    // Delimiters
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Colon,
    Semicolon,
    Dot,
    FatArrow,

    // Assignment operators
    Eq,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    PlusPlus,
    MinusMinus,

    // Arithmetic and logic
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Bang,

    /// Input the lexer could not tokenize.
    Error,
    Eof,
}

impl TokenKind {
    /// Source text of keyword tokens.
    ///
    /// Keywords are valid property names after `.` (`map.delete`, `x.new`), so
    /// the parser turns them back into names through this.
    pub fn keyword_text(self) -> Option<&'static str> {
        Some(match self {
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Null => "null",
            TokenKind::Undefined => "undefined",
            TokenKind::Function => "function",
            TokenKind::Let => "let",
            TokenKind::Const => "const",
            TokenKind::Var => "var",
            TokenKind::Return => "return",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::For => "for",
            TokenKind::While => "while",
            TokenKind::Do => "do",
            TokenKind::Switch => "switch",
            TokenKind::Break => "break",
            TokenKind::Continue => "continue",
            TokenKind::New => "new",
            TokenKind::This => "this",
            TokenKind::Class => "class",
            TokenKind::Throw => "throw",
            TokenKind::Try => "try",
            _ => return None,
        })
    }

    /// Keywords that introduce constructs procedures may not contain.
    pub fn is_unsupported_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::If
                | TokenKind::Else
                | TokenKind::For
                | TokenKind::While
                | TokenKind::Do
                | TokenKind::Switch
                | TokenKind::Break
                | TokenKind::Continue
                | TokenKind::New
                | TokenKind::This
                | TokenKind::Class
                | TokenKind::Throw
                | TokenKind::Try
        )
    }

    /// Short human-readable description for error messages.
    pub fn describe(self) -> &'static str {
        if let Some(text) = self.keyword_text() {
            return text;
        }
        match self {
            TokenKind::Number(_) => "number",
            TokenKind::String(_) => "string",
            TokenKind::Ident(_) => "identifier",
            TokenKind::LParen => "`(`",
            TokenKind::RParen => "`)`",
            TokenKind::LBrace => "`{`",
            TokenKind::RBrace => "`}`",
            TokenKind::LBracket => "`[`",
            TokenKind::RBracket => "`]`",
            TokenKind::Comma => "`,`",
            TokenKind::Colon => "`:`",
            TokenKind::Semicolon => "`;`",
            TokenKind::Dot => "`.`",
            TokenKind::FatArrow => "`=>`",
            TokenKind::Eq => "`=`",
            TokenKind::PlusEq => "`+=`",
            TokenKind::MinusEq => "`-=`",
            TokenKind::StarEq => "`*=`",
            TokenKind::SlashEq => "`/=`",
            TokenKind::PercentEq => "`%=`",
            TokenKind::PlusPlus => "`++`",
            TokenKind::MinusMinus => "`--`",
            TokenKind::Plus => "`+`",
            TokenKind::Minus => "`-`",
            TokenKind::Star => "`*`",
            TokenKind::Slash => "`/`",
            TokenKind::Percent => "`%`",
            TokenKind::Bang => "`!`",
            TokenKind::Error => "invalid token",
            TokenKind::Eof => "end of input",
            _ => "keyword",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Lexer output. Always ends with a single [`TokenKind::Eof`].
#[derive(Clone, Debug, Default)]
pub struct TokenList {
    pub tokens: Vec<Token>,
}

impl TokenList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn kinds(&self) -> impl Iterator<Item = TokenKind> + '_ {
        self.tokens.iter().map(|t| t.kind)
    }
}
