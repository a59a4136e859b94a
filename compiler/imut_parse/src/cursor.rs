//! Token cursor for navigating the token stream.

use crate::ParseError;
use imut_ir::{Span, Token, TokenKind, TokenList};

/// Cursor over a lexed procedure.
///
/// Invariant: the position is always valid and the last token is `Eof`, so
/// `current()` never runs off the end.
pub struct Cursor {
    tokens: TokenList,
    pos: usize,
}

const EOF: Token = Token::new(TokenKind::Eof, Span::DUMMY);

impl Cursor {
    pub fn new(tokens: TokenList) -> Self {
        Cursor { tokens, pos: 0 }
    }

    #[inline]
    pub fn current(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&EOF)
    }

    #[inline]
    pub fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    #[inline]
    pub fn current_span(&self) -> Span {
        self.current().span
    }

    /// Kind of the token `offset` positions ahead.
    pub fn peek_kind(&self, offset: usize) -> TokenKind {
        self.tokens
            .get(self.pos + offset)
            .map_or(TokenKind::Eof, |t| t.kind)
    }

    /// Span of the most recently consumed token.
    pub fn previous_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens
                .get(self.pos - 1)
                .map_or(Span::DUMMY, |t| t.span)
        } else {
            Span::DUMMY
        }
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.current_kind() == TokenKind::Eof
    }

    /// Check the current token against a payload-free kind.
    #[inline]
    pub fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    #[inline]
    pub fn check_ident(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Ident(_))
    }

    /// Advance and return the consumed token.
    pub fn advance(&mut self) -> Token {
        let token = *self.current();
        if !self.is_at_end() {
            self.pos += 1;
        }
        token
    }

    /// Consume the current token if it matches.
    pub fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume a token of `kind` or fail with what was expected.
    pub fn expect(&mut self, kind: TokenKind) -> Result<Span, ParseError> {
        if self.check(kind) {
            Ok(self.advance().span)
        } else {
            Err(ParseError::unexpected(kind.describe(), self.current()))
        }
    }
}
