//! Recursive descent parser for mutation procedures.
//!
//! A procedure is a `function` expression or an arrow function with at most a
//! handful of straight-line statements. The parser produces a flat AST in an
//! [`ExprArena`] and bundles it with the interner and source text into a
//! [`Procedure`].

mod cursor;
mod error;
mod grammar;

pub use cursor::Cursor;
pub use error::ParseError;

use imut_ir::{
    Body, Expr, ExprArena, ExprId, Name, Param, Procedure, Span, StringInterner, TokenKind,
};

/// Parser state.
pub struct Parser<'src> {
    cursor: Cursor,
    arena: ExprArena,
    interner: StringInterner,
    source: &'src str,
}

impl<'src> Parser<'src> {
    /// Lex `source` and prepare to parse it.
    pub fn new(source: &'src str) -> Result<Self, ParseError> {
        let mut interner = StringInterner::new();
        let tokens = imut_lexer::lex(source, &mut interner)?;
        Ok(Parser {
            cursor: Cursor::new(tokens),
            arena: ExprArena::new(),
            interner,
            source,
        })
    }

    /// Parse one complete procedure. Anything after it is an error.
    pub fn parse(mut self) -> Result<Procedure, ParseError> {
        let start = self.cursor.current_span();
        let (params, body) = self.parse_header_and_body()?;
        self.cursor.eat(TokenKind::Semicolon);
        if !self.cursor.is_at_end() {
            return Err(ParseError::TrailingInput {
                span: self.cursor.current_span(),
            });
        }
        let span = start.merge(self.cursor.previous_span());
        Ok(Procedure {
            params,
            body,
            arena: self.arena,
            interner: self.interner,
            source: self.source.into(),
            span,
        })
    }

    fn parse_header_and_body(&mut self) -> Result<(Vec<Param>, Body), ParseError> {
        match self.cursor.current_kind() {
            TokenKind::Function => {
                self.cursor.advance();
                if self.cursor.check_ident() {
                    self.cursor.advance();
                }
                self.cursor.expect(TokenKind::LParen)?;
                let params = self.parse_params()?;
                let body = Body::Block(self.parse_block()?);
                Ok((params, body))
            }
            TokenKind::LParen => {
                self.cursor.advance();
                let params = self.parse_params()?;
                self.cursor.expect(TokenKind::FatArrow)?;
                let body = self.parse_arrow_body()?;
                Ok((params, body))
            }
            TokenKind::Ident(name) if self.cursor.peek_kind(1) == TokenKind::FatArrow => {
                let span = self.cursor.advance().span;
                self.cursor.advance();
                let body = self.parse_arrow_body()?;
                Ok((vec![Param { name, span }], body))
            }
            _ => Err(ParseError::unexpected(
                "a function or arrow function",
                self.cursor.current(),
            )),
        }
    }

    /// Parse `a, b)` after the opening parenthesis.
    fn parse_params(&mut self) -> Result<Vec<Param>, ParseError> {
        let mut params = Vec::new();
        while !self.cursor.check(TokenKind::RParen) {
            let token = *self.cursor.current();
            let TokenKind::Ident(name) = token.kind else {
                return Err(ParseError::unexpected("a parameter name", &token));
            };
            self.cursor.advance();
            params.push(Param {
                name,
                span: token.span,
            });
            if !self.cursor.eat(TokenKind::Comma) {
                break;
            }
        }
        self.cursor.expect(TokenKind::RParen)?;
        Ok(params)
    }

    fn parse_arrow_body(&mut self) -> Result<Body, ParseError> {
        if self.cursor.check(TokenKind::LBrace) {
            Ok(Body::Block(self.parse_block()?))
        } else {
            Ok(Body::Expr(self.parse_expr()?))
        }
    }

    #[inline]
    fn alloc(&mut self, expr: Expr) -> ExprId {
        self.arena.alloc(expr)
    }

    #[inline]
    fn span_of(&self, id: ExprId) -> Span {
        self.arena.get(id).span
    }

    fn intern(&mut self, text: &str) -> Name {
        self.interner.intern(text)
    }
}

/// Lex and parse a procedure.
pub fn parse_procedure(source: &str) -> Result<Procedure, ParseError> {
    let procedure = Parser::new(source)?.parse()?;
    tracing::trace!(
        params = procedure.params.len(),
        exprs = procedure.arena.expr_count(),
        "parsed procedure"
    );
    Ok(procedure)
}
