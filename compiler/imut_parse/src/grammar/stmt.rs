//! Statement parsing.

use crate::{ParseError, Parser};
use imut_ir::{Stmt, StmtKind, StmtRange, TokenKind};
use imut_stack::ensure_sufficient_stack;

impl Parser<'_> {
    /// Parse `{ stmt* }`.
    pub(crate) fn parse_block(&mut self) -> Result<StmtRange, ParseError> {
        self.cursor.expect(TokenKind::LBrace)?;
        let mut stmts = Vec::new();
        while !self.cursor.check(TokenKind::RBrace) {
            if self.cursor.is_at_end() {
                return Err(ParseError::unexpected("`}`", self.cursor.current()));
            }
            stmts.push(self.parse_stmt()?);
        }
        self.cursor.expect(TokenKind::RBrace)?;
        Ok(self.arena.alloc_stmts(stmts))
    }

    fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        ensure_sufficient_stack(|| self.parse_stmt_inner())
    }

    fn parse_stmt_inner(&mut self) -> Result<Stmt, ParseError> {
        let start = self.cursor.current_span();
        let kind = self.cursor.current_kind();
        match kind {
            TokenKind::Semicolon => {
                self.cursor.advance();
                Ok(Stmt::new(StmtKind::Empty, start))
            }
            TokenKind::LBrace => {
                let range = self.parse_block()?;
                let span = start.merge(self.cursor.previous_span());
                Ok(Stmt::new(StmtKind::Block(range), span))
            }
            TokenKind::Let | TokenKind::Var | TokenKind::Const => self.parse_declaration(kind),
            TokenKind::Return => {
                self.cursor.advance();
                let value = if matches!(
                    self.cursor.current_kind(),
                    TokenKind::Semicolon | TokenKind::RBrace | TokenKind::Eof
                ) {
                    None
                } else {
                    Some(self.parse_expr()?)
                };
                self.cursor.eat(TokenKind::Semicolon);
                let span = start.merge(self.cursor.previous_span());
                Ok(Stmt::new(StmtKind::Return(value), span))
            }
            TokenKind::Function => Err(ParseError::UnsupportedSyntax {
                construct: "nested function",
                span: start,
            }),
            _ if kind.is_unsupported_keyword() => Err(ParseError::UnsupportedSyntax {
                construct: kind.describe(),
                span: start,
            }),
            _ => {
                let expr = self.parse_expr()?;
                self.cursor.eat(TokenKind::Semicolon);
                let span = start.merge(self.cursor.previous_span());
                Ok(Stmt::new(StmtKind::Expr(expr), span))
            }
        }
    }

    /// `let x = e`, `var x`, `const x = e`.
    fn parse_declaration(&mut self, keyword: TokenKind) -> Result<Stmt, ParseError> {
        let start = self.cursor.advance().span;
        let token = *self.cursor.current();
        let TokenKind::Ident(name) = token.kind else {
            return Err(ParseError::unexpected("a variable name", &token));
        };
        self.cursor.advance();

        let init = if keyword == TokenKind::Const {
            self.cursor.expect(TokenKind::Eq)?;
            Some(self.parse_expr()?)
        } else if self.cursor.eat(TokenKind::Eq) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.cursor.eat(TokenKind::Semicolon);

        let span = start.merge(self.cursor.previous_span());
        Ok(Stmt::new(
            StmtKind::Let {
                name,
                mutable: keyword != TokenKind::Const,
                init,
            },
            span,
        ))
    }
}
