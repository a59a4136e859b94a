//! Expression parsing.
//!
//! Precedence, lowest first: assignment (right associative), additive,
//! multiplicative, prefix unary, postfix chains, primary.

use crate::{ParseError, Parser};
use imut_ir::{
    AssignOp, BinaryOp, Expr, ExprId, ExprKind, Property, TokenKind, UnaryOp, UpdateOp,
};
use imut_stack::ensure_sufficient_stack;

impl Parser<'_> {
    /// Parse an expression, including assignment.
    ///
    /// Uses `ensure_sufficient_stack` so deeply nested input cannot overflow.
    pub(crate) fn parse_expr(&mut self) -> Result<ExprId, ParseError> {
        ensure_sufficient_stack(|| self.parse_expr_inner())
    }

    fn parse_expr_inner(&mut self) -> Result<ExprId, ParseError> {
        let left = self.parse_additive()?;

        let Some(op) = assign_op(self.cursor.current_kind()) else {
            return Ok(left);
        };
        self.check_assign_target(left)?;
        self.cursor.advance();
        let value = self.parse_expr()?;
        let span = self.span_of(left).merge(self.span_of(value));
        Ok(self.alloc(Expr::new(
            ExprKind::Assign {
                op,
                target: left,
                value,
            },
            span,
        )))
    }

    /// Parse `+` and `-`.
    fn parse_additive(&mut self) -> Result<ExprId, ParseError> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match self.cursor.current_kind() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.cursor.advance();
            let right = self.parse_multiplicative()?;

            let span = self.span_of(left).merge(self.span_of(right));
            left = self.alloc(Expr::new(ExprKind::Binary { op, left, right }, span));
        }

        Ok(left)
    }

    /// Parse `*`, `/` and `%`.
    fn parse_multiplicative(&mut self) -> Result<ExprId, ParseError> {
        let mut left = self.parse_unary()?;

        loop {
            let op = match self.cursor.current_kind() {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Rem,
                _ => break,
            };
            self.cursor.advance();
            let right = self.parse_unary()?;

            let span = self.span_of(left).merge(self.span_of(right));
            left = self.alloc(Expr::new(ExprKind::Binary { op, left, right }, span));
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<ExprId, ParseError> {
        ensure_sufficient_stack(|| self.parse_unary_inner())
    }

    fn parse_unary_inner(&mut self) -> Result<ExprId, ParseError> {
        let start = self.cursor.current_span();
        let kind = self.cursor.current_kind();

        let unary = match kind {
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Bang => Some(UnaryOp::Not),
            _ => None,
        };
        if let Some(op) = unary {
            self.cursor.advance();
            let operand = self.parse_unary()?;
            let span = start.merge(self.span_of(operand));
            return Ok(self.alloc(Expr::new(ExprKind::Unary { op, operand }, span)));
        }

        if let Some(op) = update_op(kind) {
            self.cursor.advance();
            let target = self.parse_unary()?;
            self.check_assign_target(target)?;
            let span = start.merge(self.span_of(target));
            return Ok(self.alloc(Expr::new(
                ExprKind::Update {
                    op,
                    prefix: true,
                    target,
                },
                span,
            )));
        }

        self.parse_postfix()
    }

    /// Parse member access, indexing, calls and a trailing `++`/`--`.
    fn parse_postfix(&mut self) -> Result<ExprId, ParseError> {
        let mut expr = self.parse_primary()?;

        loop {
            match self.cursor.current_kind() {
                TokenKind::Dot => {
                    self.cursor.advance();
                    let token = *self.cursor.current();
                    let property = match token.kind {
                        TokenKind::Ident(name) => name,
                        other => match other.keyword_text() {
                            Some(text) => self.intern(text),
                            None => return Err(ParseError::unexpected("a property name", &token)),
                        },
                    };
                    self.cursor.advance();
                    let span = self.span_of(expr).merge(token.span);
                    expr = self.alloc(Expr::new(
                        ExprKind::Member {
                            object: expr,
                            property,
                        },
                        span,
                    ));
                }
                TokenKind::LBracket => {
                    self.cursor.advance();
                    let index = self.parse_expr()?;
                    let end = self.cursor.expect(TokenKind::RBracket)?;
                    let span = self.span_of(expr).merge(end);
                    expr = self.alloc(Expr::new(
                        ExprKind::Index {
                            object: expr,
                            index,
                        },
                        span,
                    ));
                }
                TokenKind::LParen => {
                    self.cursor.advance();
                    let args = self.parse_list(TokenKind::RParen)?;
                    let span = self.span_of(expr).merge(self.cursor.previous_span());
                    let args = self.arena.alloc_expr_list(args);
                    expr = self.alloc(Expr::new(ExprKind::Call { callee: expr, args }, span));
                }
                kind @ (TokenKind::PlusPlus | TokenKind::MinusMinus) => {
                    let Some(op) = update_op(kind) else { break };
                    self.check_assign_target(expr)?;
                    let end = self.cursor.advance().span;
                    let span = self.span_of(expr).merge(end);
                    expr = self.alloc(Expr::new(
                        ExprKind::Update {
                            op,
                            prefix: false,
                            target: expr,
                        },
                        span,
                    ));
                    break;
                }
                _ => break,
            }
        }

        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<ExprId, ParseError> {
        let token = *self.cursor.current();
        let kind = match token.kind {
            TokenKind::Number(bits) => ExprKind::Number(bits),
            TokenKind::String(name) => ExprKind::String(name),
            TokenKind::True => ExprKind::Bool(true),
            TokenKind::False => ExprKind::Bool(false),
            TokenKind::Null => ExprKind::Null,
            TokenKind::Undefined => ExprKind::Undefined,
            TokenKind::Ident(name) => {
                if self.cursor.peek_kind(1) == TokenKind::FatArrow {
                    return Err(ParseError::UnsupportedSyntax {
                        construct: "nested arrow function",
                        span: token.span,
                    });
                }
                ExprKind::Ident(name)
            }
            TokenKind::LParen => {
                self.cursor.advance();
                let inner = self.parse_expr()?;
                self.cursor.expect(TokenKind::RParen)?;
                if self.cursor.check(TokenKind::FatArrow) {
                    return Err(ParseError::UnsupportedSyntax {
                        construct: "nested arrow function",
                        span: token.span,
                    });
                }
                return Ok(inner);
            }
            TokenKind::LBracket => {
                self.cursor.advance();
                let elems = self.parse_list(TokenKind::RBracket)?;
                let span = token.span.merge(self.cursor.previous_span());
                let range = self.arena.alloc_expr_list(elems);
                return Ok(self.alloc(Expr::new(ExprKind::Array(range), span)));
            }
            TokenKind::LBrace => return self.parse_object(),
            TokenKind::Function => {
                return Err(ParseError::UnsupportedSyntax {
                    construct: "nested function",
                    span: token.span,
                })
            }
            other if other.is_unsupported_keyword() => {
                return Err(ParseError::UnsupportedSyntax {
                    construct: other.describe(),
                    span: token.span,
                })
            }
            _ => return Err(ParseError::unexpected("an expression", &token)),
        };
        self.cursor.advance();
        Ok(self.alloc(Expr::new(kind, token.span)))
    }

    /// Parse comma-separated expressions up to and including `close`.
    /// A trailing comma is allowed.
    fn parse_list(&mut self, close: TokenKind) -> Result<Vec<ExprId>, ParseError> {
        let mut items = Vec::new();
        while !self.cursor.check(close) {
            items.push(self.parse_expr()?);
            if !self.cursor.eat(TokenKind::Comma) {
                break;
            }
        }
        self.cursor.expect(close)?;
        Ok(items)
    }

    /// Parse `{ key: value, shorthand }`.
    fn parse_object(&mut self) -> Result<ExprId, ParseError> {
        let open = self.cursor.expect(TokenKind::LBrace)?;
        let mut props = Vec::new();

        while !self.cursor.check(TokenKind::RBrace) {
            let token = *self.cursor.current();
            let key = match token.kind {
                TokenKind::Ident(name) | TokenKind::String(name) => name,
                TokenKind::Number(_) => {
                    let source = self.source;
                    self.intern(token.span.snippet(source))
                }
                other => match other.keyword_text() {
                    Some(text) => self.intern(text),
                    None => return Err(ParseError::unexpected("a property name", &token)),
                },
            };
            self.cursor.advance();

            let value = if self.cursor.eat(TokenKind::Colon) {
                self.parse_expr()?
            } else if let TokenKind::Ident(name) = token.kind {
                self.alloc(Expr::new(ExprKind::Ident(name), token.span))
            } else {
                return Err(ParseError::unexpected("`:`", self.cursor.current()));
            };

            let span = token.span.merge(self.span_of(value));
            props.push(Property { key, value, span });
            if !self.cursor.eat(TokenKind::Comma) {
                break;
            }
        }

        let close = self.cursor.expect(TokenKind::RBrace)?;
        let range = self.arena.alloc_props(props);
        Ok(self.alloc(Expr::new(ExprKind::Object(range), open.merge(close))))
    }

    /// Only identifiers, member and index expressions can be written.
    fn check_assign_target(&self, target: ExprId) -> Result<(), ParseError> {
        let expr = self.arena.get(target);
        match expr.kind {
            ExprKind::Ident(_) | ExprKind::Member { .. } | ExprKind::Index { .. } => Ok(()),
            _ => Err(ParseError::InvalidAssignmentTarget { span: expr.span }),
        }
    }
}

fn assign_op(kind: TokenKind) -> Option<AssignOp> {
    Some(match kind {
        TokenKind::Eq => AssignOp::Assign,
        TokenKind::PlusEq => AssignOp::Add,
        TokenKind::MinusEq => AssignOp::Sub,
        TokenKind::StarEq => AssignOp::Mul,
        TokenKind::SlashEq => AssignOp::Div,
        TokenKind::PercentEq => AssignOp::Rem,
        _ => return None,
    })
}

fn update_op(kind: TokenKind) -> Option<UpdateOp> {
    match kind {
        TokenKind::PlusPlus => Some(UpdateOp::Increment),
        TokenKind::MinusMinus => Some(UpdateOp::Decrement),
        _ => None,
    }
}
