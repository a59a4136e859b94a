//! Static discovery of write paths.
//!
//! Every write a procedure performs through its state parameter is either an
//! assignment whose target is a member/index chain rooted at state, or a
//! `set`/`delete` call on such a chain. Both are found by walking the AST once,
//! before the procedure runs.

use crate::{AnalysisError, Effect, Path, Segment, Segments};
use imut_ir::visitor::{walk_expr, walk_stmt, Visitor};
use imut_ir::{
    AssignOp, Expr, ExprArena, ExprId, ExprKind, ExprRange, Name, Procedure, Span, Stmt, StmtKind,
};
use imut_stack::ensure_sufficient_stack;
use imut_value::format_number;
use rustc_hash::FxHashSet;

/// List every write path of `procedure`, in source order.
///
/// Parameter 1 is the state, parameter 2 (optional) the runtime argument.
/// Duplicate paths are kept once.
pub fn extract(procedure: &Procedure) -> Result<Vec<Path>, AnalysisError> {
    let (state, args) = check_params(procedure)?;
    let mut extractor = Extractor {
        procedure,
        state,
        args,
        paths: Vec::new(),
        seen: FxHashSet::default(),
        error: None,
    };
    extractor.visit_body(&procedure.body, &procedure.arena);
    match extractor.error {
        Some(err) => Err(err),
        None => Ok(extractor.paths),
    }
}

fn check_params(procedure: &Procedure) -> Result<(Name, Option<Name>), AnalysisError> {
    match procedure.params.as_slice() {
        [] => Err(AnalysisError::MissingStateParameter {
            span: procedure.span,
        }),
        [state] => Ok((state.name, None)),
        [state, args] if state.name == args.name => Err(AnalysisError::DuplicateParameter {
            name: procedure.name(args.name).to_string(),
            span: args.span,
        }),
        [state, args] => Ok((state.name, Some(args.name))),
        [_, _, extra, ..] => Err(AnalysisError::TooManyParameters {
            count: procedure.params.len(),
            span: extra.span,
        }),
    }
}

struct Extractor<'p> {
    procedure: &'p Procedure,
    state: Name,
    args: Option<Name>,
    paths: Vec<Path>,
    seen: FxHashSet<Path>,
    /// First failure; once set, the walk stops descending.
    error: Option<AnalysisError>,
}

impl Extractor<'_> {
    fn arena(&self) -> &ExprArena {
        &self.procedure.arena
    }

    fn emit(&mut self, segments: Segments, effect: Effect) {
        let path = Path { segments, effect };
        if self.seen.insert(path.clone()) {
            tracing::trace!(%path, ?effect, "write path");
            self.paths.push(path);
        }
    }

    fn fail(&mut self, err: AnalysisError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    /// Segments from the state root to `id`, or `None` when the chain is
    /// rooted somewhere else (a local, the argument, a literal).
    fn state_segments(&self, id: ExprId) -> Result<Option<Segments>, AnalysisError> {
        ensure_sufficient_stack(|| {
            let expr = self.arena().get(id);
            match expr.kind {
                ExprKind::Ident(name) if name == self.state => Ok(Some(Segments::new())),
                ExprKind::Member { object, property } => {
                    let Some(mut segments) = self.state_segments(object)? else {
                        return Ok(None);
                    };
                    segments.push(Segment::Key(self.procedure.name(property).to_string()));
                    Ok(Some(segments))
                }
                ExprKind::Index { object, index } => {
                    let Some(mut segments) = self.state_segments(object)? else {
                        return Ok(None);
                    };
                    segments.push(self.key_segment(index)?);
                    Ok(Some(segments))
                }
                ExprKind::Call { callee, args } => {
                    let arity = args.len as usize;
                    match self.arena().get(callee).kind {
                        ExprKind::Member { object, property } => {
                            let Some(mut segments) = self.state_segments(object)? else {
                                return Ok(None);
                            };
                            let method = self.procedure.name(property);
                            if method != "get" || arity != 1 {
                                return Err(AnalysisError::UnsupportedCall {
                                    method: method.to_string(),
                                    arity,
                                    span: expr.span,
                                });
                            }
                            let key = self.arena().get_expr_list(args)[0];
                            segments.push(self.key_segment(key)?);
                            Ok(Some(segments))
                        }
                        _ => self.unsupported_callee(callee, arity, expr),
                    }
                }
                _ => Ok(None),
            }
        })
    }

    /// A call whose callee is not a method but may still be rooted at state
    /// (`s()`, `s.m['get'](k)`).
    fn unsupported_callee(
        &self,
        callee: ExprId,
        arity: usize,
        call: &Expr,
    ) -> Result<Option<Segments>, AnalysisError> {
        if self.state_segments(callee)?.is_none() {
            return Ok(None);
        }
        Err(AnalysisError::UnsupportedCall {
            method: self
                .procedure
                .snippet(self.arena().get(callee).span)
                .to_string(),
            arity,
            span: call.span,
        })
    }

    /// Segment for a computed key: a literal, `args`, `args.f` or `args['f']`.
    fn key_segment(&self, id: ExprId) -> Result<Segment, AnalysisError> {
        let expr = self.arena().get(id);
        let is_args = |id: ExprId| {
            matches!(self.arena().get(id).kind, ExprKind::Ident(name) if Some(name) == self.args)
        };
        let segment = match expr.kind {
            ExprKind::Number(bits) => Some(Segment::Key(format_number(ExprKind::number(bits)))),
            ExprKind::String(s) => Some(Segment::Key(self.procedure.name(s).to_string())),
            ExprKind::Ident(_) if is_args(id) => Some(Segment::WholeArg),
            ExprKind::Member { object, property } if is_args(object) => {
                Some(Segment::NamedArg(self.procedure.name(property).to_string()))
            }
            ExprKind::Index { object, index } if is_args(object) => {
                match self.arena().get(index).kind {
                    ExprKind::String(s) => {
                        Some(Segment::NamedArg(self.procedure.name(s).to_string()))
                    }
                    ExprKind::Number(bits) => {
                        Some(Segment::NamedArg(format_number(ExprKind::number(bits))))
                    }
                    _ => None,
                }
            }
            _ => None,
        };
        segment.ok_or_else(|| AnalysisError::UnanalyzableKey {
            key: self.procedure.snippet(expr.span).to_string(),
            span: expr.span,
        })
    }

    fn assignment(&mut self, op: AssignOp, target: ExprId, value: ExprId, span: Span) {
        let procedure = self.procedure;
        match self.state_segments(target) {
            // Compound writes read the old value, which the copy may not hold.
            Ok(Some(_)) if op != AssignOp::Assign => {
                self.fail(AnalysisError::CompoundAssignment {
                    op: op.as_symbol(),
                    span,
                });
            }
            Ok(Some(segments)) if segments.is_empty() => {
                self.fail(AnalysisError::StateReassignment { span });
            }
            Ok(Some(segments)) => {
                self.emit(segments, Effect::Assign);
                self.visit_expr_id(value, &procedure.arena);
            }
            Ok(None) => {
                self.visit_expr_id(target, &procedure.arena);
                self.visit_expr_id(value, &procedure.arena);
            }
            Err(err) => self.fail(err),
        }
    }

    /// A method call on a chain rooted at state, outside an assignment target.
    fn state_call(&mut self, expr: &Expr, callee: ExprId, args: ExprRange) {
        let procedure = self.procedure;
        let ExprKind::Member { object, property } = procedure.arena.get(callee).kind else {
            if let Err(err) = self.unsupported_callee(callee, args.len as usize, expr) {
                self.fail(err);
            }
            return;
        };
        let receiver = match self.state_segments(object) {
            Ok(Some(segments)) => segments,
            Ok(None) => return,
            Err(err) => {
                self.fail(err);
                return;
            }
        };
        let method = procedure.name(property);
        let arity = args.len as usize;
        let effect = match (method, arity) {
            ("get", 1) => return,
            ("set", 2) => Effect::MapSet,
            ("delete", 1) => Effect::MapDelete,
            _ => {
                self.fail(AnalysisError::UnsupportedCall {
                    method: method.to_string(),
                    arity,
                    span: expr.span,
                });
                return;
            }
        };
        let key = procedure.arena.get_expr_list(args)[0];
        match self.key_segment(key) {
            Ok(segment) => {
                let mut segments = receiver;
                segments.push(segment);
                self.emit(segments, effect);
            }
            Err(err) => self.fail(err),
        }
    }
}

impl<'ast> Visitor<'ast> for Extractor<'_> {
    fn visit_stmt(&mut self, stmt: &'ast Stmt, arena: &'ast ExprArena) {
        if self.error.is_some() {
            return;
        }
        if let StmtKind::Let { name, .. } = stmt.kind {
            if name == self.state || Some(name) == self.args {
                let procedure = self.procedure;
                self.fail(AnalysisError::ShadowedParameter {
                    name: procedure.name(name).to_string(),
                    span: stmt.span,
                });
                return;
            }
        }
        walk_stmt(self, stmt, arena);
    }

    fn visit_expr(&mut self, expr: &'ast Expr, arena: &'ast ExprArena) {
        if self.error.is_some() {
            return;
        }
        ensure_sufficient_stack(|| match expr.kind {
            ExprKind::Assign { op, target, value } => {
                self.assignment(op, target, value, expr.span);
            }
            ExprKind::Update { op, target, .. } => match self.state_segments(target) {
                Ok(Some(_)) => self.fail(AnalysisError::CompoundAssignment {
                    op: op.as_symbol(),
                    span: expr.span,
                }),
                Ok(None) => walk_expr(self, expr, arena),
                Err(err) => self.fail(err),
            },
            ExprKind::Call { callee, args } => {
                self.state_call(expr, callee, args);
                walk_expr(self, expr, arena);
            }
            _ => walk_expr(self, expr, arena),
        });
    }
}
