//! Grammar productions, split by syntactic category.
//!
//! - `stmt.rs`: blocks, declarations, `return`
//! - `expr.rs`: assignment, binary and unary operators, postfix chains, literals

mod expr;
mod stmt;
