//! Analyzed AST to RIR lowering.

mod constructor;
mod context;
mod expressions;
mod match_expr;
mod program;
mod statements;
mod types;

pub use program::{AstLowering, lower_module};
