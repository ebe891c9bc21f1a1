//! Analyzed syntax tree of the Tern language.
//!
//! This crate describes the tree handed over by semantic analysis: every
//! expression already carries its resolved surface type and every scope
//! carries its finished symbol table. Later stages only read it.

pub mod ast;
mod builder;
mod symbol_table;

pub use ast::{
    BinaryOperator, Block, Call, Constant, Expr, ExprKind, FnDecl, FnImpl, Item, MatchCase,
    MatchExpr, Module, NodeKind, Param, Statement, TypeDecl,
};
pub use builder::ExprBuilder;
pub use symbol_table::{SymbolRecord, SymbolTable};
