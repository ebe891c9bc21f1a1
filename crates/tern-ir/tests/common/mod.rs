//! Common helpers for building analyzed modules and inspecting their RIR.

#![allow(dead_code)]

use std::sync::Arc;

use tern_ast::{Block, Expr, FnDecl, FnImpl, Item, Module, Param, Statement, TypeDecl};
use tern_core::{ElementaryType, Result, Span, Type};
use tern_ir::{ExprKind, Function, LoweringOptions, Rir, lower_module};

pub fn span() -> Span {
    Span::on_line(1, 1, 10)
}

pub fn elem(etype: ElementaryType) -> Arc<Type> {
    Type::elementary(etype)
}

/// A function definition `name(params) -> ret { statements }`
pub fn function(
    name: &str,
    params: &[(&str, Arc<Type>)],
    ret: Option<Arc<Type>>,
    statements: Vec<Statement>,
) -> Item {
    let params = params
        .iter()
        .map(|(param, ty)| Param::new(*param, ty.clone(), span()))
        .collect();
    let decl = FnDecl::new(name, params, ret, span());
    Item::Function(FnImpl::new(decl, Block::new(statements, span())))
}

/// A foreign function declaration
pub fn foreign(name: &str, params: &[(&str, Arc<Type>)], ret: Option<Arc<Type>>) -> Item {
    let params = params
        .iter()
        .map(|(param, ty)| Param::new(*param, ty.clone(), span()))
        .collect();
    Item::Foreign(FnDecl::new(name, params, ret, span()))
}

/// `type name = body`, returning the item and the defined type
pub fn type_decl(name: &str, body: Arc<Type>) -> (Item, Arc<Type>) {
    let decl = TypeDecl::new(name, body, span());
    let ty = decl.ty.clone();
    (Item::TypeDecl(decl), ty)
}

pub fn ret(value: Expr) -> Statement {
    Statement::Return {
        value: Some(value),
        span: span(),
    }
}

pub fn module(items: Vec<Item>) -> Module {
    let mut module = Module::new("test");
    for item in items {
        module.add_item(item).expect("duplicate item in test module");
    }
    module
}

pub fn try_lower(items: Vec<Item>) -> Result<Rir> {
    lower_module(&module(items), &LoweringOptions::default())
}

pub fn lower(items: Vec<Item>) -> Rir {
    try_lower(items).expect("lowering failed")
}

/// Instructions of every block of `func` in layout order, exits excluded
pub fn instructions(func: &Function) -> Vec<&ExprKind> {
    func.blocks()
        .flat_map(|block| func.block_expressions(block))
        .map(|expr| &expr.kind)
        .collect()
}

pub fn count(func: &Function, mnemonic: &str) -> usize {
    instructions(func)
        .into_iter()
        .filter(|kind| kind.mnemonic() == mnemonic)
        .count()
}
