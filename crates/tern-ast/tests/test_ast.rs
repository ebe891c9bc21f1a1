//! Integration tests for the analyzed syntax tree

use tern_ast::{
    BinaryOperator, Block, ExprBuilder, FnDecl, FnImpl, Item, MatchCase, Module, NodeKind, Param,
    Statement, TypeDecl,
};
use tern_core::{ElementaryType, Span, Type};

fn dummy_span() -> Span {
    Span::on_line(1, 1, 10)
}

#[test]
fn test_module_with_function_and_type() {
    let span = dummy_span();
    let u32_t = Type::elementary(ElementaryType::U32);
    let u64_t = Type::elementary(ElementaryType::U64);

    let decl = FnDecl::new(
        "foo",
        vec![Param::new("a", u32_t.clone(), span)],
        Some(u64_t.clone()),
        span,
    );
    let body = Block::new(
        vec![Statement::Return {
            value: Some(ExprBuilder::binary(
                BinaryOperator::Add,
                ExprBuilder::int(45, u64_t.clone(), span),
                ExprBuilder::ident("a", u32_t, span),
                u64_t,
                span,
            )),
            span,
        }],
        span,
    );

    let mut module = Module::new("test");
    module.add_item(Item::Function(FnImpl::new(decl, body))).unwrap();
    module
        .add_item(Item::TypeDecl(TypeDecl::new(
            "flag",
            Type::sum(vec![
                Type::elementary(ElementaryType::String),
                Type::elementary(ElementaryType::Bool),
            ]),
            span,
        )))
        .unwrap();

    assert_eq!(module.child_count(), 2);
    assert_eq!(
        module.symbols.lookup("foo").unwrap().ty.unique_type_str(),
        "a:u32->u64"
    );
    assert!(module.symbols.lookup("flag").unwrap().ty.is_sum());
    assert!(module.symbols.lookup("flag").unwrap().backend_handle.is_none());

    let Item::Function(func) = &module.items[0] else {
        panic!("expected a function");
    };
    let kinds: Vec<_> = func.body.children().map(Statement::kind).collect();
    assert_eq!(kinds, vec![NodeKind::Return]);
}

#[test]
fn test_constructor_and_conversion_calls() {
    let span = dummy_span();
    let flag = Type::defined(
        "flag",
        Type::sum(vec![
            Type::elementary(ElementaryType::String),
            Type::elementary(ElementaryType::Bool),
        ]),
    );

    let ctor = ExprBuilder::construct(flag.clone(), vec![ExprBuilder::bool(true, span)], span);
    let tern_ast::ExprKind::Call(call) = &ctor.kind else {
        panic!("expected a call");
    };
    assert!(call.is_constructor());
    assert_eq!(call.name, "flag");
    assert_eq!(ctor.ty().unique_type_str(), "flag");

    let conv = ExprBuilder::conversion(
        ElementaryType::U64,
        ExprBuilder::ident("a", Type::elementary(ElementaryType::U32), span),
        span,
    );
    let tern_ast::ExprKind::Call(call) = &conv.kind else {
        panic!("expected a call");
    };
    assert!(call.is_explicit_conversion);
    assert_eq!(conv.ty().as_elementary(), Some(ElementaryType::U64));
}

#[test]
fn test_match_case_binding_scope() {
    let span = dummy_span();
    let i32_t = Type::elementary(ElementaryType::I32);
    let case = MatchCase::new(
        Some(i32_t.clone()),
        ExprBuilder::ident("n", i32_t, span),
        span,
    )
    .bind("n")
    .unwrap();

    assert_eq!(case.binding.as_deref(), Some("n"));
    assert_eq!(
        case.symbols.lookup("n").unwrap().ty.as_elementary(),
        Some(ElementaryType::I32)
    );
    assert_eq!(case.body.kind(), NodeKind::Identifier);
}
