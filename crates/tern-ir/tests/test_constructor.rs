//! Product and union construction tests

mod common;

use common::{count, elem, foreign, function, lower, ret, span, try_lower, type_decl};
use tern_ast::{ExprBuilder, FnDecl, Param, Statement};
use tern_core::{ElementaryType, Type};
use tern_ir::{Constant, ExprKind, Expression, Function, LType};

fn expressions(func: &Function) -> Vec<&Expression> {
    func.blocks()
        .flat_map(|block| func.block_expressions(block))
        .collect()
}

#[test]
fn test_product_constructor_writes_each_member() {
    let (pair_item, pair) = type_decl(
        "pair",
        Type::product(vec![
            Type::leaf("a", elem(ElementaryType::I32)),
            Type::leaf("b", elem(ElementaryType::String)),
        ]),
    );
    let construct = ExprBuilder::construct(
        pair.clone(),
        vec![
            ExprBuilder::int(1, elem(ElementaryType::I32), span()),
            ExprBuilder::string("x", span()),
        ],
        span(),
    );
    let rir = lower(vec![pair_item, function("make", &[], Some(pair), vec![ret(construct)])]);
    let make = rir.function("make").unwrap();
    let exprs = expressions(make);

    let members: Vec<usize> = exprs
        .iter()
        .enumerate()
        .filter(|(_, expr)| matches!(expr.kind, ExprKind::ObjMemberAt { .. }))
        .map(|(position, _)| position)
        .collect();
    assert_eq!(members.len(), 2);
    for (member, position) in members.iter().enumerate() {
        let ExprKind::ObjMemberAt { index, .. } = exprs[*position].kind else {
            unreachable!()
        };
        assert_eq!(index as usize, member);
        assert!(matches!(
            exprs[position + 1].kind,
            ExprKind::Write { memory, .. } if memory == exprs[*position].value
        ));
    }
}

#[test]
fn test_union_constructor_sets_matching_discriminant() {
    let (flag_item, flag) = type_decl(
        "flag",
        Type::sum(vec![elem(ElementaryType::String), elem(ElementaryType::Bool)]),
    );
    let body = vec![Statement::VarDecl {
        name: "f".to_string(),
        ty: flag.clone(),
        initializer: Some(ExprBuilder::construct(
            flag.clone(),
            vec![ExprBuilder::bool(true, span())],
            span(),
        )),
        span: span(),
    }];
    let rir = lower(vec![flag_item, function("main", &[], None, body)]);
    let main = rir.function("main").unwrap();
    let exprs = expressions(main);

    let discriminants: Vec<Option<Constant>> = exprs
        .iter()
        .filter_map(|expr| match expr.kind {
            ExprKind::SetUnionIdx { index, .. } => Some(main.value(index).and_then(|v| v.as_constant())),
            _ => None,
        })
        .collect();
    assert_eq!(discriminants, vec![Some(Constant::Int(1))]);

    let payloads: Vec<u32> = exprs
        .iter()
        .filter_map(|expr| match expr.kind {
            ExprKind::UnionMemberAt { index, .. } => Some(index),
            _ => None,
        })
        .collect();
    assert_eq!(payloads, vec![1]);

    let string_slot = LType::elementary(ElementaryType::String).pointer_to();
    for expr in &exprs {
        if let ExprKind::Write { memory, .. } = expr.kind {
            assert_ne!(main.value_type(memory), Some(string_slot));
        }
    }
    assert_eq!(count(main, "write"), 1);
}

#[test]
fn test_union_member_product_is_filled_in_place() {
    let i32_t = elem(ElementaryType::I32);
    let (shape_item, shape) = type_decl(
        "shape",
        Type::sum(vec![
            Type::product(vec![Type::leaf("w", i32_t.clone()), Type::leaf("h", i32_t.clone())]),
            elem(ElementaryType::F64),
        ]),
    );
    let construct = ExprBuilder::construct(
        shape.clone(),
        vec![
            ExprBuilder::int(2, i32_t.clone(), span()),
            ExprBuilder::int(3, i32_t, span()),
        ],
        span(),
    );
    let rir = lower(vec![shape_item, function("square", &[], Some(shape), vec![ret(construct)])]);
    let square = rir.function("square").unwrap();

    assert_eq!(count(square, "setunionidx"), 1);
    assert_eq!(count(square, "unionmemberat"), 1);
    assert_eq!(count(square, "objmemberat"), 2);
    // the union and its anonymous product member
    assert_eq!(rir.typedefs().count(), 2);
}

#[test]
fn test_sum_typed_argument_is_built_in_a_slot() {
    let (flag_item, flag) = type_decl(
        "flag",
        Type::sum(vec![elem(ElementaryType::String), elem(ElementaryType::Bool)]),
    );
    let show = FnDecl::new("show", vec![Param::new("f", flag.clone(), span())], None, span());
    let call = ExprBuilder::call("show", vec![ExprBuilder::bool(false, span())], show.ty(), span());
    let rir = lower(vec![
        flag_item,
        foreign("show", &[("f", flag)], None),
        function("main", &[], None, vec![Statement::Expression(call)]),
    ]);

    let show = rir.function("show").unwrap();
    assert!(show.argument_types()[0].is_pointer);
    assert!(show.argument_types()[0].is_composite());

    let main = rir.function("main").unwrap();
    assert_eq!(count(main, "alloca"), 1);
    assert_eq!(count(main, "setunionidx"), 1);
    assert_eq!(count(main, "call"), 1);
}

#[test]
fn test_union_constructor_without_matching_member_is_internal() {
    let (flag_item, flag) = type_decl(
        "flag",
        Type::sum(vec![elem(ElementaryType::String), elem(ElementaryType::Bool)]),
    );
    let construct = ExprBuilder::construct(
        flag.clone(),
        vec![ExprBuilder::int(7, elem(ElementaryType::I32), span())],
        span(),
    );
    let result = try_lower(vec![flag_item, function("make", &[], Some(flag), vec![ret(construct)])]);
    let err = result.unwrap_err();
    assert!(err.is_internal());
    assert!(err.to_string().contains("no member of"));
}
