//! Helper functions for creating analyzed expressions.

use std::sync::Arc;

use tern_core::{ElementaryType, Span, Type};

use crate::{BinaryOperator, Call, Constant, Expr, ExprKind, MatchCase, MatchExpr};

/// Helper functions for creating analyzed expressions
pub struct ExprBuilder;

impl ExprBuilder {
    /// Creates an integer constant of the given numeric type
    #[must_use]
    pub fn int(value: i64, ty: Arc<Type>, span: Span) -> Expr {
        Expr {
            kind: ExprKind::Constant(Constant::Integer(value)),
            ty,
            span,
        }
    }

    /// Creates a float constant of the given numeric type
    #[must_use]
    pub fn float(value: f64, ty: Arc<Type>, span: Span) -> Expr {
        Expr {
            kind: ExprKind::Constant(Constant::Float(value)),
            ty,
            span,
        }
    }

    /// Creates a boolean constant
    #[must_use]
    pub fn bool(value: bool, span: Span) -> Expr {
        Expr {
            kind: ExprKind::Constant(Constant::Boolean(value)),
            ty: Type::elementary(ElementaryType::Bool),
            span,
        }
    }

    /// Creates a string literal
    #[must_use]
    pub fn string(value: impl Into<String>, span: Span) -> Expr {
        Expr {
            kind: ExprKind::StringLiteral(value.into()),
            ty: Type::elementary(ElementaryType::String),
            span,
        }
    }

    /// Creates a reference to a variable or parameter
    #[must_use]
    pub fn ident(name: impl Into<String>, ty: Arc<Type>, span: Span) -> Expr {
        Expr {
            kind: ExprKind::Identifier(name.into()),
            ty,
            span,
        }
    }

    /// Creates a binary operation
    #[must_use]
    pub fn binary(
        op: BinaryOperator,
        left: Expr,
        right: Expr,
        result_type: Arc<Type>,
        span: Span,
    ) -> Expr {
        Expr {
            kind: ExprKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            ty: result_type,
            span,
        }
    }

    /// Creates a call to a function whose type is `callee`
    #[must_use]
    pub fn call(name: impl Into<String>, args: Vec<Expr>, callee: Arc<Type>, span: Span) -> Expr {
        let ty = match callee.strip_leaf() {
            Type::Operator { operands, .. } if operands.len() == 2 => operands[1].clone(),
            _ => Type::elementary(ElementaryType::Nil),
        };
        Expr {
            kind: ExprKind::Call(Call {
                name: name.into(),
                args,
                callee,
                is_explicit_conversion: false,
            }),
            ty,
            span,
        }
    }

    /// Creates a constructor call for the defined type `ty`
    #[must_use]
    pub fn construct(ty: Arc<Type>, args: Vec<Expr>, span: Span) -> Expr {
        let name = ty.unique_type_str();
        Expr {
            kind: ExprKind::Call(Call {
                name,
                args,
                callee: ty.clone(),
                is_explicit_conversion: false,
            }),
            ty,
            span,
        }
    }

    /// Creates an explicit conversion such as `u64(a)`
    #[must_use]
    pub fn conversion(target: ElementaryType, arg: Expr, span: Span) -> Expr {
        let ty = Type::elementary(target);
        Expr {
            kind: ExprKind::Call(Call {
                name: target.name().to_string(),
                callee: Type::implication(arg.ty.clone(), ty.clone()),
                args: vec![arg],
                is_explicit_conversion: true,
            }),
            ty,
            span,
        }
    }

    /// Creates a match expression
    #[must_use]
    pub fn match_expr(
        scrutinee: Expr,
        cases: Vec<MatchCase>,
        result_type: Arc<Type>,
        span: Span,
    ) -> Expr {
        Expr {
            kind: ExprKind::Match(MatchExpr {
                scrutinee: Box::new(scrutinee),
                cases,
            }),
            ty: result_type,
            span,
        }
    }
}
