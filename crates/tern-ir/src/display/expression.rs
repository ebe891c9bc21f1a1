//! Instruction rendering.

use crate::{ExprKind, Expression, Function, Rir, ValueId};

impl Function {
    /// Renders one instruction, e.g. `$3 = add($1, $2)` or `write($0, $3)`.
    ///
    /// The `$n = ` prefix is omitted when the instruction yields nothing.
    #[must_use]
    pub fn expression_string(&self, expr: &Expression, rir: &Rir) -> String {
        let operand = |value: ValueId| self.value(value).map_or("?", |v| v.id()).to_string();
        let args: Vec<String> = match &expr.kind {
            ExprKind::Alloca { ty, count } => vec![rir.type_str(*ty), count.to_string()],
            ExprKind::ObjMemberAt { object, index } => vec![operand(*object), index.to_string()],
            ExprKind::UnionMemberAt { target, index } => vec![operand(*target), index.to_string()],
            ExprKind::Convert { value, to } => vec![operand(*value), rir.type_str(*to)],
            ExprKind::Call { name, args } => std::iter::once(name.clone())
                .chain(args.iter().map(|arg| operand(*arg)))
                .collect(),
            other => other.operands().into_iter().map(operand).collect(),
        };

        let body = format!("{}({})", expr.kind.mnemonic(), args.join(", "));
        if expr.value == self.nil_value() {
            body
        } else {
            format!("{} = {body}", operand(expr.value))
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{ExprKind, Expression, Function, LType, Rir, ValueId};
    use tern_core::ElementaryType;

    #[test]
    fn test_nil_result_has_no_prefix() {
        let rir = Rir::new("test");
        let func = Function::definition(
            "f",
            vec![LType::elementary(ElementaryType::I32).pointer_to(), LType::elementary(ElementaryType::I32)],
            LType::nil(),
        )
        .unwrap();
        let write = Expression {
            kind: ExprKind::Write {
                memory: ValueId(1),
                value: ValueId(2),
            },
            value: func.nil_value(),
        };
        assert_eq!(func.expression_string(&write, &rir), "write($0, $1)");
    }
}
