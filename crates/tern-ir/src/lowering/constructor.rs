//! Construction of composite values in memory.
//!
//! A constructor call allocates a slot and fills it in place. Products get
//! one `objmemberat` + `write` per member. Unions get their discriminant
//! set with `setunionidx` and the payload of the selected member filled
//! through `unionmemberat`; the payload may itself be a product, which is
//! filled recursively.

use std::sync::Arc;

use tern_ast::Expr;
use tern_core::{ElementaryType, Result, Type};

use crate::lowering::context::FunctionLowering;
use crate::{Constant, ExprKind, ValueId, invariant};

impl FunctionLowering<'_> {
    /// Allocates a slot of type `ty` and builds the value from `args` in it.
    pub(crate) fn lower_constructor(&mut self, ty: &Arc<Type>, args: &[Expr]) -> Result<ValueId> {
        let lowered = self.lower_type(ty)?;
        let slot = self.alloca(lowered)?;
        self.populate(slot, ty, args)?;
        Ok(slot)
    }

    /// Fills the memory `memory` points to with a value of `ty` built from
    /// `args`.
    pub(crate) fn populate(&mut self, memory: ValueId, ty: &Arc<Type>, args: &[Expr]) -> Result<()> {
        if let [arg] = args {
            if arg.ty.structurally_equals(ty) {
                let value = self.lower_expr(arg)?;
                return self.store(memory, value);
            }
        }

        if ty.is_sum() {
            let members = ty.members();
            let (index, member) = matched_member(&members, args).ok_or_else(|| {
                invariant(format!(
                    "no member of '{ty}' can be built from ({})",
                    args.iter()
                        .map(|arg| arg.ty.unique_type_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })?;
            let discriminant = self
                .func
                .constant(Constant::Int(index as i64), ElementaryType::I64)?;
            self.emit(ExprKind::SetUnionIdx {
                target: memory,
                index: discriminant,
            })?;
            let payload = self.emit(ExprKind::UnionMemberAt {
                target: memory,
                index: member_index(index)?,
            })?;
            return self.populate(payload, member, args);
        }

        if ty.is_composite() {
            return self.populate_members(memory, ty, args);
        }

        match args {
            [arg] => {
                let value = self.lower_expr(arg)?;
                self.store(memory, value)
            }
            _ => Err(invariant(format!(
                "'{ty}' cannot be built from {} arguments",
                args.len()
            ))),
        }
    }

    /// Fills a product member by member, evaluating each argument first.
    fn populate_members(&mut self, memory: ValueId, ty: &Type, args: &[Expr]) -> Result<()> {
        let count = ty.members().len();
        if count != args.len() {
            return Err(invariant(format!(
                "'{ty}' has {count} members, constructor got {} arguments",
                args.len()
            )));
        }
        for (index, arg) in args.iter().enumerate() {
            let value = self.lower_expr(arg)?;
            let slot = self.emit(ExprKind::ObjMemberAt {
                object: memory,
                index: member_index(index)?,
            })?;
            self.store(slot, value)?;
        }
        Ok(())
    }
}

/// First member of a sum that `args` can build: a member of the same type
/// as a single argument, or a product whose operands match the arguments
/// one by one.
fn matched_member<'t>(members: &[&'t Arc<Type>], args: &[Expr]) -> Option<(usize, &'t Arc<Type>)> {
    members
        .iter()
        .enumerate()
        .find(|(_, member)| builds(member, args))
        .map(|(index, member)| (index, *member))
}

fn builds(member: &Type, args: &[Expr]) -> bool {
    if let [arg] = args {
        if arg.ty.structurally_equals(member) {
            return true;
        }
    }
    if !member.is_product() {
        return false;
    }
    let operands = member.members();
    operands.len() == args.len()
        && operands
            .iter()
            .zip(args)
            .all(|(operand, arg)| arg.ty.structurally_equals(operand))
}

fn member_index(index: usize) -> Result<u32> {
    u32::try_from(index).map_err(|_| invariant(format!("member index {index} out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tern_ast::ExprBuilder;
    use tern_core::Span;

    fn elem(etype: ElementaryType) -> Arc<Type> {
        Type::elementary(etype)
    }

    #[test]
    fn test_matched_member_by_single_argument() {
        let sum = Type::sum(vec![elem(ElementaryType::String), elem(ElementaryType::Bool)]);
        let members = sum.members();
        let args = [ExprBuilder::bool(true, Span::default())];
        let (index, member) = matched_member(&members, &args).unwrap();
        assert_eq!(index, 1);
        assert!(member.structurally_equals(&elem(ElementaryType::Bool)));
    }

    #[test]
    fn test_matched_member_by_product_operands() {
        let pair = Type::product(vec![
            Type::leaf("a", elem(ElementaryType::I32)),
            Type::leaf("b", elem(ElementaryType::String)),
        ]);
        let sum = Type::sum(vec![elem(ElementaryType::I32), pair]);
        let members = sum.members();
        let args = [
            ExprBuilder::int(1, elem(ElementaryType::I32), Span::default()),
            ExprBuilder::string("x", Span::default()),
        ];
        assert_eq!(matched_member(&members, &args).map(|(i, _)| i), Some(1));

        let args = [ExprBuilder::bool(false, Span::default())];
        assert!(matched_member(&members, &args).is_none());
    }
}
