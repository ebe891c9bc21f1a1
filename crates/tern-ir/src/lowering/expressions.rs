//! Expression lowering.

use std::slice;
use std::sync::Arc;

use tern_ast::{BinaryOperator, Call, Constant as AstConstant, Expr, ExprKind as AstExprKind};
use tern_core::{ElementaryType, Result, Type};

use crate::lowering::context::FunctionLowering;
use crate::{ArithOp, CmpOp, Constant, ExprKind, LType, LogicOp, Value, ValueId, invariant};

enum BinaryClass {
    Arith(ArithOp),
    Cmp(CmpOp),
    Logic(LogicOp),
}

const fn classify(op: BinaryOperator) -> BinaryClass {
    match op {
        BinaryOperator::Add => BinaryClass::Arith(ArithOp::Add),
        BinaryOperator::Subtract => BinaryClass::Arith(ArithOp::Sub),
        BinaryOperator::Multiply => BinaryClass::Arith(ArithOp::Mul),
        BinaryOperator::Divide => BinaryClass::Arith(ArithOp::Div),
        BinaryOperator::Equal => BinaryClass::Cmp(CmpOp::Eq),
        BinaryOperator::NotEqual => BinaryClass::Cmp(CmpOp::Ne),
        BinaryOperator::Less => BinaryClass::Cmp(CmpOp::Lt),
        BinaryOperator::LessEqual => BinaryClass::Cmp(CmpOp::Le),
        BinaryOperator::Greater => BinaryClass::Cmp(CmpOp::Gt),
        BinaryOperator::GreaterEqual => BinaryClass::Cmp(CmpOp::Ge),
        BinaryOperator::And => BinaryClass::Logic(LogicOp::And),
        BinaryOperator::Or => BinaryClass::Logic(LogicOp::Or),
    }
}

impl FunctionLowering<'_> {
    /// Lowers an expression and returns the value holding its result.
    ///
    /// Composite results are returned by address.
    pub(crate) fn lower_expr(&mut self, expr: &Expr) -> Result<ValueId> {
        match &expr.kind {
            AstExprKind::Constant(constant) => self.lower_constant(*constant, &expr.ty),

            AstExprKind::StringLiteral(content) => {
                let global_id = self.rir.intern_literal(content)?;
                let global = self
                    .rir
                    .global_by_id(global_id)
                    .ok_or_else(|| invariant(format!("literal #{} was not interned", global_id.0)))?;
                self.func.literal(global_id, global)
            }

            AstExprKind::Identifier(name) => {
                let slot = self.lookup_variable(name)?.slot;
                self.load(slot)
            }

            AstExprKind::Binary { op, left, right } => self.lower_binary(*op, left, right, &expr.ty),

            AstExprKind::Call(call) => self.lower_call(call, &expr.ty),

            AstExprKind::Match(m) => self.lower_match(m, &expr.ty),
        }
    }

    /// Constants take the type the analyzer gave them when it is elementary,
    /// their default type otherwise.
    fn lower_constant(&mut self, constant: AstConstant, ty: &Type) -> Result<ValueId> {
        let constant = match constant {
            AstConstant::Integer(v) => Constant::Int(v),
            AstConstant::Float(v) => Constant::Float(v),
            AstConstant::Boolean(v) => Constant::Bool(v),
        };
        let typed = ty
            .as_elementary()
            .and_then(|etype| constant.retyped(etype).map(|c| (c, etype)));
        match typed {
            Some((constant, etype)) => self.func.constant(constant, etype),
            None => self.func.constant(constant, constant.default_type()),
        }
    }

    fn lower_binary(
        &mut self,
        op: BinaryOperator,
        left: &Expr,
        right: &Expr,
        ty: &Type,
    ) -> Result<ValueId> {
        let lhs = self.lower_expr(left)?;
        let rhs = self.lower_expr(right)?;
        match classify(op) {
            BinaryClass::Arith(op) => {
                let target = self.lower_type(ty)?;
                let left = self.maybe_convert(lhs, target)?;
                let right = self.maybe_convert(rhs, target)?;
                self.emit(ExprKind::Arith { op, left, right })
            }
            BinaryClass::Cmp(op) => {
                let common = self.comparison_type(lhs, rhs)?;
                let left = self.maybe_convert(lhs, common)?;
                let right = self.maybe_convert(rhs, common)?;
                self.emit(ExprKind::Cmp { op, left, right })
            }
            BinaryClass::Logic(op) => {
                let boolean = LType::elementary(ElementaryType::Bool);
                let left = self.maybe_convert(lhs, boolean)?;
                let right = self.maybe_convert(rhs, boolean)?;
                self.emit(ExprKind::Logic { op, left, right })
            }
        }
    }

    /// Operand type of a comparison. A constant that fits adapts to the other
    /// side, otherwise the wider operand wins.
    fn comparison_type(&self, lhs: ValueId, rhs: ValueId) -> Result<LType> {
        let left = self.value_type(lhs)?;
        let right = self.value_type(rhs)?;
        if self.constant_fits(rhs, left) {
            return Ok(left);
        }
        if self.constant_fits(lhs, right) {
            return Ok(right);
        }
        let width = |ty: LType| {
            ty.as_elementary()
                .and_then(ElementaryType::bit_width)
                .unwrap_or(0)
        };
        Ok(if width(right) > width(left) { right } else { left })
    }

    fn constant_fits(&self, value: ValueId, target: LType) -> bool {
        let constant = self.func.value(value).and_then(Value::as_constant);
        match (constant, target.as_elementary()) {
            (Some(constant), Some(etype)) if !target.is_pointer => {
                constant.retyped(etype).is_some()
            }
            _ => false,
        }
    }

    /// Lowers a call, a constructor call, or an explicit conversion.
    fn lower_call(&mut self, call: &Call, ty: &Arc<Type>) -> Result<ValueId> {
        if call.is_explicit_conversion {
            let [arg] = call.args.as_slice() else {
                return Err(invariant(format!(
                    "conversion to '{}' takes one argument, got {}",
                    call.name,
                    call.args.len()
                )));
            };
            let target = self.lower_type(ty)?;
            let value = self.lower_expr(arg)?;
            return self.maybe_convert(value, target);
        }

        if call.is_constructor() {
            return self.lower_constructor(ty, &call.args);
        }

        let mut args = Vec::with_capacity(call.args.len());
        for (position, arg) in call.args.iter().enumerate() {
            let param = call.param_type(position).ok_or_else(|| {
                invariant(format!(
                    "call to '{}' passes {} arguments, parameter {position} is unknown",
                    call.name,
                    call.args.len()
                ))
            })?;
            let value = if param.is_sum() && !arg.ty.structurally_equals(param) {
                self.lower_sum_argument(param, arg)?
            } else {
                let expected = self.lower_type(param)?;
                let expected = if expected.is_composite() {
                    expected.pointer_to()
                } else {
                    expected
                };
                let value = self.lower_expr(arg)?;
                self.maybe_convert(value, expected)?
            };
            args.push(value);
        }

        let result = self.emit(ExprKind::Call {
            name: call.name.clone(),
            args,
        })?;
        if result == self.func.nil_value() {
            return Ok(result);
        }
        let result_type = self.value_type(result)?;
        if result_type.is_composite() {
            let slot = self.alloca(result_type)?;
            self.store(slot, result)?;
            return Ok(slot);
        }
        Ok(result)
    }

    /// Builds a union in a fresh slot from one of its members.
    fn lower_sum_argument(&mut self, param: &Arc<Type>, arg: &Expr) -> Result<ValueId> {
        let lowered = self.lower_type(param)?;
        let slot = self.alloca(lowered)?;
        self.populate(slot, param, slice::from_ref(arg))?;
        Ok(slot)
    }
}
