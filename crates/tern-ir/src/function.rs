//! Functions: declarations and definitions with their blocks.

use rustc_hash::FxHashMap;
use tern_core::{ElementaryType, Error, Result};

use crate::{
    Block, BlockExit, BlockId, Constant, ExprId, ExprKind, Expression, Global, GlobalId,
    IdentifierMap, LType, Rir, RirObject, TypeDef, Value, ValueId, ValueKind, VariableOrigin,
    invariant,
};

/// Every function keeps its nil value at the start of the value table.
const NIL: ValueId = ValueId(0);

/// A function of the unit.
///
/// A function without blocks is a plain declaration, e.g. of a foreign
/// function. A definition owns its blocks, instructions, and values; the
/// handles it hands out are only meaningful within it.
#[derive(Debug, Clone)]
pub struct Function {
    name: String,
    arguments: Vec<LType>,
    return_type: LType,
    /// Blocks in layout order, `None` for plain declarations
    layout: Option<Vec<BlockId>>,
    blocks: Vec<Block>,
    expressions: Vec<Expression>,
    values: Vec<Value>,
    map: IdentifierMap,
    argument_values: Vec<ValueId>,
    end_label: Option<ValueId>,
    return_slot: Option<ValueId>,
    literal_values: FxHashMap<GlobalId, ValueId>,
    expression_idx: u32,
    label_idx: u32,
}

impl Function {
    /// Creates a plain declaration.
    #[must_use]
    pub fn declaration(name: impl Into<String>, arguments: Vec<LType>, return_type: LType) -> Self {
        Self {
            name: name.into(),
            arguments,
            return_type,
            layout: None,
            blocks: Vec::new(),
            expressions: Vec::new(),
            values: vec![Value::nil()],
            map: IdentifierMap::new(),
            argument_values: Vec::new(),
            end_label: None,
            return_slot: None,
            literal_values: FxHashMap::default(),
            expression_idx: 0,
            label_idx: 0,
        }
    }

    /// Creates a definition without blocks yet.
    ///
    /// The arguments become the first values of the function, `$0` to
    /// `$N-1`, typed from `arguments`.
    pub fn definition(
        name: impl Into<String>,
        arguments: Vec<LType>,
        return_type: LType,
    ) -> Result<Self> {
        let mut func = Self::declaration(name, arguments, return_type);
        func.layout = Some(Vec::new());
        for (position, ty) in func.arguments.clone().into_iter().enumerate() {
            let id = func.next_variable_id();
            func.map.insert(id.clone(), RirObject::Argument(position))?;
            let value = func.push_value(Value {
                kind: ValueKind::Variable(VariableOrigin::Argument(position)),
                ty: Some(ty),
                id,
            })?;
            func.argument_values.push(value);
        }
        Ok(func)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn argument_types(&self) -> &[LType] {
        &self.arguments
    }

    pub fn argument_count(&self) -> usize {
        self.arguments.len()
    }

    pub const fn return_type(&self) -> LType {
        self.return_type
    }

    pub const fn is_plain_declaration(&self) -> bool {
        self.layout.is_none()
    }

    /// Block handles in layout order; empty for plain declarations
    pub fn block_ids(&self) -> &[BlockId] {
        self.layout.as_deref().unwrap_or_default()
    }

    /// Blocks in layout order
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.block_ids().iter().filter_map(|id| self.blocks.get(id.index()))
    }

    pub fn block_by_id(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(id.index())
    }

    /// Finds a block by its label, e.g. `%label_1`
    pub fn block(&self, label: &str) -> Option<&Block> {
        match self.map.get(label)? {
            RirObject::Block(id) => self.block_by_id(id),
            _ => None,
        }
    }

    /// The block a label value names
    pub fn label_target(&self, label: ValueId) -> Option<BlockId> {
        self.value(label)?.as_label()
    }

    pub fn expression(&self, id: ExprId) -> Option<&Expression> {
        self.expressions.get(id.index())
    }

    /// Instructions of a block in execution order, excluding its exit
    pub fn block_expressions<'a>(&'a self, block: &'a Block) -> impl Iterator<Item = &'a Expression> {
        block
            .expressions()
            .iter()
            .filter_map(|id| self.expressions.get(id.index()))
    }

    pub fn value(&self, id: ValueId) -> Option<&Value> {
        self.values.get(id.index())
    }

    pub fn value_type(&self, id: ValueId) -> Option<LType> {
        self.value(id)?.ty
    }

    pub fn value_count(&self) -> usize {
        self.values.len()
    }

    pub const fn nil_value(&self) -> ValueId {
        NIL
    }

    pub fn argument_value(&self, position: usize) -> Option<ValueId> {
        self.argument_values.get(position).copied()
    }

    /// Position of the argument `value` stands for, if any
    pub fn value_to_argnum(&self, value: ValueId) -> Option<usize> {
        match self.value(value)?.kind {
            ValueKind::Variable(VariableOrigin::Argument(position)) => Some(position),
            _ => None,
        }
    }

    pub const fn end_label(&self) -> Option<ValueId> {
        self.end_label
    }

    /// Slot every `return` writes into, for functions returning a value
    pub const fn return_slot(&self) -> Option<ValueId> {
        self.return_slot
    }

    pub fn identifiers(&self) -> &IdentifierMap {
        &self.map
    }

    pub(crate) fn set_end_label(&mut self, label: ValueId) {
        self.end_label = Some(label);
    }

    pub(crate) fn set_return_slot(&mut self, slot: ValueId) {
        self.return_slot = Some(slot);
    }

    fn next_variable_id(&mut self) -> String {
        let id = format!("${}", self.expression_idx);
        self.expression_idx += 1;
        id
    }

    fn push_value(&mut self, value: Value) -> Result<ValueId> {
        let id = ValueId::from_index(self.values.len())?;
        self.values.push(value);
        Ok(id)
    }

    /// Creates a block and its label. The block is not placed in the layout
    /// until [`append_block`](Self::append_block).
    pub(crate) fn new_block(&mut self) -> Result<BlockId> {
        if self.is_plain_declaration() {
            return Err(invariant(format!(
                "cannot create a block in plain declaration '{}'",
                self.name
            )));
        }
        let block = BlockId::from_index(self.blocks.len())?;
        let id = format!("%label_{}", self.label_idx);
        self.label_idx += 1;
        self.map.insert(id.clone(), RirObject::Block(block))?;
        let label = self.push_value(Value {
            kind: ValueKind::Label(block),
            ty: None,
            id,
        })?;
        self.blocks.push(Block::new(label));
        Ok(block)
    }

    pub(crate) fn append_block(&mut self, block: BlockId) -> Result<()> {
        let Some(layout) = self.layout.as_mut() else {
            return Err(invariant(format!(
                "cannot append a block to plain declaration '{}'",
                self.name
            )));
        };
        if layout.contains(&block) {
            return Err(invariant(format!(
                "block #{} appended twice to '{}'",
                block.0, self.name
            )));
        }
        layout.push(block);
        Ok(())
    }

    pub(crate) fn label_of(&self, block: BlockId) -> Result<ValueId> {
        self.block_by_id(block)
            .map(Block::label)
            .ok_or_else(|| invariant(format!("unknown block #{} in '{}'", block.0, self.name)))
    }

    /// Creates a constant of type `etype`. Constants are not registered in
    /// the identifier map.
    pub(crate) fn constant(&mut self, constant: Constant, etype: ElementaryType) -> Result<ValueId> {
        self.push_value(Value {
            kind: ValueKind::Constant(constant),
            ty: Some(LType::elementary(etype)),
            id: constant.to_string(),
        })
    }

    /// Value referring to a global literal, one per literal and function
    pub(crate) fn literal(&mut self, global_id: GlobalId, global: &Global) -> Result<ValueId> {
        if let Some(value) = self.literal_values.get(&global_id) {
            return Ok(*value);
        }
        let value = self.push_value(Value {
            kind: ValueKind::Literal {
                global: global_id,
                content: global.content.clone(),
            },
            ty: Some(global.ty),
            id: global.name.clone(),
        })?;
        self.literal_values.insert(global_id, value);
        Ok(value)
    }

    fn open_block(&mut self, block: BlockId) -> Result<&mut Block> {
        let name = &self.name;
        let target = self
            .blocks
            .get_mut(block.index())
            .ok_or_else(|| invariant(format!("unknown block #{} in '{name}'", block.0)))?;
        if target.is_terminated() {
            return Err(invariant(format!(
                "cannot append to block #{} of '{name}' after its terminator",
                block.0
            )));
        }
        Ok(target)
    }

    /// Appends an instruction to `block` and returns the value it produces.
    ///
    /// # Errors
    /// An internal error if the block is already terminated or the operands
    /// do not fit the instruction.
    pub(crate) fn push_expression(
        &mut self,
        block: BlockId,
        kind: ExprKind,
        rir: &Rir,
    ) -> Result<ValueId> {
        if kind.is_terminator() {
            return Err(invariant(format!(
                "'{}' must be added as a block exit",
                kind.mnemonic()
            )));
        }
        self.open_block(block)?;
        let ty = self.result_type(&kind, rir)?;
        let expr = self.new_expression(kind, ty)?;
        log::trace!(
            "{}: {} -> {}",
            self.name,
            self.expressions[expr.index()].kind.mnemonic(),
            self.values[self.expressions[expr.index()].value.index()].id
        );
        self.open_block(block)?.expressions.push(expr);
        Ok(self.expressions[expr.index()].value)
    }

    fn new_expression(&mut self, kind: ExprKind, ty: Option<LType>) -> Result<ExprId> {
        let expr = ExprId::from_index(self.expressions.len())?;
        let value = match ty {
            Some(ty) => {
                let id = self.next_variable_id();
                self.map.insert(id.clone(), RirObject::Expression(expr))?;
                self.push_value(Value {
                    kind: ValueKind::Variable(VariableOrigin::Expression(expr)),
                    ty: Some(ty),
                    id,
                })?
            }
            None => NIL,
        };
        self.expressions.push(Expression { kind, value });
        Ok(expr)
    }

    /// Terminates `block` with a branch or the unreachable marker.
    pub(crate) fn set_exit(&mut self, block: BlockId, exit: BlockExit) -> Result<()> {
        match exit {
            BlockExit::Branch { dst } => self.expect_label(dst)?,
            BlockExit::CondBranch {
                cond,
                taken,
                fallthrough,
            } => {
                if !self.operand_type(cond)?.is_bool() {
                    return Err(invariant(format!(
                        "condition '{}' of '{}' is not a bool",
                        self.values[cond.index()].id,
                        self.name
                    )));
                }
                self.expect_label(taken)?;
                self.expect_label(fallthrough)?;
            }
            BlockExit::Return(_) | BlockExit::Unreachable => {}
        }
        self.open_block(block)?.exit = Some(exit);
        Ok(())
    }

    /// Terminates `block` with `return`.
    pub(crate) fn set_return(&mut self, block: BlockId, value: Option<ValueId>, rir: &Rir) -> Result<()> {
        self.open_block(block)?;
        let kind = ExprKind::Return { value };
        self.result_type(&kind, rir)?;
        let expr = self.new_expression(kind, None)?;
        self.set_exit(block, BlockExit::Return(expr))
    }

    fn expect_label(&self, value: ValueId) -> Result<()> {
        match self.value(value) {
            Some(v) if v.as_label().is_some() => Ok(()),
            _ => Err(invariant(format!(
                "branch target #{} of '{}' is not a label",
                value.0, self.name
            ))),
        }
    }

    /// Type of an operand; nil values and labels have none.
    pub(crate) fn operand_type(&self, value: ValueId) -> Result<LType> {
        let v = self
            .value(value)
            .ok_or_else(|| invariant(format!("unknown value #{} in '{}'", value.0, self.name)))?;
        v.ty.ok_or_else(|| {
            invariant(format!(
                "value '{}' of '{}' cannot be used as an operand",
                v.id, self.name
            ))
        })
    }

    fn value_name(&self, value: ValueId) -> &str {
        self.value(value).map_or("?", Value::id)
    }

    /// The typedef a composite pointer operand points to
    fn composite_operand<'r>(&self, value: ValueId, rir: &'r Rir, op: &str) -> Result<&'r TypeDef> {
        let ty = self.operand_type(value)?;
        let typedef = ty
            .typedef()
            .filter(|_| ty.is_pointer)
            .and_then(|id| rir.typedef_by_id(id));
        typedef.ok_or_else(|| {
            invariant(format!(
                "{op} in '{}' expects a pointer to a composite, '{}' is {}",
                self.name,
                self.value_name(value),
                rir.type_str(ty)
            ))
        })
    }

    /// Computes the type of the value an instruction produces, checking its
    /// operands on the way.
    fn result_type(&self, kind: &ExprKind, rir: &Rir) -> Result<Option<LType>> {
        let op = kind.mnemonic();
        match kind {
            ExprKind::Alloca { ty, count } => {
                if ty.is_pointer || *count == 0 {
                    return Err(invariant(format!(
                        "invalid alloca of {count} x {} in '{}'",
                        rir.type_str(*ty),
                        self.name
                    )));
                }
                Ok(Some(ty.pointer_to()))
            }
            ExprKind::Read { memory } => {
                let ty = self.operand_type(*memory)?;
                if !ty.is_pointer {
                    return Err(invariant(format!(
                        "tried to read from '{}' in '{}', which is not in memory",
                        self.value_name(*memory),
                        self.name
                    )));
                }
                Ok(Some(ty.pointee()))
            }
            ExprKind::Write { memory, value } => {
                let dst = self.operand_type(*memory)?;
                let src = self.operand_type(*value)?;
                if !dst.is_pointer || !src.identical(&dst.pointee()) {
                    return Err(invariant(format!(
                        "cannot write '{}' of type {} into '{}' of type {} in '{}'",
                        self.value_name(*value),
                        rir.type_str(src),
                        self.value_name(*memory),
                        rir.type_str(dst),
                        self.name
                    )));
                }
                Ok(None)
            }
            ExprKind::ObjMemberAt { object, index } => {
                let typedef = self.composite_operand(*object, rir, op)?;
                if typedef.is_union {
                    return Err(invariant(format!(
                        "objmemberat on union '{}' in '{}'",
                        typedef.name, self.name
                    )));
                }
                self.member_pointer(typedef, *index)
            }
            ExprKind::UnionMemberAt { target, index } => {
                let typedef = self.union_operand(*target, rir, op)?;
                self.member_pointer(typedef, *index)
            }
            ExprKind::SetUnionIdx { target, index } => {
                let typedef = self.union_operand(*target, rir, op)?;
                let idx_ty = self.operand_type(*index)?;
                let in_range = match self.value(*index).and_then(Value::as_constant) {
                    Some(Constant::Int(i)) => usize::try_from(i).is_ok_and(|i| i < typedef.member_count()),
                    _ => true,
                };
                if idx_ty.is_pointer || !idx_ty.as_elementary().is_some_and(ElementaryType::is_integer) || !in_range {
                    return Err(invariant(format!(
                        "invalid discriminant '{}' for union '{}' in '{}'",
                        self.value_name(*index),
                        typedef.name,
                        self.name
                    )));
                }
                Ok(None)
            }
            ExprKind::GetUnionIdx { target } => {
                self.union_operand(*target, rir, op)?;
                Ok(Some(LType::elementary(ElementaryType::I64)))
            }
            ExprKind::Convert { value, to } => {
                let from = self.operand_type(*value)?;
                if from.is_pointer || to.is_pointer || !from.is_elementary() || !to.is_elementary() {
                    return Err(invariant(format!(
                        "cannot convert '{}' from {} to {} in '{}'",
                        self.value_name(*value),
                        rir.type_str(from),
                        rir.type_str(*to),
                        self.name
                    )));
                }
                Ok(Some(*to))
            }
            ExprKind::Call { name, args } => {
                let callee = rir.function(name).ok_or_else(|| {
                    invariant(format!("call to undeclared function '{name}' in '{}'", self.name))
                })?;
                if callee.argument_count() != args.len() {
                    return Err(invariant(format!(
                        "'{name}' takes {} arguments but {} were passed in '{}'",
                        callee.argument_count(),
                        args.len(),
                        self.name
                    )));
                }
                for (arg, expected) in args.iter().zip(callee.argument_types()) {
                    let actual = self.operand_type(*arg)?;
                    if !actual.identical(expected) {
                        return Err(invariant(format!(
                            "argument '{}' of call to '{name}' has type {}, expected {}",
                            self.value_name(*arg),
                            rir.type_str(actual),
                            rir.type_str(*expected)
                        )));
                    }
                }
                let ret = callee.return_type();
                Ok((!ret.is_nil()).then_some(ret))
            }
            ExprKind::Arith { left, right, .. } => {
                let l = self.operand_type(*left)?;
                let r = self.operand_type(*right)?;
                if !l.is_numeric() || !l.identical(&r) {
                    return Err(self.mismatched_operands(op, *left, *right, rir));
                }
                Ok(Some(l))
            }
            ExprKind::Cmp { left, right, .. } => {
                let l = self.operand_type(*left)?;
                let r = self.operand_type(*right)?;
                if l.is_pointer || !l.is_elementary() || !l.identical(&r) {
                    return Err(self.mismatched_operands(op, *left, *right, rir));
                }
                Ok(Some(LType::elementary(ElementaryType::Bool)))
            }
            ExprKind::Logic { left, right, .. } => {
                let l = self.operand_type(*left)?;
                let r = self.operand_type(*right)?;
                if !l.is_bool() || !r.is_bool() {
                    return Err(self.mismatched_operands(op, *left, *right, rir));
                }
                Ok(Some(l))
            }
            ExprKind::Return { value } => {
                let returned = value.map(|v| self.operand_type(v)).transpose()?;
                let valid = match returned {
                    Some(ty) => ty.identical(&self.return_type),
                    None => self.return_type.is_nil(),
                };
                if !valid {
                    return Err(invariant(format!(
                        "return in '{}' does not match its return type {}",
                        self.name,
                        rir.type_str(self.return_type)
                    )));
                }
                Ok(None)
            }
        }
    }

    fn union_operand<'r>(&self, value: ValueId, rir: &'r Rir, op: &str) -> Result<&'r TypeDef> {
        let typedef = self.composite_operand(value, rir, op)?;
        if !typedef.is_union {
            return Err(invariant(format!(
                "{op} on non-union '{}' in '{}'",
                typedef.name, self.name
            )));
        }
        Ok(typedef)
    }

    fn member_pointer(&self, typedef: &TypeDef, index: u32) -> Result<Option<LType>> {
        let member = typedef.member(index).ok_or_else(|| {
            invariant(format!(
                "member index {index} out of range for '{}' ({} members) in '{}'",
                typedef.name,
                typedef.member_count(),
                self.name
            ))
        })?;
        Ok(Some(member.ty.pointer_to()))
    }

    fn mismatched_operands(&self, op: &str, left: ValueId, right: ValueId, rir: &Rir) -> Error {
        let show = |v: ValueId| {
            self.value_type(v)
                .map_or_else(|| "nothing".to_string(), |ty| rir.type_str(ty))
        };
        invariant(format!(
            "mismatched operands of {op} in '{}': '{}' is {}, '{}' is {}",
            self.name,
            self.value_name(left),
            show(left),
            self.value_name(right),
            show(right)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u32_t() -> LType {
        LType::elementary(ElementaryType::U32)
    }

    #[test]
    fn test_arguments_are_first_values() {
        let func = Function::definition(
            "boo",
            vec![u32_t(), LType::elementary(ElementaryType::String)],
            LType::nil(),
        )
        .unwrap();
        assert_eq!(func.argument_count(), 2);
        let first = func.argument_value(0).unwrap();
        assert_eq!(func.value(first).unwrap().id(), "$0");
        assert_eq!(func.value_to_argnum(func.argument_value(1).unwrap()), Some(1));
        assert_eq!(
            func.identifiers().get("$1"),
            Some(RirObject::Argument(1))
        );
    }

    #[test]
    fn test_read_requires_pointer() {
        let rir = Rir::new("test");
        let mut func = Function::definition("f", vec![u32_t()], LType::nil()).unwrap();
        let entry = func.new_block().unwrap();
        func.append_block(entry).unwrap();
        let arg = func.argument_value(0).unwrap();

        let err = func
            .push_expression(entry, ExprKind::Read { memory: arg }, &rir)
            .unwrap_err();
        assert!(err.is_internal());

        let slot = func
            .push_expression(entry, ExprKind::Alloca { ty: u32_t(), count: 1 }, &rir)
            .unwrap();
        assert!(func.value_type(slot).unwrap().is_pointer);
        let loaded = func
            .push_expression(entry, ExprKind::Read { memory: slot }, &rir)
            .unwrap();
        assert!(func.value_type(loaded).unwrap().identical(&u32_t()));
    }

    #[test]
    fn test_no_append_after_terminator() {
        let rir = Rir::new("test");
        let mut func = Function::definition("f", vec![], LType::nil()).unwrap();
        let entry = func.new_block().unwrap();
        func.append_block(entry).unwrap();
        func.set_return(entry, None, &rir).unwrap();

        let err = func
            .push_expression(entry, ExprKind::Alloca { ty: u32_t(), count: 1 }, &rir)
            .unwrap_err();
        assert!(err.is_internal());
        assert!(func.set_exit(entry, BlockExit::Unreachable).is_err());
    }

    #[test]
    fn test_arithmetic_operand_types_must_match() {
        let rir = Rir::new("test");
        let mut func = Function::definition("f", vec![], LType::nil()).unwrap();
        let entry = func.new_block().unwrap();
        let a = func.constant(Constant::Int(1), ElementaryType::U32).unwrap();
        let b = func.constant(Constant::Int(2), ElementaryType::U64).unwrap();
        let c = func.constant(Constant::Int(3), ElementaryType::U32).unwrap();
        let add = |left, right| ExprKind::Arith {
            op: crate::ArithOp::Add,
            left,
            right,
        };
        assert!(func.push_expression(entry, add(a, b), &rir).is_err());
        let sum = func.push_expression(entry, add(a, c), &rir).unwrap();
        assert!(func.value_type(sum).unwrap().identical(&u32_t()));
        assert_eq!(func.value(sum).unwrap().id(), "$0");
    }

    #[test]
    fn test_labels_and_lookup() {
        let mut func = Function::definition("f", vec![], LType::nil()).unwrap();
        let first = func.new_block().unwrap();
        let second = func.new_block().unwrap();
        func.append_block(second).unwrap();
        func.append_block(first).unwrap();
        assert!(func.append_block(first).is_err());

        assert_eq!(func.block_ids(), &[second, first]);
        let label = func.label_of(second).unwrap();
        assert_eq!(func.value(label).unwrap().id(), "%label_1");
        assert_eq!(func.block("%label_1").map(Block::label), Some(label));
        assert_eq!(func.label_target(label), Some(second));
    }

    #[test]
    fn test_plain_declaration_has_no_blocks() {
        let mut func = Function::declaration("printf", vec![u32_t()], LType::nil());
        assert!(func.is_plain_declaration());
        assert!(func.block_ids().is_empty());
        assert!(func.new_block().is_err());
    }
}
