//! Per-function lowering state and emission helpers.

use std::collections::HashMap;

use tern_core::{Result, Type};

use crate::{BlockExit, BlockId, ExprKind, Function, LType, Rir, Value, ValueId, invariant};

/// A name visible to the function body.
///
/// Every binding is a pointer to the storage of the named value, so that
/// reads and assignments go through memory uniformly.
#[derive(Debug, Clone)]
pub(crate) struct SymbolInfo {
    pub slot: ValueId,
}

/// Lowers the body of one function.
pub(crate) struct FunctionLowering<'r> {
    pub(crate) rir: &'r mut Rir,
    pub(crate) func: Function,
    /// Block instructions are currently appended to
    pub(crate) current: BlockId,
    /// Block holding the single `return` of the function
    pub(crate) end: BlockId,
    symbols: Vec<HashMap<String, SymbolInfo>>,
}

impl<'r> FunctionLowering<'r> {
    /// Sets up the entry block and the not yet placed end block.
    pub(crate) fn new(rir: &'r mut Rir, mut func: Function) -> Result<Self> {
        let entry = func.new_block()?;
        func.append_block(entry)?;
        let end = func.new_block()?;
        let end_label = func.label_of(end)?;
        func.set_end_label(end_label);
        Ok(Self {
            rir,
            func,
            current: entry,
            end,
            symbols: vec![HashMap::new()],
        })
    }

    pub(crate) fn finish(self) -> Function {
        self.func
    }

    /// Enters a new scope.
    pub(crate) fn enter_scope(&mut self) {
        self.symbols.push(HashMap::new());
    }

    /// Exits the current scope.
    pub(crate) fn exit_scope(&mut self) {
        self.symbols.pop();
    }

    /// Defines a variable in the current scope.
    pub(crate) fn define_variable(&mut self, name: String, info: SymbolInfo) {
        if let Some(scope) = self.symbols.last_mut() {
            scope.insert(name, info);
        }
    }

    /// Looks up a variable in all scopes.
    pub(crate) fn lookup_variable(&self, name: &str) -> Result<&SymbolInfo> {
        self.symbols
            .iter()
            .rev()
            .find_map(|scope| scope.get(name))
            .ok_or_else(|| {
                invariant(format!(
                    "'{name}' is not bound while lowering '{}'",
                    self.func.name()
                ))
            })
    }

    pub(crate) fn lower_type(&mut self, ty: &Type) -> Result<LType> {
        self.rir.lower_type(ty)
    }

    pub(crate) fn value_type(&self, value: ValueId) -> Result<LType> {
        self.func.operand_type(value)
    }

    /// Appends an instruction to the current block.
    pub(crate) fn emit(&mut self, kind: ExprKind) -> Result<ValueId> {
        self.func.push_expression(self.current, kind, &*self.rir)
    }

    pub(crate) fn is_terminated(&self) -> bool {
        self.func
            .block_by_id(self.current)
            .is_some_and(|block| block.is_terminated())
    }

    /// Places `block` in the layout and continues emitting into it.
    pub(crate) fn start_block(&mut self, block: BlockId) -> Result<()> {
        self.func.append_block(block)?;
        self.current = block;
        Ok(())
    }

    /// Branches to `target` unless the current block already left.
    pub(crate) fn branch_to(&mut self, target: BlockId) -> Result<()> {
        if self.is_terminated() {
            return Ok(());
        }
        let dst = self.func.label_of(target)?;
        self.func.set_exit(self.current, BlockExit::Branch { dst })
    }

    pub(crate) fn cond_branch(
        &mut self,
        cond: ValueId,
        taken: BlockId,
        fallthrough: BlockId,
    ) -> Result<()> {
        let exit = BlockExit::CondBranch {
            cond,
            taken: self.func.label_of(taken)?,
            fallthrough: self.func.label_of(fallthrough)?,
        };
        self.func.set_exit(self.current, exit)
    }

    /// Makes `value` usable where a `target` is expected.
    ///
    /// Constants are re-typed in place; other elementary values go through
    /// a `convert`.
    pub(crate) fn maybe_convert(&mut self, value: ValueId, target: LType) -> Result<ValueId> {
        let ty = self.value_type(value)?;
        if ty.identical(&target) {
            return Ok(value);
        }
        let constant = self.func.value(value).and_then(Value::as_constant);
        if let (Some(constant), Some(etype)) = (constant, target.as_elementary()) {
            if let Some(retyped) = constant.retyped(etype).filter(|_| !target.is_pointer) {
                return self.func.constant(retyped, etype);
            }
        }
        if ty.is_pointer || target.is_pointer || !ty.is_elementary() || !target.is_elementary() {
            return Err(invariant(format!(
                "no conversion from {} to {} in '{}'",
                self.rir.type_str(ty),
                self.rir.type_str(target),
                self.func.name()
            )));
        }
        self.emit(ExprKind::Convert { value, to: target })
    }

    /// Writes `value` into the memory `slot` points to.
    ///
    /// Composites are handled by address, so a composite pointer is read
    /// before being written.
    pub(crate) fn store(&mut self, slot: ValueId, value: ValueId) -> Result<()> {
        let slot_ty = self.value_type(slot)?;
        let value_ty = self.value_type(value)?;
        let pointee = slot_ty.pointee();
        let value = if value_ty.is_composite() && value_ty.is_pointer && value_ty.equals(&pointee) {
            self.emit(ExprKind::Read { memory: value })?
        } else {
            self.maybe_convert(value, pointee)?
        };
        self.emit(ExprKind::Write {
            memory: slot,
            value,
        })?;
        Ok(())
    }

    /// Produces the value a binding stands for: elementary values are read
    /// from their slot, composites stay addressed by it.
    pub(crate) fn load(&mut self, slot: ValueId) -> Result<ValueId> {
        if self.value_type(slot)?.is_composite() {
            return Ok(slot);
        }
        self.emit(ExprKind::Read { memory: slot })
    }

    /// Allocates a slot for one value of `ty`.
    pub(crate) fn alloca(&mut self, ty: LType) -> Result<ValueId> {
        self.emit(ExprKind::Alloca { ty, count: 1 })
    }
}
