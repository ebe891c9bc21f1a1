//! Statement lowering.

use tern_ast::{Block as AstBlock, ExprKind as AstExprKind, Statement};
use tern_core::{ElementaryType, Result};

use crate::lowering::context::{FunctionLowering, SymbolInfo};
use crate::{LType, invariant};

impl FunctionLowering<'_> {
    /// Lowers a block of statements in its own scope.
    pub(crate) fn lower_block(&mut self, block: &AstBlock) -> Result<()> {
        self.enter_scope();
        let result = self.lower_statements(block);
        self.exit_scope();
        result
    }

    fn lower_statements(&mut self, block: &AstBlock) -> Result<()> {
        for (position, stmt) in block.statements.iter().enumerate() {
            self.lower_statement(stmt)?;
            if self.is_terminated() {
                let skipped = block.statements.len() - position - 1;
                if skipped > 0 {
                    log::debug!(
                        "{}: skipping {skipped} unreachable statement(s) after return",
                        self.func.name()
                    );
                }
                break;
            }
        }
        Ok(())
    }

    /// Lowers a statement.
    fn lower_statement(&mut self, stmt: &Statement) -> Result<()> {
        match stmt {
            Statement::VarDecl {
                name,
                ty,
                initializer,
                ..
            } => {
                let lowered = self.lower_type(ty)?;
                let slot = self.alloca(lowered)?;
                if let Some(init) = initializer {
                    match &init.kind {
                        // build the object in place
                        AstExprKind::Call(call)
                            if call.is_constructor() && init.ty.structurally_equals(ty) =>
                        {
                            self.populate(slot, &init.ty, &call.args)?;
                        }
                        _ => {
                            let value = self.lower_expr(init)?;
                            self.store(slot, value)?;
                        }
                    }
                }
                self.define_variable(name.clone(), SymbolInfo { slot });
                Ok(())
            }

            Statement::Assign { name, value, .. } => {
                let slot = self.lookup_variable(name)?.slot;
                let value = self.lower_expr(value)?;
                self.store(slot, value)
            }

            Statement::Return { value, .. } => {
                match (value, self.func.return_slot()) {
                    (Some(expr), Some(slot)) => {
                        let value = self.lower_expr(expr)?;
                        self.store(slot, value)?;
                    }
                    (None, None) => {}
                    _ => {
                        return Err(invariant(format!(
                            "return in '{}' does not match the declared return type",
                            self.func.name()
                        )));
                    }
                }
                self.branch_to(self.end)
            }

            Statement::If {
                condition,
                then_block,
                else_block,
                ..
            } => {
                let cond = self.lower_expr(condition)?;
                let cond = self.maybe_convert(cond, LType::elementary(ElementaryType::Bool))?;

                let then_id = self.func.new_block()?;
                let else_id = else_block
                    .as_ref()
                    .map(|_| self.func.new_block())
                    .transpose()?;
                let join = self.func.new_block()?;
                self.cond_branch(cond, then_id, else_id.unwrap_or(join))?;

                self.start_block(then_id)?;
                self.lower_block(then_block)?;
                self.branch_to(join)?;

                if let (Some(else_id), Some(else_block)) = (else_id, else_block) {
                    self.start_block(else_id)?;
                    self.lower_block(else_block)?;
                    self.branch_to(join)?;
                }

                self.start_block(join)
            }

            Statement::Expression(expr) => {
                self.lower_expr(expr)?;
                Ok(())
            }
        }
    }
}
