//! Module and function lowering.

use tern_ast::{FnDecl, FnImpl, Item, Module};
use tern_core::{Error, Result};

use crate::lowering::context::{FunctionLowering, SymbolInfo};
use crate::{Function, LType, LoweringOptions, Rir, invariant, verify_rir};

/// Lowers an analyzed module into a fresh RIR unit.
///
/// # Errors
/// * [`Error::LoweringFailed`] with every user-level diagnostic, if some
///   declarations could not be lowered
/// * [`Error::Internal`] as soon as a compiler invariant is found broken;
///   the partially built unit is discarded
pub fn lower_module(module: &Module, options: &LoweringOptions) -> Result<Rir> {
    AstLowering::new(&module.name, options.clone()).lower_program(module)
}

/// Converts an analyzed module to RIR.
pub struct AstLowering {
    rir: Rir,
}

impl AstLowering {
    /// Creates a lowering pass producing a unit called `name`.
    #[must_use]
    pub fn new(name: impl Into<String>, options: LoweringOptions) -> Self {
        Self {
            rir: Rir::with_options(name, options),
        }
    }

    /// Lowers a complete module.
    pub fn lower_program(mut self, module: &Module) -> Result<Rir> {
        log::debug!(
            "lowering module '{}' ({} items)",
            module.name,
            module.child_count()
        );
        let mut errors = Vec::new();

        // First pass: typedefs and every function signature, so that calls
        // can be typed regardless of declaration order
        for item in &module.items {
            let result = match item {
                Item::TypeDecl(decl) => self.rir.lower_type(&decl.ty).map(|_| ()),
                Item::Function(func) => self.declare_function(&func.decl),
                Item::Foreign(decl) => self.declare_function(decl),
            };
            collect(result, &mut errors)?;
        }

        // Second pass: function bodies
        for item in &module.items {
            if let Item::Function(func) = item {
                collect(self.lower_function(func), &mut errors)?;
            }
        }

        if !errors.is_empty() {
            return Err(Error::LoweringFailed {
                module: module.name.clone(),
                errors,
            });
        }

        if self.rir.options().verify {
            let report = verify_rir(&self.rir);
            if !report.is_ok() {
                let messages: Vec<String> =
                    report.errors.iter().map(ToString::to_string).collect();
                return Err(invariant(format!(
                    "lowered unit '{}' failed verification: {}",
                    module.name,
                    messages.join("; ")
                )));
            }
        }

        log::debug!(
            "lowered module '{}': {} functions, {} typedefs, {} literals",
            module.name,
            self.rir.functions().count(),
            self.rir.typedefs().count(),
            self.rir.global_literals().count()
        );
        Ok(self.rir)
    }

    /// Lowered argument and return types of a function.
    ///
    /// Composite arguments are passed by address.
    fn lower_signature(&mut self, decl: &FnDecl) -> Result<(Vec<LType>, LType)> {
        let mut arguments = Vec::with_capacity(decl.params.len());
        for param in &decl.params {
            let ty = self.rir.lower_type(&param.ty)?;
            arguments.push(if ty.is_composite() { ty.pointer_to() } else { ty });
        }
        let return_type = self.rir.lower_type(&decl.return_type_or_nil())?;
        Ok((arguments, return_type))
    }

    fn declare_function(&mut self, decl: &FnDecl) -> Result<()> {
        let (arguments, return_type) = self.lower_signature(decl)?;
        self.rir
            .add_function(Function::declaration(&decl.name, arguments, return_type))?;
        Ok(())
    }

    /// Lowers a function definition, replacing its declaration.
    fn lower_function(&mut self, func: &FnImpl) -> Result<()> {
        log::debug!("lowering function '{}'", func.decl.name);
        let (arguments, return_type) = self.lower_signature(&func.decl)?;
        let definition = Function::definition(&func.decl.name, arguments, return_type)?;

        let mut lowering = FunctionLowering::new(&mut self.rir, definition)?;
        lowering.lower_body(func)?;
        let definition = lowering.finish();

        log::debug!(
            "lowered function '{}': {} blocks, {} values",
            definition.name(),
            definition.block_ids().len(),
            definition.value_count()
        );
        self.rir.add_function(definition)?;
        Ok(())
    }
}

/// Keeps user-level errors for the final report; internal errors abort.
fn collect(result: Result<()>, errors: &mut Vec<Error>) -> Result<()> {
    match result {
        Err(err) if !err.is_internal() => {
            errors.push(err);
            Ok(())
        }
        other => other,
    }
}

impl FunctionLowering<'_> {
    /// Lowers a function body following the return protocol: the entry
    /// block allocates the return slot and spills the arguments, every
    /// `return` writes the slot and branches to the end block, which reads
    /// it back and returns.
    pub(crate) fn lower_body(&mut self, func: &FnImpl) -> Result<()> {
        let return_type = self.func.return_type();
        if !return_type.is_nil() {
            let slot = self.alloca(return_type)?;
            self.func.set_return_slot(slot);
        }

        for (position, param) in func.decl.params.iter().enumerate() {
            let argument = self.func.argument_value(position).ok_or_else(|| {
                invariant(format!(
                    "missing argument {position} of '{}'",
                    func.decl.name
                ))
            })?;
            // composites arrive by address and are copied into a local slot
            let ty = self.value_type(argument)?;
            let slot = self.alloca(ty.pointee())?;
            self.store(slot, argument)?;
            self.define_variable(param.name.clone(), SymbolInfo { slot });
        }

        self.lower_block(&func.body)?;
        self.branch_to(self.end)?;

        self.start_block(self.end)?;
        let value = match self.func.return_slot() {
            Some(slot) => Some(self.emit(crate::ExprKind::Read { memory: slot })?),
            None => None,
        };
        self.func.set_return(self.current, value, &*self.rir)
    }
}
