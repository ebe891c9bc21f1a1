//! Structural checks on a lowered unit.

use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::{BlockExit, Function, Rir, ValueId, ValueKind, VariableOrigin};

/// A broken structural rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    #[error("block {label} of '{function}' has no exit")]
    Unterminated { function: String, label: String },

    #[error("block {label} of '{function}' branches to '{target}', which is not one of its blocks")]
    ForeignTarget {
        function: String,
        label: String,
        target: String,
    },

    #[error("'{function}' does not end with its end block followed by return")]
    MisplacedEnd { function: String },

    #[error("'{function}' uses '{operand}' before it is defined in the function")]
    UndefinedOperand { function: String, operand: String },
}

/// Outcome of [`verify_rir`].
#[derive(Debug, Clone, Default)]
pub struct VerifyResult {
    pub errors: Vec<VerifyError>,
}

impl VerifyResult {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Checks every function definition of the unit:
/// - every block ends in an exit
/// - branch targets are blocks of the same function
/// - the end block comes last and returns
/// - operands are arguments, constants, literals, or results of instructions
///   placed earlier in the same function
pub fn verify_rir(rir: &Rir) -> VerifyResult {
    let mut result = VerifyResult::default();
    for func in rir.functions().filter(|f| !f.is_plain_declaration()) {
        verify_function(func, &mut result.errors);
    }
    if !result.is_ok() {
        log::debug!("{}: {} verification error(s)", rir.name(), result.errors.len());
    }
    result
}

fn verify_function(func: &Function, errors: &mut Vec<VerifyError>) {
    let name = func.name().to_string();
    let id = |value: ValueId| func.value(value).map_or_else(|| format!("#{}", value.index()), |v| v.id().to_string());

    let placed: FxHashSet<ValueId> = func.blocks().map(|block| block.label()).collect();
    let mut defined = FxHashSet::default();

    for block in func.blocks() {
        let label = id(block.label());
        let exit_operands = block.exit().map_or_else(Vec::new, |exit| match exit {
            BlockExit::CondBranch { cond, .. } => vec![cond],
            _ => Vec::new(),
        });

        let exit_expression = match block.exit() {
            Some(BlockExit::Return(expr)) => func.expression(expr),
            _ => None,
        };
        for expr in func.block_expressions(block).chain(exit_expression) {
            for operand in expr.kind.operands() {
                if !is_available(func, operand, &defined) {
                    errors.push(VerifyError::UndefinedOperand {
                        function: name.clone(),
                        operand: id(operand),
                    });
                }
            }
            defined.insert(expr.value);
        }
        for operand in exit_operands {
            if !is_available(func, operand, &defined) {
                errors.push(VerifyError::UndefinedOperand {
                    function: name.clone(),
                    operand: id(operand),
                });
            }
        }

        match block.exit() {
            None => errors.push(VerifyError::Unterminated {
                function: name.clone(),
                label: label.clone(),
            }),
            Some(exit) => {
                for target in exit.targets() {
                    if !placed.contains(&target) {
                        errors.push(VerifyError::ForeignTarget {
                            function: name.clone(),
                            label: label.clone(),
                            target: id(target),
                        });
                    }
                }
            }
        }
    }

    let last = func.blocks().last();
    let ends_properly = match (last, func.end_label()) {
        (Some(block), Some(end)) => {
            block.label() == end && matches!(block.exit(), Some(BlockExit::Return(_)))
        }
        _ => false,
    };
    if !ends_properly {
        errors.push(VerifyError::MisplacedEnd { function: name });
    }
}

fn is_available(func: &Function, operand: ValueId, defined: &FxHashSet<ValueId>) -> bool {
    match func.value(operand).map(|v| &v.kind) {
        Some(ValueKind::Constant(_) | ValueKind::Literal { .. }) => true,
        Some(ValueKind::Variable(VariableOrigin::Argument(_))) => true,
        Some(ValueKind::Variable(VariableOrigin::Expression(_))) => defined.contains(&operand),
        Some(ValueKind::Label(_) | ValueKind::Nil) | None => false,
    }
}
