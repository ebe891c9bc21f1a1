//! Match expression lowering.
//!
//! ```text
//!     $r = alloca(T, 1)           ; only for a non-nil result
//!     $d = getunionidx($u)
//!     $c0 = cmpeq($d, 0)
//!     condbranch($c0, %case_0, %test_1)
//! %test_1:
//!     ...                         ; last test falls through to %fatal
//! %case_0:
//!     $p = unionmemberat($u, 0)   ; only when the case binds a name
//!     ...
//!     write($r, $v)
//!     branch(%join)
//! %fatal:
//!     unreachable()
//! %join:
//!     $res = read($r)
//! ```

use std::sync::Arc;

use tern_ast::{MatchCase, MatchExpr};
use tern_core::{ElementaryType, Error, Result, Type};

use crate::lowering::context::{FunctionLowering, SymbolInfo};
use crate::{BlockExit, BlockId, CmpOp, Constant, ExprKind, ValueId, invariant};

/// A case together with the union members it covers.
struct CaseTarget<'m> {
    case: &'m MatchCase,
    indices: Vec<usize>,
    block: BlockId,
}

impl FunctionLowering<'_> {
    pub(crate) fn lower_match(&mut self, m: &MatchExpr, ty: &Arc<Type>) -> Result<ValueId> {
        let union_ty = &m.scrutinee.ty;
        if !union_ty.is_sum() {
            return Err(invariant(format!(
                "match scrutinee in '{}' has non-union type '{union_ty}'",
                self.func.name()
            )));
        }
        let members = union_ty.members();

        // Resolve every case before emitting anything
        let mut covered = vec![false; members.len()];
        let mut resolved = Vec::with_capacity(m.cases.len());
        for case in &m.cases {
            let indices = case_indices(case, union_ty, &members, &covered)?;
            for &index in &indices {
                covered[index] = true;
            }
            resolved.push((case, indices));
        }

        let scrutinee = self.lower_expr(&m.scrutinee)?;
        let result_ty = self.lower_type(ty)?;
        let result_slot = if result_ty.is_nil() {
            None
        } else {
            Some(self.alloca(result_ty)?)
        };
        let discriminant = self.emit(ExprKind::GetUnionIdx { target: scrutinee })?;

        let mut targets = Vec::with_capacity(resolved.len());
        for (case, indices) in resolved {
            targets.push(CaseTarget {
                case,
                indices,
                block: self.func.new_block()?,
            });
        }
        let fatal = self.func.new_block()?;
        let join = self.func.new_block()?;

        self.dispatch(discriminant, &targets, fatal)?;

        for target in &targets {
            self.start_block(target.block)?;
            self.lower_case(target, scrutinee, result_slot)?;
            self.branch_to(join)?;
        }

        self.start_block(fatal)?;
        self.func.set_exit(fatal, BlockExit::Unreachable)?;

        self.start_block(join)?;
        match result_slot {
            Some(slot) => self.load(slot),
            None => Ok(self.func.nil_value()),
        }
    }

    /// Emits one `cmpeq` + `condbranch` per covered discriminant. The last
    /// test falls through to `fatal`.
    fn dispatch(&mut self, discriminant: ValueId, targets: &[CaseTarget<'_>], fatal: BlockId) -> Result<()> {
        let tests: Vec<(usize, BlockId)> = targets
            .iter()
            .flat_map(|target| target.indices.iter().map(|&index| (index, target.block)))
            .collect();
        if tests.is_empty() {
            return self.branch_to(fatal);
        }

        let last = tests.len() - 1;
        for (position, (index, block)) in tests.into_iter().enumerate() {
            let index = self
                .func
                .constant(Constant::Int(index as i64), ElementaryType::I64)?;
            let cond = self.emit(ExprKind::Cmp {
                op: CmpOp::Eq,
                left: discriminant,
                right: index,
            })?;
            if position == last {
                self.cond_branch(cond, block, fatal)?;
            } else {
                let next = self.func.new_block()?;
                self.cond_branch(cond, block, next)?;
                self.start_block(next)?;
            }
        }
        Ok(())
    }

    /// Lowers one case body in its own scope and stores its value.
    fn lower_case(
        &mut self,
        target: &CaseTarget<'_>,
        scrutinee: ValueId,
        result_slot: Option<ValueId>,
    ) -> Result<()> {
        let case = target.case;
        self.enter_scope();
        if let Some(name) = &case.binding {
            let [index] = target.indices.as_slice() else {
                return Err(Error::lowering(
                    format!("cannot bind '{name}' to a case covering {} members", target.indices.len()),
                    case.span,
                ));
            };
            let payload = self.emit(ExprKind::UnionMemberAt {
                target: scrutinee,
                index: u32::try_from(*index)
                    .map_err(|_| invariant(format!("union member {index} out of range")))?,
            })?;
            self.define_variable(name.clone(), SymbolInfo { slot: payload });
        }

        let value = self.lower_expr(&case.body)?;
        if let Some(slot) = result_slot {
            self.store(slot, value)?;
        }
        self.exit_scope();
        Ok(())
    }
}

/// Union members a case covers. A wildcard covers the members no earlier
/// case did.
fn case_indices(
    case: &MatchCase,
    union_ty: &Type,
    members: &[&Arc<Type>],
    covered: &[bool],
) -> Result<Vec<usize>> {
    let Some(pattern) = &case.pattern else {
        return Ok((0..members.len()).filter(|&i| !covered[i]).collect());
    };
    let indices: Vec<usize> = members
        .iter()
        .enumerate()
        .filter(|(_, member)| member.structurally_equals(pattern))
        .map(|(index, _)| index)
        .collect();
    if indices.is_empty() {
        return Err(Error::lowering(
            format!("type '{pattern}' is not a member of '{union_ty}'"),
            case.span,
        ));
    }
    Ok(indices)
}
