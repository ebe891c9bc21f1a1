//! Method implementations for ExprKind.

use super::types::ExprKind;
use crate::ValueId;

impl ExprKind {
    /// Mnemonic of the instruction in the textual form
    #[must_use]
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Self::Alloca { .. } => "alloca",
            Self::Read { .. } => "read",
            Self::Write { .. } => "write",
            Self::ObjMemberAt { .. } => "objmemberat",
            Self::SetUnionIdx { .. } => "setunionidx",
            Self::GetUnionIdx { .. } => "getunionidx",
            Self::UnionMemberAt { .. } => "unionmemberat",
            Self::Convert { .. } => "convert",
            Self::Call { .. } => "call",
            Self::Arith { op, .. } => op.name(),
            Self::Cmp { op, .. } => op.name(),
            Self::Logic { op, .. } => op.name(),
            Self::Return { .. } => "return",
        }
    }

    /// Values read by the instruction, in operand order
    #[must_use]
    pub fn operands(&self) -> Vec<ValueId> {
        match self {
            Self::Alloca { .. } => Vec::new(),
            Self::Read { memory } => vec![*memory],
            Self::Write { memory, value } => vec![*memory, *value],
            Self::ObjMemberAt { object, .. } => vec![*object],
            Self::SetUnionIdx { target, index } => vec![*target, *index],
            Self::GetUnionIdx { target } | Self::UnionMemberAt { target, .. } => vec![*target],
            Self::Convert { value, .. } => vec![*value],
            Self::Call { args, .. } => args.clone(),
            Self::Arith { left, right, .. }
            | Self::Cmp { left, right, .. }
            | Self::Logic { left, right, .. } => vec![*left, *right],
            Self::Return { value } => value.iter().copied().collect(),
        }
    }

    /// Returns true if the instruction ends its block
    #[must_use]
    pub const fn is_terminator(&self) -> bool {
        matches!(self, Self::Return { .. })
    }
}
