//! Instruction type definitions.

use crate::{ArithOp, CmpOp, LType, LogicOp, ValueId};

/// An instruction together with the value it produces.
///
/// Instructions without a result produce the function's nil value.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub kind: ExprKind,
    pub value: ValueId,
}

/// Instruction kinds.
///
/// Operands always refer to values created before the instruction, so the
/// def-use graph of a function is acyclic.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Stack slot for `count` elements of `ty`; yields a pointer to `ty`
    Alloca { ty: LType, count: u64 },

    /// Load through a pointer
    Read { memory: ValueId },

    /// Store `value` through the pointer `memory`
    Write { memory: ValueId, value: ValueId },

    /// Address of member `index` of a product
    ObjMemberAt { object: ValueId, index: u32 },

    /// Store the discriminant of a union
    SetUnionIdx { target: ValueId, index: ValueId },

    /// Load the discriminant of a union
    GetUnionIdx { target: ValueId },

    /// Address of the payload of member `index` of a union
    UnionMemberAt { target: ValueId, index: u32 },

    /// Numeric conversion
    Convert { value: ValueId, to: LType },

    /// Call of a function of the unit by name
    Call { name: String, args: Vec<ValueId> },

    Arith {
        op: ArithOp,
        left: ValueId,
        right: ValueId,
    },

    Cmp {
        op: CmpOp,
        left: ValueId,
        right: ValueId,
    },

    Logic {
        op: LogicOp,
        left: ValueId,
        right: ValueId,
    },

    /// Leaves the function; only ever the exit of a block
    Return { value: Option<ValueId> },
}
