//! Basic blocks.

use crate::{ExprId, ValueId};

/// How control leaves a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockExit {
    /// `branch(%label)`
    Branch { dst: ValueId },
    /// `condbranch(cond, %taken, %fallthrough)`
    CondBranch {
        cond: ValueId,
        taken: ValueId,
        fallthrough: ValueId,
    },
    /// A `return` instruction
    Return(ExprId),
    /// Reached only if a compiler invariant is broken at run time
    Unreachable,
}

impl BlockExit {
    /// Labels this exit may transfer control to
    pub fn targets(&self) -> Vec<ValueId> {
        match *self {
            Self::Branch { dst } => vec![dst],
            Self::CondBranch {
                taken, fallthrough, ..
            } => vec![taken, fallthrough],
            Self::Return(_) | Self::Unreachable => Vec::new(),
        }
    }
}

/// A straight-line sequence of instructions ending in one exit.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub(crate) label: ValueId,
    pub(crate) expressions: Vec<ExprId>,
    pub(crate) exit: Option<BlockExit>,
}

impl Block {
    pub(crate) fn new(label: ValueId) -> Self {
        Self {
            label,
            expressions: Vec::new(),
            exit: None,
        }
    }

    /// The label value naming this block
    pub const fn label(&self) -> ValueId {
        self.label
    }

    /// Instructions in execution order, excluding the exit
    pub fn expressions(&self) -> &[ExprId] {
        &self.expressions
    }

    pub const fn exit(&self) -> Option<BlockExit> {
        self.exit
    }

    pub const fn is_terminated(&self) -> bool {
        self.exit.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_targets() {
        let cond = BlockExit::CondBranch {
            cond: ValueId(3),
            taken: ValueId(4),
            fallthrough: ValueId(5),
        };
        assert_eq!(cond.targets(), vec![ValueId(4), ValueId(5)]);
        assert!(BlockExit::Unreachable.targets().is_empty());
    }

    #[test]
    fn test_new_block_is_open() {
        let block = Block::new(ValueId(1));
        assert!(!block.is_terminated());
        assert!(block.expressions().is_empty());
        assert_eq!(block.label(), ValueId(1));
    }
}
