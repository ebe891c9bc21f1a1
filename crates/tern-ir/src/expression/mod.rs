//! RIR instructions.

mod methods;
mod operators;
mod types;

pub use operators::{ArithOp, CmpOp, LogicOp};
pub use types::{ExprKind, Expression};
