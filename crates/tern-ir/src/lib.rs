//! Tern Intermediate Representation (RIR)
//!
//! RIR is the typed, SSA-like representation the analyzed syntax tree is
//! lowered into before native code generation. A unit ([`Rir`]) owns
//! functions made of basic blocks, each block a straight-line sequence of
//! instructions over typed values ending in a branch or `return`.
//!
//! Surface types are reduced to a small [`LType`] vocabulary: elementary
//! types, and composites described by deduplicated [`TypeDef`]s. Sum types
//! become tagged unions whose discriminant and payload are accessed with
//! explicit instructions.
//!
//! # Example
//!
//! ```rust
//! use tern_ast::{Block, FnDecl, FnImpl, Item, Module, Param, Statement, ExprBuilder};
//! use tern_core::{ElementaryType, Span, Type};
//! use tern_ir::{LoweringOptions, lower_module};
//!
//! let span = Span::default();
//! let u32_t = Type::elementary(ElementaryType::U32);
//! let decl = FnDecl::new("id", vec![Param::new("a", u32_t.clone(), span)], Some(u32_t.clone()), span);
//! let body = Block::new(
//!     vec![Statement::Return { value: Some(ExprBuilder::ident("a", u32_t, span)), span }],
//!     span,
//! );
//! let mut module = Module::new("example");
//! module.add_item(Item::Function(FnImpl::new(decl, body))).unwrap();
//!
//! let rir = lower_module(&module, &LoweringOptions::default()).unwrap();
//! assert_eq!(rir.function("id").unwrap().argument_count(), 1);
//! ```

mod arena;
mod block;
mod display;
mod expression;
mod function;
mod global;
mod lowering;
mod ltype;
mod options;
mod parse;
mod rir;
mod typedef;
mod value;
mod verify;

use tern_core::Error;

// Re-export main types
pub use arena::{
    BlockId, ExprId, FunctionId, GlobalId, IdentifierMap, RirObject, TypeDefId, ValueId,
};
pub use block::{Block, BlockExit};
pub use expression::{ArithOp, CmpOp, ExprKind, Expression, LogicOp};
pub use function::Function;
pub use global::Global;
pub use lowering::{AstLowering, lower_module};
pub use ltype::{LType, LTypeKind};
pub use options::LoweringOptions;
pub use parse::{ParseTypeDefError, ParsedTypeDef, parse_typedef_line};
pub use rir::Rir;
pub use typedef::{TypeDef, TypeMember};
pub use value::{Constant, Value, ValueKind, VariableOrigin};
pub use verify::{VerifyError, VerifyResult, verify_rir};

/// Reports a broken lowering invariant.
///
/// These are compiler bugs rather than user errors, so they are logged with
/// their full context before being returned.
pub(crate) fn invariant(message: impl Into<String>) -> Error {
    let message = message.into();
    log::error!("{message}");
    Error::internal(message)
}
