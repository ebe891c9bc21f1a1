//! Surface type system of the Tern language.
//!
//! These are the types semantic analysis attaches to every node of the
//! analyzed syntax tree. They are immutable once analysis finishes and are
//! shared between stages through `Arc`.
mod elementary;
mod type_kind;

pub use elementary::ElementaryType;
pub use type_kind::{Type, TypeOp};
