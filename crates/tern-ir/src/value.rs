//! SSA-like values.

use std::fmt;
use std::sync::Arc;

use tern_core::ElementaryType;

use crate::{BlockId, ExprId, GlobalId, LType};

/// A compile-time constant embedded in a value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constant {
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Constant {
    /// Type a constant has when nothing asks for a narrower one
    pub const fn default_type(&self) -> ElementaryType {
        match self {
            Self::Int(_) => ElementaryType::I64,
            Self::Float(_) => ElementaryType::F64,
            Self::Bool(_) => ElementaryType::Bool,
        }
    }

    /// Returns the constant re-typed as `target`, if it can be represented
    /// there without a runtime conversion. Integers must fit the target range.
    pub fn retyped(&self, target: ElementaryType) -> Option<Self> {
        match *self {
            Self::Int(v) if target.is_integer() => target
                .int_range()
                .filter(|(min, max)| (*min..=*max).contains(&i128::from(v)))
                .map(|_| Self::Int(v)),
            Self::Int(v) if target.is_float() => Some(Self::Float(v as f64)),
            Self::Float(v) if target.is_float() => Some(Self::Float(v)),
            Self::Bool(v) if target == ElementaryType::Bool => Some(Self::Bool(v)),
            _ => None,
        }
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v:?}"),
            Self::Bool(v) => write!(f, "{v}"),
        }
    }
}

/// What produced a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableOrigin {
    Expression(ExprId),
    /// Function argument by position
    Argument(usize),
}

/// Value variants.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueKind {
    Constant(Constant),
    /// Result of an instruction or a function argument, `$N`
    Variable(VariableOrigin),
    /// Names a block, `%label_N`
    Label(BlockId),
    /// Global string constant of the unit
    Literal { global: GlobalId, content: Arc<str> },
    /// Absence of a value, e.g. the result of `write`
    Nil,
}

/// A value of a function.
///
/// Values are created once and never modified. Every value except nil has
/// a type and an identifier unique within its function.
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    pub kind: ValueKind,
    pub ty: Option<LType>,
    pub id: String,
}

impl Value {
    pub fn nil() -> Self {
        Self {
            kind: ValueKind::Nil,
            ty: None,
            id: String::new(),
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self.kind, ValueKind::Nil)
    }

    pub const fn as_constant(&self) -> Option<Constant> {
        match self.kind {
            ValueKind::Constant(c) => Some(c),
            _ => None,
        }
    }

    pub const fn as_label(&self) -> Option<BlockId> {
        match self.kind {
            ValueKind::Label(block) => Some(block),
            _ => None,
        }
    }

    /// Identifier used when the value is an operand
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The value's content for constants and literals, its identifier otherwise
    pub fn actual_string(&self) -> String {
        match &self.kind {
            ValueKind::Constant(c) => c.to_string(),
            ValueKind::Literal { content, .. } => format!("{:?}", &**content),
            _ => self.id.clone(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}
