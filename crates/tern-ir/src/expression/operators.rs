//! Arithmetic, comparison, and logical operators.

/// Arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// Logical operators on booleans
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicOp {
    And,
    Or,
}

impl ArithOp {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mul => "mul",
            Self::Div => "div",
        }
    }
}

impl CmpOp {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Eq => "cmpeq",
            Self::Ne => "cmpne",
            Self::Lt => "cmplt",
            Self::Le => "cmple",
            Self::Gt => "cmpgt",
            Self::Ge => "cmpge",
        }
    }
}

impl LogicOp {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::And => "logic_and",
            Self::Or => "logic_or",
        }
    }
}
