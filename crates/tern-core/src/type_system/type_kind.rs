use std::fmt;
use std::sync::Arc;

use super::ElementaryType;

/// Type operators combining several types into one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeOp {
    /// `a, b`: all operands present (struct-like)
    Product,
    /// `a | b`: exactly one operand present (tagged union)
    Sum,
    /// `a -> b`: function type
    Implication,
}

impl TypeOp {
    const fn separator(self) -> &'static str {
        match self {
            Self::Product => ",",
            Self::Sum => "|",
            Self::Implication => "->",
        }
    }
}

/// A fully resolved surface type
///
/// Generics are already instantiated by the time a type reaches this form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// Built-in scalar type
    Elementary(ElementaryType),

    /// Named member of a composite type, e.g. `a:i32`
    Leaf { name: String, ty: Arc<Type> },

    /// Several types joined by a type operator
    Operator { op: TypeOp, operands: Vec<Arc<Type>> },

    /// User-defined nominal type, e.g. `type point { x:i32, y:i32 }`
    Defined { name: String, body: Arc<Type> },
}

impl Type {
    pub fn elementary(etype: ElementaryType) -> Arc<Self> {
        Arc::new(Self::Elementary(etype))
    }

    pub fn leaf(name: impl Into<String>, ty: Arc<Type>) -> Arc<Self> {
        Arc::new(Self::Leaf {
            name: name.into(),
            ty,
        })
    }

    pub fn product(operands: Vec<Arc<Type>>) -> Arc<Self> {
        Arc::new(Self::Operator {
            op: TypeOp::Product,
            operands,
        })
    }

    pub fn sum(operands: Vec<Arc<Type>>) -> Arc<Self> {
        Arc::new(Self::Operator {
            op: TypeOp::Sum,
            operands,
        })
    }

    pub fn implication(argument: Arc<Type>, result: Arc<Type>) -> Arc<Self> {
        Arc::new(Self::Operator {
            op: TypeOp::Implication,
            operands: vec![argument, result],
        })
    }

    pub fn defined(name: impl Into<String>, body: Arc<Type>) -> Arc<Self> {
        Arc::new(Self::Defined {
            name: name.into(),
            body,
        })
    }

    /// Returns the type with any member names removed
    pub fn strip_leaf(&self) -> &Type {
        match self {
            Self::Leaf { ty, .. } => ty.strip_leaf(),
            other => other,
        }
    }

    /// Returns the member name if this is a named member
    pub fn leaf_name(&self) -> Option<&str> {
        match self {
            Self::Leaf { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn as_elementary(&self) -> Option<ElementaryType> {
        match self.strip_leaf() {
            Self::Elementary(etype) => Some(*etype),
            _ => None,
        }
    }

    pub fn is_elementary(&self) -> bool {
        self.as_elementary().is_some()
    }

    pub fn is_nil(&self) -> bool {
        self.as_elementary() == Some(ElementaryType::Nil)
    }

    /// Returns the operator of this type, looking through leaves and definitions
    pub fn operator(&self) -> Option<TypeOp> {
        match self.strip_leaf() {
            Self::Operator { op, .. } => Some(*op),
            Self::Defined { body, .. } => body.operator(),
            _ => None,
        }
    }

    pub fn is_sum(&self) -> bool {
        self.operator() == Some(TypeOp::Sum)
    }

    pub fn is_product(&self) -> bool {
        self.operator() == Some(TypeOp::Product)
    }

    pub fn is_defined(&self) -> bool {
        matches!(self.strip_leaf(), Self::Defined { .. })
    }

    /// Returns true for types whose values occupy a multi-member layout
    pub fn is_composite(&self) -> bool {
        match self.strip_leaf() {
            Self::Elementary(_) | Self::Leaf { .. } => false,
            Self::Operator { op, .. } => *op != TypeOp::Implication,
            Self::Defined { .. } => true,
        }
    }

    /// Returns the members of a composite type in declaration order.
    ///
    /// A defined type whose body is a single type has that body as its only
    /// member.
    pub fn members(&self) -> Vec<&Arc<Type>> {
        match self.strip_leaf() {
            Self::Operator { op, operands } if *op != TypeOp::Implication => {
                operands.iter().collect()
            }
            Self::Defined { body, .. } => match body.strip_leaf() {
                Self::Operator { op, operands } if *op != TypeOp::Implication => {
                    operands.iter().collect()
                }
                _ => vec![body],
            },
            _ => Vec::new(),
        }
    }

    /// Content-derived key of the type.
    ///
    /// Two types produce the same string iff they describe the same type, so
    /// this is suitable for deduplication. Defined types are keyed by name.
    pub fn unique_type_str(&self) -> String {
        match self {
            Self::Elementary(etype) => etype.name().to_string(),
            Self::Leaf { name, ty } => format!("{name}:{}", ty.operand_str(None)),
            Self::Operator { op, operands } => operands
                .iter()
                .map(|t| t.operand_str(Some(*op)))
                .collect::<Vec<_>>()
                .join(op.separator()),
            Self::Defined { name, .. } => name.clone(),
        }
    }

    fn operand_str(&self, parent: Option<TypeOp>) -> String {
        match self {
            Self::Operator { op, .. } if parent != Some(*op) => {
                format!("({})", self.unique_type_str())
            }
            _ => self.unique_type_str(),
        }
    }

    /// Structural comparison ignoring member names.
    pub fn structurally_equals(&self, other: &Type) -> bool {
        match (self.strip_leaf(), other.strip_leaf()) {
            (Self::Elementary(a), Self::Elementary(b)) => a == b,
            (
                Self::Operator {
                    op: op_a,
                    operands: a,
                },
                Self::Operator {
                    op: op_b,
                    operands: b,
                },
            ) => {
                op_a == op_b
                    && a.len() == b.len()
                    && a.iter().zip(b).all(|(x, y)| x.structurally_equals(y))
            }
            (Self::Defined { name: a, .. }, Self::Defined { name: b, .. }) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.unique_type_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn i32_t() -> Arc<Type> {
        Type::elementary(ElementaryType::I32)
    }

    fn string_t() -> Arc<Type> {
        Type::elementary(ElementaryType::String)
    }

    #[test]
    fn test_unique_type_str() {
        let product = Type::product(vec![Type::leaf("a", i32_t()), Type::leaf("b", string_t())]);
        assert_eq!(product.unique_type_str(), "a:i32,b:string");

        let sum = Type::sum(vec![product.clone(), Type::leaf("c", string_t())]);
        assert_eq!(sum.unique_type_str(), "(a:i32,b:string)|c:string");

        let defined = Type::defined("foo", sum);
        assert_eq!(defined.unique_type_str(), "foo");
    }

    #[test]
    fn test_structural_equality_ignores_names() {
        let a = Type::product(vec![Type::leaf("a", i32_t()), Type::leaf("b", string_t())]);
        let b = Type::product(vec![i32_t(), string_t()]);
        let c = Type::sum(vec![i32_t(), string_t()]);
        assert!(a.structurally_equals(&b));
        assert!(!a.structurally_equals(&c));
        assert!(Type::leaf("x", i32_t()).structurally_equals(&i32_t()));
    }

    #[test]
    fn test_category_queries() {
        let sum = Type::sum(vec![string_t(), Type::elementary(ElementaryType::Bool)]);
        let defined = Type::defined("maybe", sum.clone());
        assert!(defined.is_sum());
        assert!(defined.is_composite());
        assert!(!defined.is_product());
        assert_eq!(defined.members().len(), 2);
        assert!(i32_t().is_elementary());
        assert!(!i32_t().is_composite());
        let function = Type::implication(i32_t(), string_t());
        assert!(!function.is_composite());
        assert!(function.members().is_empty());
    }

    #[test]
    fn test_defined_wrapping_single_type() {
        let defined = Type::defined("meters", Type::leaf("value", i32_t()));
        let members = defined.members();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].leaf_name(), Some("value"));
    }
}
