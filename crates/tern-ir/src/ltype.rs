//! Lowered types: the minimal type representation of the RIR.

use tern_core::ElementaryType;

use crate::TypeDefId;

/// Structural kind of a lowered type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LTypeKind {
    Elementary(ElementaryType),
    /// Reference to a typedef owned by the unit
    Composite(TypeDefId),
}

/// A lowered type.
///
/// The pointer flag is orthogonal to the structural kind: a stack slot of a
/// `u32` has the same kind as the `u32` stored in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LType {
    pub kind: LTypeKind,
    pub is_pointer: bool,
}

impl LType {
    #[must_use]
    pub const fn elementary(etype: ElementaryType) -> Self {
        Self {
            kind: LTypeKind::Elementary(etype),
            is_pointer: false,
        }
    }

    #[must_use]
    pub const fn composite(typedef: TypeDefId) -> Self {
        Self {
            kind: LTypeKind::Composite(typedef),
            is_pointer: false,
        }
    }

    #[must_use]
    pub const fn nil() -> Self {
        Self::elementary(ElementaryType::Nil)
    }

    /// Same structural kind, pointer-qualified
    #[must_use]
    pub const fn pointer_to(self) -> Self {
        Self {
            kind: self.kind,
            is_pointer: true,
        }
    }

    /// Same structural kind, without the pointer qualifier
    #[must_use]
    pub const fn pointee(self) -> Self {
        Self {
            kind: self.kind,
            is_pointer: false,
        }
    }

    /// Structural equality, ignoring the pointer flag
    pub fn equals(&self, other: &Self) -> bool {
        self.kind == other.kind
    }

    /// Structural equality including the pointer flag
    pub fn identical(&self, other: &Self) -> bool {
        self.equals(other) && self.is_pointer == other.is_pointer
    }

    pub const fn as_elementary(&self) -> Option<ElementaryType> {
        match self.kind {
            LTypeKind::Elementary(etype) => Some(etype),
            LTypeKind::Composite(_) => None,
        }
    }

    pub const fn typedef(&self) -> Option<TypeDefId> {
        match self.kind {
            LTypeKind::Composite(id) => Some(id),
            LTypeKind::Elementary(_) => None,
        }
    }

    pub const fn is_elementary(&self) -> bool {
        matches!(self.kind, LTypeKind::Elementary(_))
    }

    pub const fn is_composite(&self) -> bool {
        matches!(self.kind, LTypeKind::Composite(_))
    }

    pub fn is_nil(&self) -> bool {
        !self.is_pointer && self.as_elementary() == Some(ElementaryType::Nil)
    }

    pub fn is_bool(&self) -> bool {
        !self.is_pointer && self.as_elementary() == Some(ElementaryType::Bool)
    }

    /// Returns true for non-pointer numeric values
    pub fn is_numeric(&self) -> bool {
        !self.is_pointer && self.as_elementary().is_some_and(ElementaryType::is_numeric)
    }
}

/// Size in bytes of an elementary value, independent of the target.
///
/// Strings are stored as a pointer to their data.
pub const fn elementary_bytesize(etype: ElementaryType) -> u64 {
    match etype {
        ElementaryType::I8 | ElementaryType::U8 | ElementaryType::Bool => 1,
        ElementaryType::I16 | ElementaryType::U16 => 2,
        ElementaryType::I32 | ElementaryType::U32 | ElementaryType::F32 => 4,
        ElementaryType::I64
        | ElementaryType::U64
        | ElementaryType::F64
        | ElementaryType::String => 8,
        ElementaryType::Nil => 0,
    }
}

/// Size of a pointer and of a union discriminant
pub const POINTER_BYTESIZE: u64 = 8;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_ignores_pointer_flag() {
        let value = LType::elementary(ElementaryType::U32);
        let slot = value.pointer_to();
        assert!(value.equals(&slot));
        assert!(!value.identical(&slot));
        assert!(slot.pointee().identical(&value));
    }

    #[test]
    fn test_elementary_reflexivity() {
        for etype in ElementaryType::ALL {
            let a = LType::elementary(etype);
            let b = LType::elementary(etype);
            assert!(a.identical(&b));
            for other in ElementaryType::ALL.into_iter().filter(|o| *o != etype) {
                assert!(!a.equals(&LType::elementary(other)));
            }
        }
    }

    #[test]
    fn test_composite_queries() {
        let ty = LType::composite(TypeDefId(3));
        assert!(ty.is_composite());
        assert_eq!(ty.typedef(), Some(TypeDefId(3)));
        assert!(ty.as_elementary().is_none());
        assert!(!ty.is_numeric());
    }

    #[test]
    fn test_elementary_sizes() {
        assert_eq!(elementary_bytesize(ElementaryType::Bool), 1);
        assert_eq!(elementary_bytesize(ElementaryType::I16), 2);
        assert_eq!(elementary_bytesize(ElementaryType::F32), 4);
        assert_eq!(elementary_bytesize(ElementaryType::U64), 8);
        assert_eq!(elementary_bytesize(ElementaryType::Nil), 0);
    }
}
