//! Named composite type definitions.

use crate::LType;

/// One member of a typedef.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMember {
    /// Member name, if the surface type named it
    pub name: Option<String>,
    pub ty: LType,
}

/// A named product or union layout, owned and deduplicated by the unit.
///
/// A union reserves a discriminant slot ahead of its member storage; only
/// one member is live at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDef {
    pub name: String,
    pub is_union: bool,
    pub members: Vec<TypeMember>,
}

impl TypeDef {
    pub fn member(&self, index: u32) -> Option<&TypeMember> {
        self.members.get(index as usize)
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}
