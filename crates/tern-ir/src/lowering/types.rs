//! Lowering of surface types into lowered types and typedefs.

use tern_core::{Result, Type};

use crate::global::stable_hash;
use crate::{LType, Rir, TypeDef, TypeDefId, TypeMember, invariant};

impl Rir {
    /// Lowers a surface type.
    ///
    /// Elementary types map one to one. Products, sums, and defined types
    /// become a reference to a typedef of this unit, created on first use
    /// and reused for every later occurrence of the same surface type. The
    /// result is never pointer-qualified; lowering sites add that.
    ///
    /// # Errors
    /// Function types have no value representation and are an internal error.
    pub fn lower_type(&mut self, ty: &Type) -> Result<LType> {
        let ty = ty.strip_leaf();
        if let Some(etype) = ty.as_elementary() {
            return Ok(LType::elementary(etype));
        }
        if !ty.is_composite() {
            return Err(invariant(format!(
                "type '{ty}' cannot be lowered to a value type"
            )));
        }
        self.typedef_for(ty).map(LType::composite)
    }

    fn typedef_for(&mut self, ty: &Type) -> Result<TypeDefId> {
        let key = ty.unique_type_str();
        if let Some(id) = self.typedef_for_key(&key) {
            return Ok(id);
        }

        let mut members = Vec::new();
        for member in ty.members() {
            members.push(TypeMember {
                name: member.leaf_name().map(str::to_string),
                ty: self.lower_type(member)?,
            });
        }

        let name = match ty {
            Type::Defined { name, .. } => name.clone(),
            _ => format!("anon_{}", stable_hash(&key)),
        };
        let typedef = TypeDef {
            name,
            is_union: ty.is_sum(),
            members,
        };
        self.add_typedef(key, typedef)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tern_core::ElementaryType;

    fn elem(etype: ElementaryType) -> Arc<Type> {
        Type::elementary(etype)
    }

    #[test]
    fn test_elementary_types_map_one_to_one() {
        let mut rir = Rir::new("test");
        for etype in ElementaryType::ALL {
            let lowered = rir.lower_type(&elem(etype)).unwrap();
            assert_eq!(lowered.as_elementary(), Some(etype));
            assert!(!lowered.is_pointer);
        }
        assert_eq!(rir.typedefs().count(), 0);
    }

    #[test]
    fn test_composite_types_are_deduplicated() {
        let mut rir = Rir::new("test");
        let point = Type::defined(
            "point",
            Type::product(vec![
                Type::leaf("x", elem(ElementaryType::I32)),
                Type::leaf("y", elem(ElementaryType::I32)),
            ]),
        );
        let first = rir.lower_type(&point).unwrap();
        let second = rir.lower_type(&Type::leaf("p", point)).unwrap();
        assert!(first.identical(&second));
        assert_eq!(rir.typedefs().count(), 1);

        let typedef = rir.typedef("point").unwrap();
        assert!(!typedef.is_union);
        assert_eq!(typedef.members[1].name.as_deref(), Some("y"));
    }

    #[test]
    fn test_nested_members_are_created_first() {
        let mut rir = Rir::new("test");
        let shape = Type::defined(
            "shape",
            Type::sum(vec![
                Type::product(vec![elem(ElementaryType::F32), elem(ElementaryType::F32)]),
                elem(ElementaryType::String),
            ]),
        );
        let lowered = rir.lower_type(&shape).unwrap();
        let names: Vec<_> = rir.typedefs().map(|t| t.name.as_str()).collect();
        assert_eq!(names.len(), 2);
        assert!(names[0].starts_with("anon_"));
        assert_eq!(names[1], "shape");

        let shape_def = rir.typedef_by_id(lowered.typedef().unwrap()).unwrap();
        assert!(shape_def.is_union);
        assert!(shape_def.members[0].ty.is_composite());
    }

    #[test]
    fn test_function_type_is_rejected() {
        let mut rir = Rir::new("test");
        let fn_type = Type::implication(elem(ElementaryType::U32), elem(ElementaryType::U64));
        assert!(rir.lower_type(&fn_type).unwrap_err().is_internal());
    }
}
