//! The compilation unit.

use std::sync::Arc;

use indexmap::IndexMap;
use tern_core::{ElementaryType, Result};

use crate::global::literal_name;
use crate::ltype::{POINTER_BYTESIZE, elementary_bytesize};
use crate::{
    Function, FunctionId, Global, GlobalId, IdentifierMap, LType, LTypeKind, LoweringOptions,
    RirObject, TypeDef, TypeDefId, invariant,
};

/// One lowered module.
///
/// Owns every function, typedef, and global literal of the module. Tables
/// keep insertion order so that the textual form is deterministic.
#[derive(Debug, Clone)]
pub struct Rir {
    name: String,
    options: LoweringOptions,
    functions: IndexMap<String, Function>,
    /// Keyed by the unique type string of the surface type
    pub(crate) typedefs: IndexMap<String, TypeDef>,
    /// Keyed by literal content
    globals: IndexMap<Arc<str>, Global>,
    map: IdentifierMap,
}

impl Rir {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_options(name, LoweringOptions::default())
    }

    #[must_use]
    pub fn with_options(name: impl Into<String>, options: LoweringOptions) -> Self {
        Self {
            name: name.into(),
            options,
            functions: IndexMap::new(),
            typedefs: IndexMap::new(),
            globals: IndexMap::new(),
            map: IdentifierMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn options(&self) -> &LoweringOptions {
        &self.options
    }

    /// Functions in declaration order
    pub fn functions(&self) -> impl Iterator<Item = &Function> {
        self.functions.values()
    }

    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.get(name)
    }

    pub fn function_by_id(&self, id: FunctionId) -> Option<&Function> {
        self.functions.get_index(id.index()).map(|(_, f)| f)
    }

    /// Typedefs in creation order; members are always created before the
    /// typedefs that contain them
    pub fn typedefs(&self) -> impl Iterator<Item = &TypeDef> {
        self.typedefs.values()
    }

    /// Finds a typedef by its name
    pub fn typedef(&self, name: &str) -> Option<&TypeDef> {
        match self.map.get(name)? {
            RirObject::TypeDef(id) => self.typedef_by_id(id),
            _ => None,
        }
    }

    pub fn typedef_by_id(&self, id: TypeDefId) -> Option<&TypeDef> {
        self.typedefs.get_index(id.index()).map(|(_, t)| t)
    }

    /// Finds the typedef created for the surface type with this unique type string
    pub fn typedef_for_key(&self, unique_type_str: &str) -> Option<TypeDefId> {
        self.typedefs
            .get_index_of(unique_type_str)
            .and_then(|index| TypeDefId::from_index(index).ok())
    }

    /// Global string literals in creation order
    pub fn global_literals(&self) -> impl Iterator<Item = &Global> {
        self.globals.values()
    }

    pub fn global_literal(&self, content: &str) -> Option<&Global> {
        self.globals.get(content)
    }

    pub fn global_by_id(&self, id: GlobalId) -> Option<&Global> {
        self.globals.get_index(id.index()).map(|(_, g)| g)
    }

    /// Unit-wide identifier map: functions, typedefs, and globals
    pub fn identifiers(&self) -> &IdentifierMap {
        &self.map
    }

    /// Textual form of a lowered type, e.g. `u32`, `$point*`
    pub fn type_str(&self, ty: LType) -> String {
        let base = match ty.kind {
            LTypeKind::Elementary(etype) => etype.name().to_string(),
            LTypeKind::Composite(id) => self
                .typedef_by_id(id)
                .map_or_else(|| format!("$<typedef #{}>", id.0), |t| format!("${}", t.name)),
        };
        if ty.is_pointer { format!("{base}*") } else { base }
    }

    /// Target independent size of a value of type `ty`.
    ///
    /// Products take the sum of their members, unions the largest member
    /// plus the discriminant.
    pub fn bytesize(&self, ty: LType) -> u64 {
        if ty.is_pointer {
            return POINTER_BYTESIZE;
        }
        match ty.kind {
            LTypeKind::Elementary(etype) => elementary_bytesize(etype),
            LTypeKind::Composite(id) => {
                let Some(typedef) = self.typedef_by_id(id) else {
                    return 0;
                };
                let sizes = typedef.members.iter().map(|m| self.bytesize(m.ty));
                if typedef.is_union {
                    sizes.max().unwrap_or(0) + POINTER_BYTESIZE
                } else {
                    sizes.sum()
                }
            }
        }
    }

    /// Adds a function, replacing its earlier declaration if there is one.
    pub(crate) fn add_function(&mut self, func: Function) -> Result<FunctionId> {
        if let Some(index) = self.functions.get_index_of(func.name()) {
            self.functions[index] = func;
            return FunctionId::from_index(index);
        }
        let id = FunctionId::from_index(self.functions.len())?;
        self.map.insert(func.name(), RirObject::Function(id))?;
        self.functions.insert(func.name().to_string(), func);
        Ok(id)
    }

    /// Adds a typedef under its surface key.
    pub(crate) fn add_typedef(&mut self, key: String, typedef: TypeDef) -> Result<TypeDefId> {
        if self.typedefs.contains_key(&key) {
            return Err(invariant(format!("typedef for '{key}' created twice")));
        }
        let id = TypeDefId::from_index(self.typedefs.len())?;
        self.map.insert(typedef.name.clone(), RirObject::TypeDef(id))?;
        log::trace!(
            "{}: created {} ${} for '{key}'",
            self.name,
            if typedef.is_union { "uniondef" } else { "typedef" },
            typedef.name
        );
        self.typedefs.insert(key, typedef);
        Ok(id)
    }

    /// Returns the global for a string literal, creating it on first use.
    pub(crate) fn intern_literal(&mut self, content: &str) -> Result<GlobalId> {
        if let Some(index) = self.globals.get_index_of(content) {
            return GlobalId::from_index(index);
        }
        let id = GlobalId::from_index(self.globals.len())?;
        let name = literal_name(&self.options.literal_prefix, content);
        self.map.insert(name.clone(), RirObject::Global(id))?;
        log::trace!("{}: interned literal {name} = {content:?}", self.name);
        let content: Arc<str> = Arc::from(content);
        self.globals.insert(
            content.clone(),
            Global {
                name,
                ty: LType::elementary(ElementaryType::String),
                content,
            },
        );
        Ok(id)
    }
}
