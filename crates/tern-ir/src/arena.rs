//! Object handles and identifier maps.
//!
//! Every RIR object lives in an arena owned by its scope: expressions,
//! blocks, and values by their [`Function`](crate::Function), typedefs,
//! globals, and functions by the [`Rir`](crate::Rir) unit. Objects refer to
//! each other only through the handles defined here, which are plain
//! indices and never own anything.

use std::fmt;

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use tern_core::{Error, Result};

macro_rules! define_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub(crate) u32);

        impl $name {
            /// Position of the object in its arena
            pub const fn index(self) -> usize {
                self.0 as usize
            }

            pub(crate) fn from_index(index: usize) -> Result<Self> {
                u32::try_from(index).map(Self).map_err(|_| {
                    Error::internal(concat!("too many objects for a ", stringify!($name)))
                })
            }
        }
    };
}

define_handle!(
    /// Handle of a value in its function's value table
    ValueId
);
define_handle!(
    /// Handle of an expression in its function's arena
    ExprId
);
define_handle!(
    /// Handle of a block in its function's arena
    BlockId
);
define_handle!(
    /// Handle of a typedef in the unit
    TypeDefId
);
define_handle!(
    /// Handle of a global in the unit
    GlobalId
);
define_handle!(
    /// Handle of a function in the unit
    FunctionId
);

/// Any object that can be found by name in an identifier map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RirObject {
    Expression(ExprId),
    Block(BlockId),
    /// Function argument by position
    Argument(usize),
    Global(GlobalId),
    TypeDef(TypeDefId),
    Function(FunctionId),
}

impl fmt::Display for RirObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expression(id) => write!(f, "expression #{}", id.0),
            Self::Block(id) => write!(f, "block #{}", id.0),
            Self::Argument(n) => write!(f, "argument #{n}"),
            Self::Global(id) => write!(f, "global #{}", id.0),
            Self::TypeDef(id) => write!(f, "typedef #{}", id.0),
            Self::Function(id) => write!(f, "function #{}", id.0),
        }
    }
}

/// Name to object mapping of one scope, with unique keys.
#[derive(Debug, Clone, Default)]
pub struct IdentifierMap {
    entries: IndexMap<String, RirObject, FxBuildHasher>,
}

impl IdentifierMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name` for `object`.
    ///
    /// # Errors
    /// A name collision is an internal error: identifiers are generated by
    /// lowering itself or were already checked by semantic analysis.
    pub fn insert(&mut self, name: impl Into<String>, object: RirObject) -> Result<()> {
        let name = name.into();
        if let Some(existing) = self.entries.get(&name) {
            log::error!("identifier '{name}' already names {existing}, cannot bind it to {object}");
            return Err(Error::internal(format!(
                "identifier '{name}' is already defined"
            )));
        }
        self.entries.insert(name, object);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<RirObject> {
        self.entries.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, RirObject)> {
        self.entries.iter().map(|(name, obj)| (name.as_str(), *obj))
    }
}
