//! Symbol tables attached to analyzed scopes.

use std::sync::Arc;

use indexmap::IndexMap;
use tern_core::Type;

/// A resolved symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolRecord {
    /// The resolved type of the symbol
    pub ty: Arc<Type>,
    /// Opaque slot reserved for the code generator. Lowering never reads it.
    pub backend_handle: Option<u64>,
}

impl SymbolRecord {
    pub fn new(ty: Arc<Type>) -> Self {
        Self {
            ty,
            backend_handle: None,
        }
    }
}

/// Names declared in one scope, in declaration order.
///
/// Lookups that need to see enclosing scopes are the responsibility of the
/// consumer, which walks its own scope stack.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolTable {
    records: IndexMap<String, SymbolRecord>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a symbol.
    ///
    /// # Returns
    /// * `Ok(())` if the symbol was declared
    /// * `Err` if a symbol with the same name already exists in this scope
    pub fn declare(&mut self, name: impl Into<String>, ty: Arc<Type>) -> Result<(), String> {
        let name = name.into();
        if self.records.contains_key(&name) {
            return Err(format!("Symbol '{name}' is already defined in this scope"));
        }
        self.records.insert(name, SymbolRecord::new(ty));
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<&SymbolRecord> {
        self.records.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SymbolRecord)> {
        self.records.iter().map(|(name, record)| (name.as_str(), record))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
