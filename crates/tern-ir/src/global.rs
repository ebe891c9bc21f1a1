//! Global constants of a unit.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use rustc_hash::FxHasher;

use crate::LType;

/// A global string literal, deduplicated by content.
#[derive(Debug, Clone, PartialEq)]
pub struct Global {
    pub name: String,
    pub ty: LType,
    pub content: Arc<str>,
}

/// Stable name of the literal with the given content.
///
/// `FxHasher` does not depend on a random seed, so the same content yields
/// the same name in every run.
pub(crate) fn literal_name(prefix: &str, content: &str) -> String {
    format!("{prefix}_{}", stable_hash(content))
}

/// Seed-independent 32 bit hash of a string
pub(crate) fn stable_hash(content: &str) -> u32 {
    let mut hasher = FxHasher::default();
    content.hash(&mut hasher);
    // truncated to keep literal names short
    (hasher.finish() & u64::from(u32::MAX)) as u32
}
