//! Core types and utilities for the Tern compiler.
//!
//! This crate provides source spans, the shared error type, and the surface
//! type system produced by semantic analysis and consumed by later stages.

pub mod error;
pub mod span;
pub mod type_system;

pub use error::{Error, Result};
pub use span::{Location, Span};
pub use type_system::{ElementaryType, Type, TypeOp};
