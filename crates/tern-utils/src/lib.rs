//! Project-level utilities for the Tern compiler.

mod config;

pub use config::{CONFIG_FILE, Config, Package};
