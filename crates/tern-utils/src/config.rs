//! Configuration file handling for Tern projects.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tern_ir::LoweringOptions;

/// Name of the project configuration file
pub const CONFIG_FILE: &str = "tern.toml";

/// Represents the tern.toml configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub package: Package,
    /// Options of the AST to RIR lowering pass
    #[serde(default)]
    pub lowering: LoweringOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
    pub name: String,
    pub version: String,
    #[serde(default = "default_edition")]
    pub edition: String,
}

fn default_edition() -> String {
    "2026".to_string()
}

impl Config {
    /// Creates a new default configuration with the given project name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            package: Package {
                name: name.into(),
                version: "0.1.0".to_string(),
                edition: default_edition(),
            },
            lowering: LoweringOptions::default(),
        }
    }

    /// Loads configuration from a tern.toml file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        toml::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Saves configuration to a tern.toml file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let contents =
            toml::to_string_pretty(self).with_context(|| "Failed to serialize configuration")?;

        fs::write(path.as_ref(), contents)
            .with_context(|| format!("Failed to write {}", path.as_ref().display()))
    }

    /// Finds tern.toml starting from the current directory.
    ///
    /// # Errors
    /// Returns an error if no tern.toml is found in the current or parent directories.
    pub fn find() -> Result<(Self, PathBuf)> {
        let current_dir =
            std::env::current_dir().with_context(|| "Failed to get current directory")?;
        Self::find_from(current_dir)
    }

    /// Finds tern.toml in `start` or the closest parent directory holding one.
    ///
    /// # Errors
    /// Returns an error if no directory up to the root has a tern.toml.
    pub fn find_from(start: impl Into<PathBuf>) -> Result<(Self, PathBuf)> {
        let mut dir = start.into();
        loop {
            let config_path = dir.join(CONFIG_FILE);
            if config_path.exists() {
                let config = Self::load(&config_path)?;
                return Ok((config, dir));
            }

            if !dir.pop() {
                anyhow::bail!("Could not find {CONFIG_FILE} in the directory or any parent directory");
            }
        }
    }
}
