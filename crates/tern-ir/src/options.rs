//! Options controlling the lowering pass.

use serde::{Deserialize, Serialize};

/// Options for [`lower_module`](crate::lower_module).
///
/// Read from the `[lowering]` section of `tern.toml`; every field has a
/// default so the section may be omitted or partial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoweringOptions {
    /// Prefix of global string literal names, e.g. `gstr` in `gstr_1234`
    pub literal_prefix: String,
    /// Run the structural verifier once a unit is lowered
    pub verify: bool,
}

impl Default for LoweringOptions {
    fn default() -> Self {
        Self {
            literal_prefix: "gstr".to_string(),
            verify: true,
        }
    }
}
