use std::path::Path;

use serde::{Deserialize, Serialize};

use ldb_kv::IdConfig;
use ldb_types::DisplaySlot;

use crate::error::{LdbError, LdbResult};

/// Configuration for an [`Ldb`](crate::Ldb) facade.
///
/// ```toml
/// display_slot = "sidebar"
///
/// [ids]
/// strategy = "random"
/// min = -2147483647
/// max = 2147483647
/// max_attempts = 64
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LdbConfig {
    /// Slot used by `show_database` / `hide_database`.
    pub display_slot: DisplaySlot,
    /// Correlation identifier allocation.
    pub ids: IdConfig,
}

impl LdbConfig {
    pub fn from_toml_str(s: &str) -> LdbResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| LdbError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> LdbResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> LdbResult<String> {
        toml::to_string_pretty(self).map_err(|e| LdbError::Config(e.to_string()))
    }

    pub fn validate(&self) -> LdbResult<()> {
        self.ids
            .validate()
            .map_err(|e| LdbError::Config(e.to_string()))
    }
}
