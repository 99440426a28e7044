use std::path::PathBuf;

use serde::Deserialize;

use crate::progress::WritePolicy;

/// Where the problem catalog comes from.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct CatalogConfig {
    /// TOML file with a `[[problems]]` array. The built-in catalog is used
    /// when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Progress tracking configuration.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ProgressConfig {
    /// Default: `always`.
    #[serde(default)]
    pub write_policy: WritePolicy,
}
