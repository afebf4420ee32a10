use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Placeholder admin address used until a config file names real ones.
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@tipboard.local";

/// Board settings, read from `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Emails that sign in with the admin role.
    pub admin_emails: Vec<String>,

    /// Directory holding `tipboard.db`.
    pub data_dir: Option<PathBuf>,

    /// Default tracing filter, e.g. "info" or "tipboard_core=debug".
    pub log: Option<String>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            admin_emails: vec![DEFAULT_ADMIN_EMAIL.to_string()],
            data_dir: None,
            log: None,
        }
    }
}
