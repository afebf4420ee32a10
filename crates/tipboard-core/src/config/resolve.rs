use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::types::BoardConfig;

/// Where the active configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "{}", path.display()),
            ConfigSource::Defaults => f.write_str("built-in defaults"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: BoardConfig,
    pub source: ConfigSource,
}

/// Load the board configuration.
///
/// Searched in order, first existing file wins:
/// 1. `.tipboard/config.toml` in the working directory
/// 2. `~/.config/tipboard/config.toml`
///
/// With neither present the defaults apply. A file that exists but does not
/// parse is an error.
pub fn load_config() -> Result<LoadedConfig> {
    let mut candidates = vec![PathBuf::from(".tipboard/config.toml")];
    if let Some(home) = home_dir() {
        candidates.push(home.join(".config/tipboard/config.toml"));
    }
    load_first(&candidates)
}

fn load_first(candidates: &[PathBuf]) -> Result<LoadedConfig> {
    for path in candidates {
        if path.is_file() {
            let config = parse_config_file(path)?;
            return Ok(LoadedConfig {
                config,
                source: ConfigSource::File(path.clone()),
            });
        }
    }
    Ok(LoadedConfig {
        config: BoardConfig::default(),
        source: ConfigSource::Defaults,
    })
}

fn parse_config_file(path: &Path) -> Result<BoardConfig> {
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    toml::from_str(&contents).with_context(|| format!("parsing {}", path.display()))
}

/// Default database location.
///
/// `config.data_dir` when set, else `$XDG_DATA_HOME/tipboard`, else
/// `~/.local/share/tipboard`. The directory is created if missing.
pub fn default_db_path(config: &BoardConfig) -> Result<PathBuf> {
    let data_dir = config.data_dir.clone().unwrap_or_else(data_dir_fallback);
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("creating data directory {}", data_dir.display()))?;
    Ok(data_dir.join("tipboard.db"))
}

fn data_dir_fallback() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .ok()
        .filter(|d| !d.is_empty())
        .map(|d| PathBuf::from(d).join("tipboard"))
        .unwrap_or_else(|| {
            home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".local/share/tipboard")
        })
}

/// Platform-aware home directory lookup.
pub fn home_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE").ok().map(PathBuf::from)
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME").ok().map(PathBuf::from)
    }
}
