pub mod resolve;
pub mod types;

pub use resolve::{default_db_path, home_dir, load_config, ConfigSource, LoadedConfig};
pub use types::{BoardConfig, DEFAULT_ADMIN_EMAIL};
