//! Configuration for the guestlist admin console.
//!
//! Provides TOML-based configuration with:
//! - Server URL resolution (CLI flag → `GUESTLIST_SERVER_URL` → config → default)
//! - Request and refresh timeouts for the session-aware client
//! - Config file layering (user config dir + project-local `guestlist.toml`)
//! - Location of the local form-draft file

pub mod discovery;
pub mod error;
pub mod types;

pub use discovery::{
    load_config, load_config_file, save_config, xdg_config_dir, xdg_config_path, ConfigSource,
    LoadedConfig,
};
pub use error::{ConfigError, Result};
pub use types::*;
