//! Configuration with hierarchical layering.
//!
//! # Architecture
//!
//! ```text
//! Priority (highest to lowest):
//!
//! ┌────────────────────────────────────────────┐
//! │  1. CLI flags (ConfigResolver)             │  Per invocation
//! ├────────────────────────────────────────────┤
//! │  2. Environment Variables (ALMACEN_*)      │  Runtime override
//! ├────────────────────────────────────────────┤
//! │  3. Project Config (.almacen/config.toml)  │  Project-specific
//! ├────────────────────────────────────────────┤
//! │  4. Global Config (~/.almacen/config.toml) │  User defaults
//! ├────────────────────────────────────────────┤
//! │  5. Default Values                         │  Fallback
//! └────────────────────────────────────────────┘
//! ```
//!
//! # Directory Structure
//!
//! ```text
//! ~/.almacen/
//! ├── config.toml        # Global configuration
//! └── storage/           # Session files, one per origin
//!     └── {origin}.json
//!
//! <project>/.almacen/
//! └── config.toml        # Project configuration (overrides global)
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Config Field | Type |
//! |----------|--------------|------|
//! | `ALMACEN_DEBUG` | `debug` | bool |
//! | `ALMACEN_STORAGE_BACKEND` | `storage.backend` | `file` / `memory` |
//! | `ALMACEN_STORAGE_PATH` | `storage.path` | PathBuf |
//! | `ALMACEN_ORIGIN` | `storage.origin` | String |
//! | `ALMACEN_LOG_LEVEL` | `logging.level` | String |
//!
//! # Example Configuration
//!
//! ```toml
//! # ~/.almacen/config.toml
//! debug = false
//!
//! [storage]
//! backend = "file"
//! path = "~/.almacen/storage"
//! origin = "admin.example.com"
//!
//! [logging]
//! level = "warn"
//! ```

mod error;
mod loader;
mod resolver;
mod types;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use resolver::ConfigResolver;
pub use types::{
    AlmacenConfig, ConfigLayer, LoggingConfig, LoggingLayer, StorageBackend, StorageConfig,
    StorageLayer, DEFAULT_LOG_LEVEL, DEFAULT_ORIGIN,
};

/// Default global config file path (`~/.almacen/config.toml`).
fn default_config_path() -> std::path::PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(PROJECT_CONFIG_DIR)
        .join(PROJECT_CONFIG_FILE)
}

/// Project config directory name.
pub const PROJECT_CONFIG_DIR: &str = ".almacen";

/// Project config file name.
pub const PROJECT_CONFIG_FILE: &str = "config.toml";
