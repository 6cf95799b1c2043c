//! Configuration loader with hierarchical merging.
//!
//! # Load Order
//!
//! 1. Default values
//! 2. Global config (`~/.almacen/config.toml`)
//! 3. Project config (`<root>/.almacen/config.toml`)
//! 4. Environment variables (`ALMACEN_*`)
//!
//! Each layer overrides the previous for every key it sets, even when the
//! value equals the default.

use super::{
    default_config_path, AlmacenConfig, ConfigError, ConfigLayer, StorageBackend,
    PROJECT_CONFIG_DIR, PROJECT_CONFIG_FILE,
};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Parses a boolean environment variable into `$field`.
macro_rules! parse_env_bool {
    ($env:expr, $field:expr, $var:literal) => {
        if let Some(val) = $env($var) {
            $field = parse_bool(&val)
                .ok_or_else(|| ConfigError::invalid_env_var($var, "expected bool"))?;
        }
    };
}

/// Configuration loader with builder pattern.
///
/// # Example
///
/// ```no_run
/// use almacen_runtime::config::ConfigLoader;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ConfigLoader::new()
///     .with_project_root("/path/to/project")
///     .load()?;
/// println!("origin: {}", config.storage.origin);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    /// Global config file path (defaults to ~/.almacen/config.toml).
    global_config_path: Option<PathBuf>,

    /// Project root directory.
    project_root: Option<PathBuf>,

    skip_env: bool,
    skip_global: bool,
    skip_project: bool,
}

impl ConfigLoader {
    /// Creates a new loader with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom global config path.
    #[must_use]
    pub fn with_global_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.global_config_path = Some(path.into());
        self
    }

    /// Sets the project root directory.
    ///
    /// Project config will be loaded from `<project_root>/.almacen/config.toml`.
    #[must_use]
    pub fn with_project_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.project_root = Some(path.into());
        self
    }

    /// Skips environment variable loading.
    #[must_use]
    pub fn skip_env_vars(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Skips global config loading.
    #[must_use]
    pub fn skip_global_config(mut self) -> Self {
        self.skip_global = true;
        self
    }

    /// Skips project config loading.
    #[must_use]
    pub fn skip_project_config(mut self) -> Self {
        self.skip_project = true;
        self
    }

    /// Loads and merges configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a config file exists but cannot be read or
    /// parsed, or an `ALMACEN_*` variable holds an invalid value. Missing
    /// config files are ignored.
    pub fn load(&self) -> Result<AlmacenConfig, ConfigError> {
        self.load_with(&|name| std::env::var(name).ok())
    }

    fn load_with(
        &self,
        env: &dyn Fn(&str) -> Option<String>,
    ) -> Result<AlmacenConfig, ConfigError> {
        let mut config = AlmacenConfig::default();

        if !self.skip_global {
            let global_path = self
                .global_config_path
                .clone()
                .unwrap_or_else(default_config_path);

            if let Some(global_layer) = load_file(&global_path)? {
                debug!(path = %global_path.display(), "Loaded global config");
                config.merge(&global_layer);
            }
        }

        if !self.skip_project {
            if let Some(ref project_root) = self.project_root {
                let project_config_path = project_root
                    .join(PROJECT_CONFIG_DIR)
                    .join(PROJECT_CONFIG_FILE);

                if let Some(project_layer) = load_file(&project_config_path)? {
                    debug!(
                        path = %project_config_path.display(),
                        project = %project_root.display(),
                        "Loaded project config"
                    );
                    config.merge(&project_layer);
                }
            }
        }

        if !self.skip_env {
            apply_env_vars(&mut config, env)?;
        }

        Ok(config)
    }
}

/// Loads a config file, returning `None` if it doesn't exist.
fn load_file(path: &Path) -> Result<Option<ConfigLayer>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
    let layer = ConfigLayer::from_toml(&content).map_err(|e| ConfigError::parse_toml(path, e))?;

    Ok(Some(layer))
}

fn apply_env_vars(
    config: &mut AlmacenConfig,
    env: &dyn Fn(&str) -> Option<String>,
) -> Result<(), ConfigError> {
    parse_env_bool!(env, config.debug, "ALMACEN_DEBUG");

    if let Some(val) = env("ALMACEN_STORAGE_BACKEND") {
        config.storage.backend = StorageBackend::parse(&val).ok_or_else(|| {
            ConfigError::invalid_env_var("ALMACEN_STORAGE_BACKEND", "expected 'file' or 'memory'")
        })?;
    }
    if let Some(val) = env("ALMACEN_STORAGE_PATH") {
        config.storage.path = Some(PathBuf::from(val));
    }
    if let Some(val) = env("ALMACEN_ORIGIN") {
        config.storage.origin = val;
    }
    if let Some(val) = env("ALMACEN_LOG_LEVEL") {
        config.logging.level = val;
    }

    Ok(())
}

/// Parses a boolean from string.
///
/// Accepts: "true", "false", "1", "0", "yes", "no", "on", "off"
/// (case-insensitive).
fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
