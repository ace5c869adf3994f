//! Loading and saving the chain configuration file.
//!
//! Chains are configured in `~/.xchain/chains.toml` by default. A missing file
//! yields an empty [`ChainsConfig`]; a present file must parse and validate.
//!
//! # Examples
//!
//! ```no_run
//! use xchain_core::config_loader::ConfigLoader;
//!
//! let loader = ConfigLoader::new().expect("failed to create loader");
//! if !loader.exists() {
//!     loader.write_default().expect("failed to write default config");
//! }
//! let chains = loader.load().expect("failed to load config");
//! println!("{} chains configured", chains.chains.len());
//! ```
//!
//! ```
//! use std::path::PathBuf;
//! use xchain_core::config_loader::ConfigLoader;
//!
//! let loader = ConfigLoader::with_base_dir(PathBuf::from("/etc/xchain"));
//! assert_eq!(loader.config_path(), PathBuf::from("/etc/xchain/chains.toml"));
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::ChainsConfig;
use crate::error::ConfigError;

/// The configuration file name.
const CONFIG_FILE_NAME: &str = "chains.toml";

/// The base directory name within the home directory.
const BASE_DIR_NAME: &str = ".xchain";

/// Reads and writes the chain configuration file.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    base_dir: PathBuf,
}

impl ConfigLoader {
    /// Creates a loader rooted at `~/.xchain`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoHomeDirectory`] if the home directory cannot be determined.
    pub fn new() -> Result<Self, ConfigError> {
        Ok(Self {
            base_dir: default_base_dir()?,
        })
    }

    /// Creates a loader rooted at `base_dir`.
    #[must_use]
    pub const fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Path of the configuration file.
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.base_dir.join(CONFIG_FILE_NAME)
    }

    /// The base directory.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Loads the configuration, returning an empty one if the file is absent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseFailed`] on invalid TOML,
    /// [`ConfigError::InvalidValue`] if validation fails, or
    /// [`ConfigError::Io`] if the file cannot be read.
    pub fn load(&self) -> Result<ChainsConfig, ConfigError> {
        let path = self.config_path();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no chain configuration, using empty set");
            return Ok(ChainsConfig::default());
        }
        Self::load_from_path(&path)
    }

    /// Loads the configuration, failing if the file is absent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FileNotFound`] if the file does not exist, plus
    /// every error of [`load`](Self::load).
    pub fn load_required(&self) -> Result<ChainsConfig, ConfigError> {
        let path = self.config_path();
        if !path.exists() {
            return Err(ConfigError::file_not_found(path.display().to_string()));
        }
        Self::load_from_path(&path)
    }

    /// Writes `config` to the configuration file, creating the base directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] on write failure or
    /// [`ConfigError::ParseFailed`] if serialisation fails.
    pub fn save(&self, config: &ChainsConfig) -> Result<(), ConfigError> {
        self.ensure_base_dir()?;
        let path = self.config_path();
        let text = toml::to_string_pretty(config).map_err(|e| {
            ConfigError::parse_failed(format!("failed to serialize configuration: {e}"))
        })?;
        fs::write(&path, text).map_err(|e| {
            ConfigError::io(format!("failed to write configuration to {}", path.display()), e)
        })
    }

    /// Writes [`ChainsConfig::default_toml`] to the configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] on write failure.
    pub fn write_default(&self) -> Result<(), ConfigError> {
        self.ensure_base_dir()?;
        let path = self.config_path();
        fs::write(&path, ChainsConfig::default_toml()).map_err(|e| {
            ConfigError::io(
                format!("failed to write default configuration to {}", path.display()),
                e,
            )
        })?;
        tracing::info!(path = %path.display(), "wrote default chain configuration");
        Ok(())
    }

    /// Returns `true` if the configuration file exists.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.config_path().exists()
    }

    fn ensure_base_dir(&self) -> Result<(), ConfigError> {
        if !self.base_dir.exists() {
            fs::create_dir_all(&self.base_dir).map_err(|e| {
                ConfigError::io(
                    format!("failed to create base directory {}", self.base_dir.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }

    fn load_from_path(path: &Path) -> Result<ChainsConfig, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::io(format!("failed to read {}", path.display()), e))?;
        let config: ChainsConfig = toml::from_str(&content).map_err(|e| {
            ConfigError::parse_failed(format!("invalid TOML in {}: {e}", path.display()))
        })?;
        config.validate()?;
        tracing::debug!(
            path = %path.display(),
            chains = config.chains.len(),
            "loaded chain configuration"
        );
        Ok(config)
    }
}

/// Expands a leading `~` to the home directory.
///
/// # Errors
///
/// Returns [`ConfigError::NoHomeDirectory`] if the path starts with `~` and
/// the home directory cannot be determined.
pub fn expand_path(path: &str) -> Result<PathBuf, ConfigError> {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = dirs::home_dir().ok_or_else(ConfigError::no_home_directory)?;
        Ok(home.join(rest))
    } else if path == "~" {
        dirs::home_dir().ok_or_else(ConfigError::no_home_directory)
    } else {
        Ok(PathBuf::from(path))
    }
}

/// Returns `~/.xchain`.
///
/// # Errors
///
/// Returns [`ConfigError::NoHomeDirectory`] if the home directory cannot be determined.
pub fn default_base_dir() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or_else(ConfigError::no_home_directory)?;
    Ok(home.join(BASE_DIR_NAME))
}

/// Loads the configuration from the default location.
///
/// # Errors
///
/// See [`ConfigLoader::new`] and [`ConfigLoader::load`].
pub fn load_config() -> Result<ChainsConfig, ConfigError> {
    ConfigLoader::new()?.load()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used)]

    use super::*;
    use crate::asset::NativeAsset;
    use crate::config::ChainConfig;
    use tempfile::TempDir;

    #[test]
    fn test_expand_path_with_tilde_prefix() {
        let path = expand_path("~/.xchain/chains.toml").expect("should succeed");
        let home = dirs::home_dir().expect("home dir should exist");
        assert_eq!(path, home.join(".xchain/chains.toml"));
    }

    #[test]
    fn test_expand_path_leaves_other_paths() {
        assert_eq!(
            expand_path("/etc/xchain/chains.toml").unwrap(),
            PathBuf::from("/etc/xchain/chains.toml")
        );
        assert_eq!(
            expand_path("/path/to/~/chains.toml").unwrap(),
            PathBuf::from("/path/to/~/chains.toml")
        );
    }

    #[test]
    fn test_load_missing_file_returns_empty() {
        let dir = TempDir::new().unwrap();
        let loader = ConfigLoader::with_base_dir(dir.path().to_path_buf());
        assert!(!loader.exists());
        assert!(loader.load().unwrap().chains.is_empty());
    }

    #[test]
    fn test_load_required_missing_file() {
        let dir = TempDir::new().unwrap();
        let loader = ConfigLoader::with_base_dir(dir.path().to_path_buf());
        let err = loader.load_required().unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }

    #[test]
    fn test_write_default_then_load() {
        let dir = TempDir::new().unwrap();
        let loader = ConfigLoader::with_base_dir(dir.path().join("nested"));
        loader.write_default().unwrap();
        assert!(loader.exists());
        let config = loader.load_required().unwrap();
        assert!(config.get(NativeAsset::Atom).is_some());
    }

    #[test]
    fn test_save_round_trip() {
        let dir = TempDir::new().unwrap();
        let loader = ConfigLoader::with_base_dir(dir.path().to_path_buf());
        let config = ChainsConfig {
            chains: vec![ChainConfig::new(NativeAsset::Sol).with_decimals(9)],
        };
        loader.save(&config).unwrap();
        assert_eq!(loader.load().unwrap(), config);
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let loader = ConfigLoader::with_base_dir(dir.path().to_path_buf());
        fs::write(loader.config_path(), "[[chain]\nchain = ").unwrap();
        let err = loader.load().unwrap_err();
        assert!(matches!(err, ConfigError::ParseFailed { .. }));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let dir = TempDir::new().unwrap();
        let loader = ConfigLoader::with_base_dir(dir.path().to_path_buf());
        fs::write(
            loader.config_path(),
            "[[chain]]\nchain = \"ATOM\"\nprotocol = \"cosmos\"\n",
        )
        .unwrap();
        let err = loader.load().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }
}
