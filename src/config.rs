//! Configuration management for qpu-isa.
//!
//! Configuration is loaded from multiple sources in priority order:
//! 1. Environment variables (QPU_ISA_WIDEN_SATURATION, QPU_ISA_SHOW_ENCODING)
//! 2. Project-local config file (`./qpu-isa.toml`)
//! 3. User config file (`~/.config/qpu-isa/config.toml`)
//! 4. Built-in defaults
//!
//! # Config File Format
//!
//! ```toml
//! # qpu-isa.toml
//!
//! [fold]
//! # Fold add/sub followed by 32-bit saturation through a 64-bit intermediate
//! widen_saturation = true
//!
//! [listing]
//! # Prefix listing lines with the encoded instruction word
//! show_encoding = false
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Global cached configuration.
static CONFIG: OnceLock<Config> = OnceLock::new();

/// Constant folding options.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct FoldConfig {
    /// Evaluate 32-bit saturation of add/sub with a widening intermediate.
    pub widen_saturation: Option<bool>,
}

/// Listing output options.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ListingConfig {
    /// Prefix each listing line with the hex instruction word.
    pub show_encoding: Option<bool>,
}

/// qpu-isa configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// `[fold]` section.
    pub fold: FoldConfig,

    /// `[listing]` section.
    pub listing: ListingConfig,
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables
    /// 2. Project-local `qpu-isa.toml`
    /// 3. User config `~/.config/qpu-isa/config.toml`
    /// 4. Defaults
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Some(user_config) = Self::load_user_config() {
            config.merge(user_config);
        }

        if let Some(local_config) = Self::load_local_config() {
            config.merge(local_config);
        }

        // Environment variables override everything
        config.apply_env_overrides();

        config
    }

    /// Get the cached global configuration.
    ///
    /// Loads configuration on first call and caches it.
    pub fn get() -> &'static Config {
        CONFIG.get_or_init(|| {
            let config = Self::load();
            log::debug!("Loaded configuration: {:?}", config);
            config
        })
    }

    /// Whether saturating add/sub folds through a wider intermediate (default on).
    pub fn widen_saturation(&self) -> bool {
        self.fold.widen_saturation.unwrap_or(true)
    }

    /// Whether listing lines show the encoded word (default on).
    pub fn show_encoding(&self) -> bool {
        self.listing.show_encoding.unwrap_or(true)
    }

    /// Load user configuration from ~/.config/qpu-isa/config.toml
    fn load_user_config() -> Option<Self> {
        let config_path = Self::user_config_path()?;
        Self::load_from_file(&config_path)
    }

    /// Load project-local configuration from ./qpu-isa.toml
    fn load_local_config() -> Option<Self> {
        let local_path = Path::new("qpu-isa.toml");
        if let Some(config) = Self::load_from_file(local_path) {
            return Some(config);
        }

        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let project_path = Path::new(&manifest_dir).join("qpu-isa.toml");
            if let Some(config) = Self::load_from_file(&project_path) {
                return Some(config);
            }
        }

        None
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    Some(config)
                }
                Err(e) => {
                    log::warn!("Failed to parse {}: {}", path.display(), e);
                    None
                }
            },
            Err(e) => {
                log::warn!("Failed to read {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Merge another config into this one.
    /// Only overrides fields that are Some in the other config.
    fn merge(&mut self, other: Self) {
        if other.fold.widen_saturation.is_some() {
            self.fold.widen_saturation = other.fold.widen_saturation;
        }
        if other.listing.show_encoding.is_some() {
            self.listing.show_encoding = other.listing.show_encoding;
        }
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Some(value) = env_flag("QPU_ISA_WIDEN_SATURATION") {
            log::info!("Using QPU_ISA_WIDEN_SATURATION from environment: {}", value);
            self.fold.widen_saturation = Some(value);
        }
        if let Some(value) = env_flag("QPU_ISA_SHOW_ENCODING") {
            log::info!("Using QPU_ISA_SHOW_ENCODING from environment: {}", value);
            self.listing.show_encoding = Some(value);
        }
    }

    /// Get the path to the user config file (for display/creation).
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("qpu-isa").join("config.toml"))
    }

    /// Generate a sample config file content.
    pub fn sample_config() -> String {
        r#"# qpu-isa configuration
# Place this file at ~/.config/qpu-isa/config.toml or ./qpu-isa.toml

[fold]
# Fold add/sub followed by 32-bit saturation through a 64-bit intermediate.
# When disabled, such slots are reported as errors.
widen_saturation = true

[listing]
# Prefix listing lines with the encoded instruction word
# show_encoding = true
"#
        .to_string()
    }
}

/// Read a boolean environment variable.
fn env_flag(name: &str) -> Option<bool> {
    let value = std::env::var(name).ok()?;
    parse_flag(&value).or_else(|| {
        log::warn!("Ignoring {}={}: expected a boolean", name, value);
        None
    })
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
