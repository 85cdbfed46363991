//! Configuration management for menu-maint
//!
//! Handles loading, saving, and validating configuration from TOML files.
//! Every section falls back to the values of the last production run, so a
//! missing config file still yields a complete configuration.

mod defaults;

pub use defaults::*;

use crate::error::{Error, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// PostgreSQL connection URL
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Category type tag identifying dish categories
    #[serde(default = "default_category_type")]
    pub category_type: String,

    /// Source-currency units per one target-currency unit
    #[serde(default = "default_exchange_rate")]
    pub exchange_rate: Decimal,

    /// Keyword classifier rules
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Items inserted by the replacement procedure, in order
    #[serde(default = "default_menu")]
    pub menu: Vec<MenuItem>,

    /// Category reorganization
    #[serde(default)]
    pub reorg: ReorgConfig,

    /// Paths configuration (internal, not user-editable)
    #[serde(skip)]
    pub paths: PathsConfig,
}

/// One replacement menu entry, priced in the source currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub name: String,
    pub price: Decimal,
}

/// A classifier tier: any keyword matching selects `category_id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordRule {
    pub keywords: Vec<String>,
    pub category_id: i32,
}

/// Classifier configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Category used when no rule matches
    #[serde(default = "default_classifier_default_category")]
    pub default_category_id: i32,

    /// Rules in priority order; the first match wins
    #[serde(default = "default_classifier_rules")]
    pub rules: Vec<KeywordRule>,
}

/// Category reorganization configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorgConfig {
    /// Category to rename
    #[serde(default = "default_rename_category_id")]
    pub rename_category_id: i32,

    /// New name for `rename_category_id`
    #[serde(default = "default_rename_to")]
    pub rename_to: String,

    /// Category whose members are redistributed
    #[serde(default = "default_source_category_id")]
    pub source_category_id: i32,

    /// Dish names that stay linked to the source category
    #[serde(default = "default_keep")]
    pub keep: Vec<String>,

    /// Category receiving the `move` dishes
    #[serde(default = "default_move_category_id")]
    pub move_category_id: i32,

    /// Dish names moved out of the source category into `move_category_id`
    #[serde(default = "default_move")]
    pub r#move: Vec<String>,

    /// Name of the category receiving all other source members
    #[serde(default = "default_overflow_category")]
    pub overflow_category: String,
}

/// Internal paths configuration
#[derive(Debug, Clone, Default)]
pub struct PathsConfig {
    /// Base directory for menu-maint files
    pub base_dir: PathBuf,

    /// Path to config file
    pub config_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            category_type: default_category_type(),
            exchange_rate: default_exchange_rate(),
            classifier: ClassifierConfig::default(),
            menu: default_menu(),
            reorg: ReorgConfig::default(),
            paths: PathsConfig::default(),
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            default_category_id: default_classifier_default_category(),
            rules: default_classifier_rules(),
        }
    }
}

impl Default for ReorgConfig {
    fn default() -> Self {
        Self {
            rename_category_id: default_rename_category_id(),
            rename_to: default_rename_to(),
            source_category_id: default_source_category_id(),
            keep: default_keep(),
            move_category_id: default_move_category_id(),
            r#move: default_move(),
            overflow_category: default_overflow_category(),
        }
    }
}

impl Config {
    /// Get the default base directory (~/.menu-maint)
    pub fn default_base_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".menu-maint")
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        Self::default_base_dir().join("config.toml")
    }

    fn init_paths(&mut self, base_dir: Option<PathBuf>) {
        let base = base_dir.unwrap_or_else(Self::default_base_dir);
        self.paths = PathsConfig {
            config_file: base.join("config.toml"),
            base_dir: base,
        };
    }

    /// Load configuration from a specific file path
    pub fn load(config_path: &Path) -> Result<Self> {
        debug!("Loading config from {:?}", config_path);

        if !config_path.exists() {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                config_path.display()
            )));
        }

        let content = std::fs::read_to_string(config_path)?;
        let mut config: Config = toml::from_str(&content)?;

        let base = config_path.parent().unwrap_or(Path::new(".")).to_path_buf();
        config.paths = PathsConfig {
            config_file: config_path.to_path_buf(),
            base_dir: base,
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a base directory, using defaults when no file exists
    pub fn load_from(base_dir: Option<PathBuf>) -> Result<Self> {
        let mut config = Config::default();
        config.init_paths(base_dir);

        if config.paths.config_file.exists() {
            let path = config.paths.config_file.clone();
            return Self::load(&path);
        }

        debug!("No config file found, using defaults");
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.paths.config_file.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&self.paths.config_file, content)?;
        info!("Saved config to {:?}", self.paths.config_file);
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.exchange_rate <= Decimal::ZERO {
            return Err(Error::Config(
                "exchange_rate must be positive".to_string(),
            ));
        }

        if self.category_type.trim().is_empty() {
            return Err(Error::Config("category_type must not be empty".to_string()));
        }

        for (idx, rule) in self.classifier.rules.iter().enumerate() {
            if rule.keywords.is_empty() {
                return Err(Error::Config(format!(
                    "classifier.rules[{}] has no keywords",
                    idx
                )));
            }
            // An empty keyword is a substring of every name
            if rule.keywords.iter().any(|k| k.trim().is_empty()) {
                return Err(Error::Config(format!(
                    "classifier.rules[{}] contains an empty keyword",
                    idx
                )));
            }
        }

        if self.reorg.overflow_category.trim().is_empty() {
            return Err(Error::Config(
                "reorg.overflow_category must not be empty".to_string(),
            ));
        }

        if self.reorg.source_category_id == self.reorg.move_category_id {
            return Err(Error::Config(
                "reorg.move_category_id must differ from reorg.source_category_id".to_string(),
            ));
        }

        let keep: HashSet<String> = self.reorg.keep.iter().map(|n| n.to_uppercase()).collect();
        if let Some(dup) = self
            .reorg
            .r#move
            .iter()
            .find(|n| keep.contains(&n.to_uppercase()))
        {
            return Err(Error::Config(format!(
                "'{}' is listed in both reorg.keep and reorg.move",
                dup
            )));
        }

        Ok(())
    }
}
