//! Init command implementation

use crate::config::{Config, PathsConfig};
use crate::error::{Error, Result};
use std::path::PathBuf;
use tracing::info;

/// Write the default configuration to `config_path`
pub fn cmd_init(config_path: PathBuf, force: bool) -> Result<Config> {
    if config_path.exists() && !force {
        return Err(Error::AlreadyInitialized(
            config_path.display().to_string(),
        ));
    }

    let mut config = Config::default();
    config.paths = PathsConfig {
        base_dir: config_path
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(Config::default_base_dir),
        config_file: config_path,
    };
    config.save()?;

    info!("Initialized configuration at {:?}", config.paths.config_file);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_loadable_config() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("config.toml");

        cmd_init(path.clone(), false).unwrap();
        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.menu.len(), 34);
        assert_eq!(loaded.reorg.overflow_category, "Pasta/Sandwiches");
    }

    #[test]
    fn test_init_does_not_persist_environment_credentials() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");

        let config = cmd_init(path.clone(), false).unwrap();
        assert_eq!(config.database_url, "postgres://localhost:5432/restaurant");

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains(r#"database_url = "postgres://localhost:5432/restaurant""#));
    }

    #[test]
    fn test_init_refuses_overwrite_without_force() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");

        cmd_init(path.clone(), false).unwrap();
        assert!(matches!(
            cmd_init(path.clone(), false),
            Err(Error::AlreadyInitialized(_))
        ));
        assert!(cmd_init(path, true).is_ok());
    }
}
