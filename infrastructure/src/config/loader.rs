//! Configuration loader with multi-source merging, reshaped from the
//! teacher's figment-based `ConfigLoader` (same priority ladder, host fields
//! instead of council/behavior/output/repl ones).

use super::host_config::FileConfig;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use mcphost_domain::HostError;
use std::path::PathBuf;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority.
    ///
    /// Priority (highest to lowest):
    /// 1. Explicit config path (if provided)
    /// 2. Project root: `./mcphost.toml` or `./.mcphost.toml`
    /// 3. XDG config: `$XDG_CONFIG_HOME/mcphost/config.toml`
    /// 4. Environment variables prefixed `MCPHOST_`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, HostError> {
        let mut figment = Figment::new()
            .merge(Serialized::defaults(FileConfig::default()))
            .merge(Env::prefixed("MCPHOST_").split("_"));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(&global_path).nested());
            }
        }

        for filename in &["mcphost.toml", ".mcphost.toml"] {
            let path = PathBuf::from(filename);
            if path.exists() {
                figment = figment.merge(Toml::file(&path));
                break;
            }
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path).nested());
        }

        let config: FileConfig = figment
            .extract()
            .map_err(|e| HostError::ConfigInvalid(e.to_string()))?;

        config
            .validate()
            .map_err(|e| HostError::ConfigInvalid(e.to_string()))?;

        Ok(config)
    }

    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// `$XDG_CONFIG_HOME/mcphost/config.toml`, falling back to
    /// `~/.config/mcphost/config.toml`.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("mcphost").join("config.toml"))
    }

    pub fn project_config_path() -> Option<PathBuf> {
        for filename in &["mcphost.toml", ".mcphost.toml"] {
            let path = PathBuf::from(filename);
            if path.exists() {
                return Some(path);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_defaults_is_valid() {
        let config = ConfigLoader::load_defaults();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("mcphost"));
    }
}
