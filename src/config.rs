use anyhow::{Context, Result};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub seed: SeedConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Mongodb,
    Memory,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Mongodb => write!(f, "mongodb"),
            StorageBackend::Memory => write!(f, "memory"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub uri: String,
    pub database: String,
    pub collection: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Mongodb,
            uri: "mongodb://localhost:27017".to_string(),
            database: "avocado".to_string(),
            collection: "avocadosales".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// Replace the whole collection with the dataset before serving
    pub reset_on_start: bool,
    pub dataset_path: PathBuf,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            reset_on_start: false,
            dataset_path: PathBuf::from("data/avocado-sales.json"),
        }
    }
}

impl AppConfig {
    /// Load `config.toml` (or `$CONFIG_PATH`) if present, then apply
    /// environment overrides.
    pub fn load() -> Result<Self> {
        let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = Self::from_file(Path::new(&path))?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        Self::from_toml_str(&text).with_context(|| format!("Invalid config file {:?}", path))
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Overrides from `MONGODB_URI`, `PORT` and `RESET_DB`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(uri) = lookup("MONGODB_URI") {
            self.storage.uri = uri;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("PORT must be a valid port number, got {:?}", port))?;
        }
        if let Some(flag) = lookup("RESET_DB") {
            self.seed.reset_on_start = is_truthy(&flag);
        }
        Ok(())
    }
}

fn is_truthy(value: &str) -> bool {
    let value = value.trim();
    !(value.is_empty() || value == "0" || value.eq_ignore_ascii_case("false"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_file() {
        let config = AppConfig::from_file(Path::new("does/not/exist.toml")).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.storage.backend, StorageBackend::Mongodb);
        assert!(!config.seed.reset_on_start);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [storage]
            backend = "memory"

            [seed]
            reset_on_start = true
            "#,
        )
        .unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.storage.database, "avocado");
        assert!(config.seed.reset_on_start);
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn unknown_backend_is_rejected() {
        assert!(AppConfig::from_toml_str("[storage]\nbackend = \"redis\"").is_err());
    }

    #[test]
    fn env_overrides() {
        let mut config = AppConfig::default();
        config
            .apply_env(env(&[
                ("MONGODB_URI", "mongodb://db:27017"),
                ("PORT", "9000"),
                ("RESET_DB", "true"),
            ]))
            .unwrap();
        assert_eq!(config.storage.uri, "mongodb://db:27017");
        assert_eq!(config.server.port, 9000);
        assert!(config.seed.reset_on_start);
    }

    #[test]
    fn reset_flag_values() {
        for (raw, expected) in [("1", true), ("yes", true), ("0", false), ("FALSE", false), ("", false)] {
            let mut config = AppConfig::default();
            config.apply_env(env(&[("RESET_DB", raw)])).unwrap();
            assert_eq!(config.seed.reset_on_start, expected, "RESET_DB={raw:?}");
        }
    }

    #[test]
    fn bad_port_fails() {
        let mut config = AppConfig::default();
        assert!(config.apply_env(env(&[("PORT", "eighty")])).is_err());
    }
}
