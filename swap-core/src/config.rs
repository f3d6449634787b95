use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::SwapError;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://swap_platform.db?mode=rwc";
pub const DEFAULT_HTTP_PORT: u16 = 8000;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SwapConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServiceConfig {
    pub log_level: String,
    /// Seed the sample catalog at startup when the items table is empty
    pub seed_on_start: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            seed_on_start: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: 5,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HttpConfig {
    pub enabled: bool,
    pub host: String,
    pub port: u16,
    pub cors_allow_any: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: "0.0.0.0".to_string(),
            port: DEFAULT_HTTP_PORT,
            cors_allow_any: true,
        }
    }
}

impl HttpConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl SwapConfig {
    /// Load config from an optional TOML file, then `SWAP__SECTION__KEY`
    /// environment overrides, then the plain `DATABASE_URL` / `PORT` variables.
    pub fn load(path: &str) -> Result<Self, SwapError> {
        let s = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("SWAP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        let mut config: SwapConfig = s.try_deserialize()?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse config from a TOML string. Missing sections fall back to defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(content, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()) {
            self.database.url = url;
        }
        if let Some(port) = lookup("PORT") {
            self.http.port = port
                .trim()
                .parse()
                .map_err(|e| ConfigError::Message(format!("invalid PORT {:?}: {}", port, e)))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults_use_local_sqlite_file() {
        let config = SwapConfig::default();
        assert_eq!(config.database.url, DEFAULT_DATABASE_URL);
        assert_eq!(config.http.port, 8000);
        assert!(config.service.seed_on_start);
        assert_eq!(config.http.bind_addr(), "0.0.0.0:8000");
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let toml = r#"
[database]
url = "sqlite::memory:"
max_connections = 1
"#;
        let config = SwapConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.database.max_connections, 1);
        assert_eq!(config.http.port, DEFAULT_HTTP_PORT);
        assert_eq!(config.service.log_level, "info");
    }

    #[test]
    fn test_env_overrides_database_url_and_port() {
        let env: HashMap<&str, &str> =
            HashMap::from([("DATABASE_URL", "sqlite://other.db"), ("PORT", "9100")]);
        let mut config = SwapConfig::default();
        config
            .apply_env_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.database.url, "sqlite://other.db");
        assert_eq!(config.http.port, 9100);
    }

    #[test]
    fn test_blank_database_url_is_ignored() {
        let mut config = SwapConfig::default();
        config
            .apply_env_overrides(|k| (k == "DATABASE_URL").then(|| "  ".to_string()))
            .unwrap();
        assert_eq!(config.database.url, DEFAULT_DATABASE_URL);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let mut config = SwapConfig::default();
        let result = config.apply_env_overrides(|k| (k == "PORT").then(|| "eighty".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_reports_malformed_file_as_config_error() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[http]\nport = \"not a number\"").unwrap();

        let path = file.path().to_string_lossy().into_owned();
        let err = SwapConfig::load(&path).unwrap_err();
        assert!(matches!(err, SwapError::Config(_)), "got {:?}", err);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = SwapConfig::load("/nonexistent/swap-missing.toml").unwrap();
        assert_eq!(config.service.log_level, "info");
        assert!(config.http.enabled);
    }
}
