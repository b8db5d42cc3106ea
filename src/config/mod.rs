use std::path::PathBuf;
use std::time::Duration;

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CREDENTIALS_PATH: &str = ".lawdesk/credentials.json";

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Plain,
    Json,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppConfig {
    pub api_url: String,
    pub api_timeout_secs: u64,
    pub credentials_path: PathBuf,
    #[serde(default)]
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_timeout_secs: DEFAULT_API_TIMEOUT_SECS,
            credentials_path: PathBuf::from(DEFAULT_CREDENTIALS_PATH),
            log_format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    /// Reads `API_URL`, `API_TIMEOUT_SECS`, `CREDENTIALS_PATH` and
    /// `LOG_FORMAT` from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(Environment::default())
    }

    fn from_source(environment: Environment) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("api_url", DEFAULT_API_URL)?
            .set_default("api_timeout_secs", DEFAULT_API_TIMEOUT_SECS)?
            .set_default("credentials_path", DEFAULT_CREDENTIALS_PATH)?
            .set_default("log_format", "plain")?
            .add_source(environment.try_parsing(true))
            .build()?;

        let config: Self = settings.try_deserialize()?;
        if config.api_timeout_secs == 0 {
            return Err(ConfigError::Message("API_TIMEOUT_SECS must be positive".to_string()));
        }
        Ok(config)
    }

    pub fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.api_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn environment(vars: &[(&str, &str)]) -> Environment {
        let map: config::Map<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::default().source(Some(map))
    }

    #[test]
    fn test_defaults_apply_without_variables() {
        let config = AppConfig::from_source(environment(&[])).unwrap();

        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.api_timeout(), Duration::from_secs(30));
        assert_eq!(config.credentials_path, PathBuf::from(DEFAULT_CREDENTIALS_PATH));
        assert_eq!(config.log_format, LogFormat::Plain);
    }

    #[test]
    fn test_variables_override_defaults() {
        let config = AppConfig::from_source(environment(&[
            ("API_URL", "https://office.example/api"),
            ("API_TIMEOUT_SECS", "5"),
            ("CREDENTIALS_PATH", "/tmp/lawdesk.json"),
            ("LOG_FORMAT", "json"),
        ]))
        .unwrap();

        assert_eq!(config.api_url, "https://office.example/api");
        assert_eq!(config.api_timeout_secs, 5);
        assert_eq!(config.credentials_path, PathBuf::from("/tmp/lawdesk.json"));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_values_are_errors() {
        assert!(AppConfig::from_source(environment(&[("API_TIMEOUT_SECS", "soon")])).is_err());
        assert!(AppConfig::from_source(environment(&[("API_TIMEOUT_SECS", "0")])).is_err());
        assert!(AppConfig::from_source(environment(&[("LOG_FORMAT", "xml")])).is_err());
    }
}
