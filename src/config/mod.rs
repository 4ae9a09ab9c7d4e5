use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            data_dir: default_data_dir(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Shared admin passphrase for the credential-less admin login.
    #[serde(default = "default_admin_password")]
    pub admin_password: String,
    /// HS256 signing secret for bearer tokens.
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Lifetime of tokens issued by the user login endpoint.
    #[serde(default = "default_user_token_ttl")]
    pub user_token_ttl_minutes: i64,
    /// Lifetime of tokens issued by the admin passphrase login.
    #[serde(default = "default_admin_token_ttl")]
    pub admin_token_ttl_minutes: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            admin_password: default_admin_password(),
            jwt_secret: default_jwt_secret(),
            user_token_ttl_minutes: default_user_token_ttl(),
            admin_token_ttl_minutes: default_admin_token_ttl(),
        }
    }
}

fn default_admin_password() -> String {
    // Generate a random passphrase if not provided
    uuid::Uuid::new_v4().to_string()
}

fn default_jwt_secret() -> String {
    // Generate a random secret if not provided; tokens will not survive a restart
    uuid::Uuid::new_v4().to_string()
}

fn default_user_token_ttl() -> i64 {
    30
}

fn default_admin_token_ttl() -> i64 {
    720
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            info!("Loading configuration from {}", path.display());
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| "Failed to parse configuration file")?;
            Ok(config)
        } else {
            info!("No config file found, using defaults");
            Ok(Config::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.data_dir, PathBuf::from("./data"));
        assert_eq!(config.auth.user_token_ttl_minutes, 30);
        assert_eq!(config.auth.admin_token_ttl_minutes, 720);
        assert_eq!(config.logging.level, "info");
        // Generated secrets are random, not empty
        assert!(!config.auth.admin_password.is_empty());
        assert!(!config.auth.jwt_secret.is_empty());
    }

    #[test]
    fn test_parse_partial_toml() {
        let toml = r#"
            [server]
            port = 9000

            [auth]
            admin_password = "hunter2"
            user_token_ttl_minutes = 15
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.auth.admin_password, "hunter2");
        assert_eq!(config.auth.user_token_ttl_minutes, 15);
        assert_eq!(config.auth.admin_token_ttl_minutes, 720);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = Config::load(Path::new("/nonexistent/cinevault.toml")).unwrap();
        assert_eq!(config.server.port, 8080);
    }
}
