//! Application configuration
//!
//! Centralized configuration management using the `config` crate. Values are
//! layered from defaults, optional config files selected by `RUN_MODE`, and
//! `USERSUITE__`-prefixed environment variables. The division catalog —
//! endpoints, tokens, mail servers, dormitories and their subnets — is
//! declared here and handed to the adapters explicitly; nothing resolves
//! backend settings from ambient state at request time.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,

    /// The division catalog, in selection order
    #[serde(default)]
    pub divisions: Vec<DivisionConfig>,
}

/// HTTP server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of worker threads
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Allowed CORS origins, comma-separated
    #[serde(default = "default_cors_origins")]
    pub cors_origins: String,

    /// Expose debug-only divisions on the login page
    #[serde(default)]
    pub debug: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_workers() -> usize {
    num_cpus::get()
}

fn default_cors_origins() -> String {
    "http://localhost:3000".to_string()
}

/// Session token configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// JWT signing secret
    pub jwt_secret: String,

    /// Session token expiration in seconds
    #[serde(default = "default_jwt_expiration")]
    pub jwt_expiration_secs: i64,
}

fn default_jwt_expiration() -> i64 {
    1800 // 30 minutes
}

/// One division of the catalog
#[derive(Debug, Deserialize, Clone)]
pub struct DivisionConfig {
    /// Unique name (catalog key)
    pub name: String,

    /// Label shown on the login page
    pub display_name: String,

    /// Mail domain for generated forwarding addresses
    pub mail_server: String,

    /// Address of the division's support team
    #[serde(default)]
    pub support_mail: Option<String>,

    /// Keep this division out of production selection
    #[serde(default)]
    pub debug_only: bool,

    /// The identity backend serving this division
    pub backend: BackendConfig,

    /// Dormitories belonging to this division
    #[serde(default)]
    pub dormitories: Vec<DormitoryConfig>,
}

/// Backend selection and its explicit settings
#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BackendConfig {
    /// REST identity API with token authentication
    Rest {
        /// Base URL of the API
        endpoint: String,
        /// Bearer-style API token
        token: String,
        /// Accept self-signed backend certificates (lab setups only)
        #[serde(default)]
        accept_invalid_certs: bool,
    },
    /// In-memory demo backend with seeded accounts
    Sample {
        #[serde(default)]
        accounts: Vec<SampleAccountConfig>,
    },
}

/// One dormitory entry of a division
#[derive(Debug, Deserialize, Clone)]
pub struct DormitoryConfig {
    pub name: String,
    pub display_name: String,

    /// IPv4 networks located in this dormitory, CIDR notation
    #[serde(default)]
    pub subnets: Vec<String>,
}

/// A seeded account for the demo backend
#[derive(Debug, Deserialize, Clone)]
pub struct SampleAccountConfig {
    pub uid: String,
    pub id: i64,
    pub name: String,

    /// Plaintext seed password, hashed at startup
    pub password: String,

    #[serde(default)]
    pub mail: Option<String>,

    #[serde(default)]
    pub ip: Option<String>,

    #[serde(default)]
    pub mac: Option<String>,

    #[serde(default)]
    pub address: Option<String>,
}

impl AppConfig {
    /// Load configuration from environment and optional config files
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("server.workers", num_cpus::get() as i64)?
            .set_default("server.cors_origins", "http://localhost:3000")?
            .set_default("server.debug", false)?
            .set_default("auth.jwt_expiration_secs", 1800)?
            // Load config files if present
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Environment variables with USERSUITE_ prefix
            .add_source(
                Environment::with_prefix("USERSUITE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name(path))
            .add_source(Environment::with_prefix("USERSUITE").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    /// Get the server bind address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_division_config_parsing() {
        let raw = r#"
            [server]
            port = 9000

            [auth]
            jwt_secret = "test-secret"

            [[divisions]]
            name = "south"
            display_name = "Südcampus"
            mail_server = "south.example.org"
            support_mail = "support@south.example.org"

            [divisions.backend]
            kind = "rest"
            endpoint = "https://api.south.example.org/v1/"
            token = "secret-token"

            [[divisions.dormitories]]
            name = "block-a"
            display_name = "Block A"
            subnets = ["141.30.224.0/24"]

            [[divisions]]
            name = "lab"
            display_name = "Testbed"
            mail_server = "lab.example.org"
            debug_only = true

            [divisions.backend]
            kind = "sample"

            [[divisions.backend.accounts]]
            uid = "demo"
            id = 1
            name = "Demo User"
            password = "demo"
        "#;

        let config: AppConfig = Config::builder()
            .add_source(config::File::from_str(raw, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, default_host());
        assert_eq!(config.auth.jwt_expiration_secs, default_jwt_expiration());
        assert_eq!(config.divisions.len(), 2);

        let south = &config.divisions[0];
        assert!(!south.debug_only);
        assert!(matches!(
            &south.backend,
            BackendConfig::Rest { endpoint, token, accept_invalid_certs }
                if endpoint.starts_with("https://") && token == "secret-token" && !accept_invalid_certs
        ));
        assert_eq!(south.dormitories[0].subnets, vec!["141.30.224.0/24"]);

        let lab = &config.divisions[1];
        assert!(lab.debug_only);
        assert!(matches!(
            &lab.backend,
            BackendConfig::Sample { accounts } if accounts.len() == 1
        ));
    }

    #[test]
    fn test_server_addr() {
        let config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8443,
                workers: 2,
                cors_origins: default_cors_origins(),
                debug: false,
            },
            auth: AuthConfig {
                jwt_secret: "s".to_string(),
                jwt_expiration_secs: 60,
            },
            divisions: vec![],
        };
        assert_eq!(config.server_addr(), "127.0.0.1:8443");
    }
}
