use serde::Deserialize;
use std::net::SocketAddr;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub security: SecurityConfig,
    pub jwt: JwtAuthConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub jobs: JobsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL URL. Empty selects the in-memory store.
    #[serde(default)]
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

impl DatabaseConfig {
    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecurityConfig {
    /// Allowed CORS origins; empty allows any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtAuthConfig {
    /// HMAC secret for signing tokens (at least 32 bytes)
    pub secret: String,

    /// Access token expiration in seconds (default: 3600 = 1 hour)
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: i64,

    /// Leeway in seconds for clock skew tolerance (default: 30)
    #[serde(default = "default_jwt_leeway")]
    pub leeway_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    #[serde(default = "default_max_seats_needed")]
    pub max_seats_needed: i32,

    #[serde(default = "default_max_message_length")]
    pub max_message_length: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_seats_needed: default_max_seats_needed(),
            max_message_length: default_max_message_length(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobsConfig {
    #[serde(default = "default_true")]
    pub license_alerts_enabled: bool,

    #[serde(default = "default_license_alerts_interval")]
    pub license_alerts_interval_minutes: u64,
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            license_alerts_enabled: true,
            license_alerts_interval_minutes: default_license_alerts_interval(),
        }
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_request_timeout() -> u64 {
    30
}
fn default_max_connections() -> u32 {
    10
}
fn default_min_connections() -> u32 {
    1
}
fn default_connect_timeout() -> u64 {
    10
}
fn default_idle_timeout() -> u64 {
    600
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_access_token_expiry() -> i64 {
    3600 // 1 hour
}
fn default_jwt_leeway() -> u64 {
    30
}
fn default_max_seats_needed() -> i32 {
    7
}
fn default_max_message_length() -> usize {
    2000
}
fn default_license_alerts_interval() -> u64 {
    60
}
fn default_true() -> bool {
    true
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml - base configuration with defaults
    /// 2. config/local.toml - local overrides (optional, not in git)
    /// 3. Environment variables with CARPOOL__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("CARPOOL")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("security.cors_origins")
                    .try_parsing(true),
            )
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Load configuration for testing with custom overrides.
    ///
    /// Builds from embedded defaults so tests do not depend on the working
    /// directory.
    #[cfg(test)]
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [server]
            host = "0.0.0.0"
            port = 8080
            request_timeout_secs = 30

            [database]
            url = ""
            max_connections = 10
            min_connections = 1
            connect_timeout_secs = 10
            idle_timeout_secs = 600

            [logging]
            level = "info"
            format = "json"

            [security]
            cors_origins = []

            [jwt]
            secret = "test-secret-that-is-at-least-32-bytes-long"
            access_token_expiry_secs = 3600
            leeway_secs = 30

            [limits]
            max_seats_needed = 7
            max_message_length = 2000

            [jobs]
            license_alerts_enabled = true
            license_alerts_interval_minutes = 60
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.server.port == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "Server port cannot be 0".to_string(),
            ));
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigValidationError::InvalidValue(
                "min_connections cannot exceed max_connections".to_string(),
            ));
        }

        if self.jwt.secret.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "CARPOOL__JWT__SECRET environment variable must be set".to_string(),
            ));
        }
        if self.jwt.secret.len() < shared::jwt::MIN_SECRET_LEN {
            return Err(ConfigValidationError::InvalidValue(format!(
                "jwt.secret must be at least {} bytes",
                shared::jwt::MIN_SECRET_LEN
            )));
        }

        if self.limits.max_seats_needed < 1 || self.limits.max_message_length == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "limits must be positive".to_string(),
            ));
        }

        if self.jobs.license_alerts_interval_minutes == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "jobs.license_alerts_interval_minutes cannot be 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.server.host, self.server.port).parse()
    }
}
