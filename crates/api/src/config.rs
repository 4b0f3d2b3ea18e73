use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub security: SecurityConfig,
    pub jwt: JwtAuthConfig,
    #[serde(default)]
    pub cookie: CookieConfig,
    #[serde(default)]
    pub otp: OtpConfig,
    #[serde(default)]
    pub sms: SmsConfig,
    #[serde(default)]
    pub fcm: FcmConfig,
    #[serde(default)]
    pub media: MediaConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub startup: StartupConfig,
    #[serde(default)]
    pub content: ContentConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Body limit for JSON requests. Uploads use the media limits.
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
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
    pub fn pool_config(&self) -> persistence::db::DatabaseConfig {
        persistence::db::DatabaseConfig {
            url: self.url.clone(),
            max_connections: self.max_connections,
            min_connections: self.min_connections,
            connect_timeout_secs: self.connect_timeout_secs,
            idle_timeout_secs: self.idle_timeout_secs,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `json` or `pretty`
    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Requests allowed per client IP per hour. 0 disables limiting.
    #[serde(default = "default_rate_limit")]
    pub rate_limit_per_hour: u32,

    /// Reverse proxies whose `X-Forwarded-For` is believed. Requests from any
    /// other peer are keyed on the socket address.
    #[serde(default)]
    pub trusted_proxies: Vec<IpAddr>,

    /// Send `Strict-Transport-Security`. Enable only behind TLS termination.
    #[serde(default)]
    pub hsts_enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtAuthConfig {
    /// HS256 signing secret, at least 32 bytes. Supplied through the
    /// environment or a local override file, never committed.
    #[serde(default)]
    pub secret: String,

    #[serde(default = "default_token_expiry")]
    pub token_expiry_secs: i64,

    /// Clock skew tolerance when checking `exp`.
    #[serde(default = "default_jwt_leeway")]
    pub leeway_secs: u64,
}

/// Session cookie settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CookieConfig {
    #[serde(default = "default_cookie_name")]
    pub name: String,

    #[serde(default = "default_true")]
    pub secure: bool,

    /// `strict`, `lax` or `none`
    #[serde(default = "default_same_site")]
    pub same_site: String,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: default_cookie_name(),
            secure: true,
            same_site: default_same_site(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OtpConfig {
    #[serde(default = "default_otp_ttl")]
    pub ttl_secs: i64,

    /// How often the expired-code sweep runs.
    #[serde(default = "default_otp_cleanup_interval")]
    pub cleanup_interval_secs: u64,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_otp_ttl(),
            cleanup_interval_secs: default_otp_cleanup_interval(),
        }
    }
}

/// SMS provider configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SmsConfig {
    /// `console` logs messages, `http` posts them to `api_url`.
    #[serde(default = "default_sms_provider")]
    pub provider: String,

    #[serde(default)]
    pub api_url: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_sms_sender")]
    pub sender_id: String,

    #[serde(default = "default_sms_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            provider: default_sms_provider(),
            api_url: String::new(),
            api_key: String::new(),
            sender_id: default_sms_sender(),
            timeout_ms: default_sms_timeout_ms(),
        }
    }
}

/// Firebase Cloud Messaging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FcmConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub project_id: String,

    /// Service account JSON, inline or as a file path.
    #[serde(default)]
    pub credentials: String,

    #[serde(default = "default_fcm_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_fcm_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_true")]
    pub high_priority: bool,
}

impl Default for FcmConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            project_id: String::new(),
            credentials: String::new(),
            timeout_ms: default_fcm_timeout_ms(),
            max_retries: default_fcm_max_retries(),
            high_priority: true,
        }
    }
}

/// Upload storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaConfig {
    #[serde(default = "default_media_root")]
    pub root_dir: String,

    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: usize,

    #[serde(default = "default_max_video_bytes")]
    pub max_video_bytes: usize,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            root_dir: default_media_root(),
            max_image_bytes: default_max_image_bytes(),
            max_video_bytes: default_max_video_bytes(),
        }
    }
}

/// Bootstrap admin account, created at startup when no admin exists.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminConfig {
    #[serde(default)]
    pub bootstrap_email: String,

    #[serde(default)]
    pub bootstrap_password: String,

    #[serde(default)]
    pub bootstrap_mobile: String,

    #[serde(default = "default_admin_name")]
    pub bootstrap_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StartupConfig {
    /// Fee per team member in minor currency units.
    #[serde(default = "default_fee_per_member")]
    pub fee_per_member: i64,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            fee_per_member: default_fee_per_member(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentConfig {
    /// Hosts accepted for event and lesson video links.
    #[serde(default = "default_video_hosts")]
    pub video_hosts: Vec<String>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            video_hosts: default_video_hosts(),
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
fn default_max_body_size() -> usize {
    1_048_576
}
fn default_max_connections() -> u32 {
    20
}
fn default_min_connections() -> u32 {
    5
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
fn default_rate_limit() -> u32 {
    1000
}
fn default_token_expiry() -> i64 {
    604_800
}
fn default_jwt_leeway() -> u64 {
    shared::jwt::DEFAULT_LEEWAY_SECS
}
fn default_cookie_name() -> String {
    "eventdesk_token".to_string()
}
fn default_same_site() -> String {
    "lax".to_string()
}
fn default_true() -> bool {
    true
}
fn default_otp_ttl() -> i64 {
    shared::otp::DEFAULT_OTP_TTL_SECS
}
fn default_otp_cleanup_interval() -> u64 {
    300
}
fn default_sms_provider() -> String {
    "console".to_string()
}
fn default_sms_sender() -> String {
    "EVTDSK".to_string()
}
fn default_sms_timeout_ms() -> u64 {
    10_000
}
fn default_fcm_timeout_ms() -> u64 {
    10_000
}
fn default_fcm_max_retries() -> u32 {
    3
}
fn default_media_root() -> String {
    "./media".to_string()
}
fn default_max_image_bytes() -> usize {
    5 * 1024 * 1024
}
fn default_max_video_bytes() -> usize {
    100 * 1024 * 1024
}
fn default_admin_name() -> String {
    "Administrator".to_string()
}
fn default_fee_per_member() -> i64 {
    50_000
}
fn default_video_hosts() -> Vec<String> {
    shared::validation::DEFAULT_VIDEO_HOSTS
        .iter()
        .map(|h| h.to_string())
        .collect()
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
    /// 3. Environment variables with ED__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("ED")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("security.cors_origins")
                    .with_list_parse_key("security.trusted_proxies")
                    .with_list_parse_key("content.video_hosts")
                    .try_parsing(true),
            )
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Load configuration from embedded defaults plus overrides, without
    /// touching the file system or environment.
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [server]
            host = "127.0.0.1"
            port = 8080
            request_timeout_secs = 30
            max_body_size = 1048576

            [database]
            url = ""
            max_connections = 5
            min_connections = 1
            connect_timeout_secs = 10
            idle_timeout_secs = 600

            [logging]
            level = "info"
            format = "json"

            [security]
            cors_origins = []
            rate_limit_per_hour = 0

            [jwt]
            secret = "test-secret-key-for-session-tokens-0123456789"
            token_expiry_secs = 3600
            leeway_secs = 0

            [cookie]
            name = "eventdesk_token"
            secure = false
            same_site = "lax"

            [sms]
            provider = "console"

            [media]
            root_dir = "./target/test-media"
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
        if self.database.url.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "ED__DATABASE__URL environment variable must be set".to_string(),
            ));
        }

        if self.jwt.secret.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "ED__JWT__SECRET environment variable must be set".to_string(),
            ));
        }

        if self.jwt.secret.len() < shared::jwt::MIN_SECRET_LENGTH {
            return Err(ConfigValidationError::InvalidValue(format!(
                "jwt.secret must be at least {} bytes",
                shared::jwt::MIN_SECRET_LENGTH
            )));
        }

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

        if self.otp.ttl_secs <= 0 {
            return Err(ConfigValidationError::InvalidValue(
                "otp.ttl_secs must be positive".to_string(),
            ));
        }

        if self.sms.provider == "http" && self.sms.api_url.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "sms.api_url is required for the http provider".to_string(),
            ));
        }

        if self.fcm.enabled && (self.fcm.project_id.is_empty() || self.fcm.credentials.is_empty())
        {
            return Err(ConfigValidationError::MissingRequired(
                "fcm.project_id and fcm.credentials are required when FCM is enabled".to_string(),
            ));
        }

        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.server.host, self.server.port).parse()
    }
}
