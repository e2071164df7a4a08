//! Typed configuration from environment variables.
//!
//! Loads once at startup, fails fast if any rule is violated, and reports every
//! violation at once. Sensitive values wrapped in secrecy::SecretString to
//! prevent log leaks.

pub mod coerce;
pub mod schema;
pub mod secrets;

use secrecy::SecretString;
use serde::Serialize;

use crate::env::RawEnv;
use crate::error::{Result, ValidationFailure};
use secrets::masked;

// ---------------------------------------------------------------------------
// Enumerated values
// ---------------------------------------------------------------------------

/// Defines a lowercase-token enum with `CHOICES`, `Display`, and `FromStr`.
macro_rules! token_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident { $($variant:ident => $token:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
        pub enum $name {
            $(#[serde(rename = $token)] $variant),+
        }

        impl $name {
            pub const CHOICES: &'static [&'static str] = &[$($token),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $token),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s {
                    $($token => Ok($name::$variant),)+
                    other => Err(format!(
                        "unknown {} {other:?}",
                        stringify!($name)
                    )),
                }
            }
        }
    };
}

token_enum! {
    /// Deployment environment.
    pub enum NodeEnv {
        Development => "development",
        Staging => "staging",
        Production => "production",
        Test => "test",
    }
}

impl NodeEnv {
    pub fn is_production(self) -> bool {
        self == NodeEnv::Production
    }

    pub fn is_development(self) -> bool {
        self == NodeEnv::Development
    }

    pub fn is_test(self) -> bool {
        self == NodeEnv::Test
    }
}

token_enum! {
    pub enum LogLevel {
        Error => "error",
        Warn => "warn",
        Info => "info",
        Debug => "debug",
        Verbose => "verbose",
    }
}

impl LogLevel {
    /// Directive for `tracing_subscriber::EnvFilter`.
    pub fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Verbose => "trace",
            other => other.as_str(),
        }
    }
}

token_enum! {
    pub enum LogFormat {
        Json => "json",
        Pretty => "pretty",
    }
}

token_enum! {
    pub enum LlmProvider {
        OpenAi => "openai",
        Anthropic => "anthropic",
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Fully validated process configuration.
///
/// Only ever produced whole by [`Config::from_raw`]. Share it behind an
/// `Arc` rather than cloning or mutating it.
#[derive(Debug)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    pub auth: AuthConfig,
    pub security: SecurityConfig,
    pub logging: LoggingConfig,
    pub llm: LlmConfig,
    pub monitoring: MonitoringConfig,
    pub features: FeatureFlags,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub node_env: NodeEnv,
    pub port: u16,
    pub api_prefix: String,
}

#[derive(Debug)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: SecretString,
    pub name: String,
    /// Auto-sync schema on boot. Never enable in production.
    pub synchronize: bool,
    pub logging: bool,
    pub ssl: bool,
    pub pool_min: u32,
    pub pool_max: u32,
}

#[derive(Debug)]
pub struct CacheConfig {
    pub host: String,
    pub port: u16,
    pub password: Option<SecretString>,
    pub db: u32,
    pub ttl_secs: u64,
}

#[derive(Debug)]
pub struct AuthConfig {
    pub jwt_secret: SecretString,
    pub jwt_expiration: String,
    pub jwt_refresh_secret: SecretString,
    pub jwt_refresh_expiration: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SecurityConfig {
    pub bcrypt_rounds: u32,
    pub rate_limit_ttl_secs: u64,
    pub rate_limit_max: u32,
    pub cors_origin: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub format: LogFormat,
}

#[derive(Debug)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub openai_api_key: Option<SecretString>,
    pub anthropic_api_key: Option<SecretString>,
    pub model: String,
    pub max_tokens: u32,
    /// Always within `[0, 2]`.
    pub temperature: f64,
}

impl LlmConfig {
    /// API key for the selected provider, if one was supplied.
    pub fn api_key(&self) -> Option<&SecretString> {
        match self.provider {
            LlmProvider::OpenAi => self.openai_api_key.as_ref(),
            LlmProvider::Anthropic => self.anthropic_api_key.as_ref(),
        }
    }
}

#[derive(Debug)]
pub struct MonitoringConfig {
    pub sentry_dsn: Option<SecretString>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureFlags {
    pub swagger: bool,
    pub metrics: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// In local dev, call `dotenvy::dotenv().ok()` before this.
    /// In production, the service manager provides the vars.
    pub fn from_env() -> Result<Self> {
        Ok(Self::from_raw(&RawEnv::from_std_env())?)
    }

    /// Validate a raw snapshot, collecting every violation.
    pub fn from_raw(env: &RawEnv) -> std::result::Result<Self, ValidationFailure> {
        use schema::*;

        let mut c = Collector::new(env);

        let node_env = c.choice(&NODE_ENV);
        let port = c.integer(&PORT);
        let api_prefix = c.text(&API_PREFIX);

        let db_host = c.text(&DB_HOST);
        let db_port = c.integer(&DB_PORT);
        let db_username = c.text(&DB_USERNAME);
        let db_password = c.secret(&DB_PASSWORD);
        let db_name = c.text(&DB_NAME);
        let db_sync = c.flag(&DB_SYNC);
        let db_logging = c.flag(&DB_LOGGING);
        let db_ssl = c.flag(&DB_SSL);
        let db_pool_min = c.integer(&DB_POOL_MIN);
        let db_pool_max = c.integer(&DB_POOL_MAX);

        let redis_host = c.text(&REDIS_HOST);
        let redis_port = c.integer(&REDIS_PORT);
        let redis_password = c.optional_secret(&REDIS_PASSWORD);
        let redis_db = c.integer(&REDIS_DB);
        let redis_ttl = c.integer(&REDIS_TTL);

        let jwt_secret = c.secret(&JWT_SECRET);
        let jwt_expiration = c.text(&JWT_EXPIRATION);
        let jwt_refresh_secret = c.secret(&JWT_REFRESH_SECRET);
        let jwt_refresh_expiration = c.text(&JWT_REFRESH_EXPIRATION);

        let bcrypt_rounds = c.integer(&BCRYPT_ROUNDS);
        let rate_limit_ttl = c.integer(&RATE_LIMIT_TTL);
        let rate_limit_max = c.integer(&RATE_LIMIT_MAX);
        let cors_origin = c.text(&CORS_ORIGIN);

        let log_level = c.choice(&LOG_LEVEL);
        let log_format = c.choice(&LOG_FORMAT);

        let llm_provider = c.choice(&LLM_PROVIDER);
        let openai_api_key = c.optional_secret(&OPENAI_API_KEY);
        let anthropic_api_key = c.optional_secret(&ANTHROPIC_API_KEY);
        let llm_model = c.text(&LLM_MODEL);
        let llm_max_tokens = c.integer(&LLM_MAX_TOKENS);
        let llm_temperature = c.float(&LLM_TEMPERATURE);

        let sentry_dsn = c.optional_secret(&SENTRY_DSN);

        let enable_swagger = c.flag(&ENABLE_SWAGGER);
        let enable_metrics = c.flag(&ENABLE_METRICS);

        // Every field is bound above; `?` here only assembles.
        let assembled = (|| -> Option<Config> {
            Some(Config {
                app: AppConfig {
                    node_env: node_env?,
                    port: port?,
                    api_prefix: api_prefix?,
                },
                database: DatabaseConfig {
                    host: db_host?,
                    port: db_port?,
                    username: db_username?,
                    password: db_password?,
                    name: db_name?,
                    synchronize: db_sync?,
                    logging: db_logging?,
                    ssl: db_ssl?,
                    pool_min: db_pool_min?,
                    pool_max: db_pool_max?,
                },
                cache: CacheConfig {
                    host: redis_host?,
                    port: redis_port?,
                    password: redis_password?,
                    db: redis_db?,
                    ttl_secs: redis_ttl?,
                },
                auth: AuthConfig {
                    jwt_secret: jwt_secret?,
                    jwt_expiration: jwt_expiration?,
                    jwt_refresh_secret: jwt_refresh_secret?,
                    jwt_refresh_expiration: jwt_refresh_expiration?,
                },
                security: SecurityConfig {
                    bcrypt_rounds: bcrypt_rounds?,
                    rate_limit_ttl_secs: rate_limit_ttl?,
                    rate_limit_max: rate_limit_max?,
                    cors_origin: cors_origin?,
                },
                logging: LoggingConfig {
                    level: log_level?,
                    format: log_format?,
                },
                llm: LlmConfig {
                    provider: llm_provider?,
                    openai_api_key: openai_api_key?,
                    anthropic_api_key: anthropic_api_key?,
                    model: llm_model?,
                    max_tokens: llm_max_tokens?,
                    temperature: llm_temperature?,
                },
                monitoring: MonitoringConfig {
                    sentry_dsn: sentry_dsn?,
                },
                features: FeatureFlags {
                    swagger: enable_swagger?,
                    metrics: enable_metrics?,
                },
            })
        })();

        c.finish(assembled)
    }

    /// JSON view of the configuration with every secret masked.
    pub fn to_redacted_json(&self) -> serde_json::Value {
        serde_json::json!({
            "app": {
                "node_env": self.app.node_env,
                "port": self.app.port,
                "api_prefix": self.app.api_prefix,
            },
            "database": {
                "host": self.database.host,
                "port": self.database.port,
                "username": self.database.username,
                "password": masked(Some(&self.database.password)),
                "name": self.database.name,
                "synchronize": self.database.synchronize,
                "logging": self.database.logging,
                "ssl": self.database.ssl,
                "pool_min": self.database.pool_min,
                "pool_max": self.database.pool_max,
            },
            "cache": {
                "host": self.cache.host,
                "port": self.cache.port,
                "password": masked(self.cache.password.as_ref()),
                "db": self.cache.db,
                "ttl_secs": self.cache.ttl_secs,
            },
            "auth": {
                "jwt_secret": masked(Some(&self.auth.jwt_secret)),
                "jwt_expiration": self.auth.jwt_expiration,
                "jwt_refresh_secret": masked(Some(&self.auth.jwt_refresh_secret)),
                "jwt_refresh_expiration": self.auth.jwt_refresh_expiration,
            },
            "security": {
                "bcrypt_rounds": self.security.bcrypt_rounds,
                "rate_limit_ttl_secs": self.security.rate_limit_ttl_secs,
                "rate_limit_max": self.security.rate_limit_max,
                "cors_origin": self.security.cors_origin,
            },
            "logging": {
                "level": self.logging.level,
                "format": self.logging.format,
            },
            "llm": {
                "provider": self.llm.provider,
                "openai_api_key": masked(self.llm.openai_api_key.as_ref()),
                "anthropic_api_key": masked(self.llm.anthropic_api_key.as_ref()),
                "model": self.llm.model,
                "max_tokens": self.llm.max_tokens,
                "temperature": self.llm.temperature,
            },
            "monitoring": {
                "sentry_dsn": masked(self.monitoring.sentry_dsn.as_ref()),
            },
            "features": {
                "swagger": self.features.swagger,
                "metrics": self.features.metrics,
            },
        })
    }
}
