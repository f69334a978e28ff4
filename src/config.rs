use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl Environment {
    fn parse(raw: &str) -> anyhow::Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "test" => Ok(Self::Test),
            "production" | "prod" => Ok(Self::Production),
            other => anyhow::bail!("unknown APP_ENV {other:?}"),
        }
    }

    /// Local environments bind to loopback, everything else to all interfaces.
    pub fn default_host(self) -> &'static str {
        match self {
            Self::Development | Self::Test => "localhost",
            Self::Production => "0.0.0.0",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub ttl_days: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "sessionId".into(),
            ttl_days: 7,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub env: Environment,
    pub host: String,
    pub port: u16,
    pub session: SessionConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let env = match std::env::var("APP_ENV") {
            Ok(v) => Environment::parse(&v)?,
            Err(_) => Environment::Development,
        };
        let defaults = SessionConfig::default();

        Ok(Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://dietlog.db".into()),
            database_max_connections: parse_var("DATABASE_MAX_CONNECTIONS", 10)?,
            env,
            host: std::env::var("APP_HOST").unwrap_or_else(|_| env.default_host().into()),
            port: parse_var("APP_PORT", 3333)?,
            session: SessionConfig {
                cookie_name: std::env::var("SESSION_COOKIE_NAME")
                    .unwrap_or(defaults.cookie_name),
                ttl_days: parse_var("SESSION_TTL_DAYS", defaults.ttl_days)?,
            },
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(v) => v
            .trim()
            .parse::<T>()
            .with_context(|| format!("invalid value for {key}: {v:?}")),
        Err(_) => Ok(default),
    }
}
