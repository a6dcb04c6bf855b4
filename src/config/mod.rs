use serde::Deserialize;
use std::env;

const MAX_RETRY_BACKOFF_MS: u64 = 60_000;

// Главная структура конфигурации - контейнер для всех настроек
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub booking: BookingConfig,
}

// Настройки приложения
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub rust_log: String,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Pretty,
    Json,
}

// Настройки базы данных
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_size: u32,
    pub acquire_timeout_secs: u64,
}

/// Transaction policy for the reserve path.
#[derive(Debug, Clone, Deserialize)]
pub struct BookingConfig {
    pub isolation_level: IsolationLevel,
    /// Total attempts per reserve call, including the first one.
    pub max_attempts: u32,
    pub retry_backoff_ms: u64,
}

/// Isolation level issued at the start of every booking transaction.
///
/// REPEATABLE READ is not offered: its snapshot is taken before the event-row
/// lock wait finishes, so the seat count would miss the booking that held the lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IsolationLevel {
    ReadCommitted,
    Serializable,
}

impl IsolationLevel {
    pub fn as_sql(&self) -> &'static str {
        match self {
            IsolationLevel::ReadCommitted => "SET TRANSACTION ISOLATION LEVEL READ COMMITTED",
            IsolationLevel::Serializable => "SET TRANSACTION ISOLATION LEVEL SERIALIZABLE",
        }
    }
}

// Conventional env names that override the nested SEATS__* keys
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("app.host", "HOST"),
    ("app.port", "PORT"),
    ("app.environment", "ENVIRONMENT"),
    ("app.rust_log", "RUST_LOG"),
    ("app.log_format", "LOG_FORMAT"),
    ("database.url", "DATABASE_URL"),
    ("database.pool_size", "DB_POOL_SIZE"),
    ("database.acquire_timeout_secs", "DB_ACQUIRE_TIMEOUT_SECS"),
    ("booking.isolation_level", "BOOKING_ISOLATION_LEVEL"),
    ("booking.max_attempts", "BOOKING_MAX_ATTEMPTS"),
    ("booking.retry_backoff_ms", "BOOKING_RETRY_BACKOFF_MS"),
];

impl Config {
    /// Loads defaults, then `SEATS__SECTION__KEY` variables, then the plain names
    /// (`DATABASE_URL`, `PORT`, ...).
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, config::ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = config::Config::builder()
            .set_default("app.host", "0.0.0.0")?
            .set_default("app.port", 8000_i64)?
            .set_default("app.environment", "development")?
            .set_default("app.rust_log", "seat_reservation=debug,tower_http=debug")?
            .set_default("app.log_format", "pretty")?
            .set_default("database.pool_size", 20_i64)?
            .set_default("database.acquire_timeout_secs", 5_i64)?
            .set_default("booking.isolation_level", "read_committed")?
            .set_default("booking.max_attempts", 3_i64)?
            .set_default("booking.retry_backoff_ms", 10_i64)?
            .add_source(
                config::Environment::with_prefix("SEATS")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        for (key, name) in ENV_OVERRIDES {
            builder = builder.set_override_option(*key, lookup(*name))?;
        }

        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.database.url.trim().is_empty() {
            return Err(config::ConfigError::Message("DATABASE_URL must be set".into()));
        }
        if self.database.pool_size == 0 {
            return Err(config::ConfigError::Message("DB_POOL_SIZE must be greater than 0".into()));
        }
        if self.booking.max_attempts == 0 {
            return Err(config::ConfigError::Message(
                "BOOKING_MAX_ATTEMPTS must be at least 1".into(),
            ));
        }
        if self.booking.retry_backoff_ms > MAX_RETRY_BACKOFF_MS {
            return Err(config::ConfigError::Message(format!(
                "BOOKING_RETRY_BACKOFF_MS must not exceed {}",
                MAX_RETRY_BACKOFF_MS
            )));
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.app.host, self.app.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, config::ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_only_database_url_is_set() {
        let config = load(&[("DATABASE_URL", "postgres://localhost/seats")]).unwrap();

        assert_eq!(config.app.port, 8000);
        assert_eq!(config.app.log_format, LogFormat::Pretty);
        assert_eq!(config.database.pool_size, 20);
        assert_eq!(config.booking.isolation_level, IsolationLevel::ReadCommitted);
        assert_eq!(config.booking.max_attempts, 3);
    }

    #[test]
    fn plain_env_names_are_honoured() {
        let config = load(&[
            ("DATABASE_URL", "postgres://db/seats"),
            ("PORT", "9100"),
            ("LOG_FORMAT", "json"),
            ("BOOKING_ISOLATION_LEVEL", "serializable"),
            ("BOOKING_MAX_ATTEMPTS", "5"),
        ])
        .unwrap();

        assert_eq!(config.app.port, 9100);
        assert_eq!(config.app.log_format, LogFormat::Json);
        assert_eq!(config.booking.isolation_level, IsolationLevel::Serializable);
        assert_eq!(config.booking.max_attempts, 5);
        assert_eq!(config.bind_address(), "0.0.0.0:9100");
    }

    #[test]
    fn missing_database_url_is_an_error() {
        assert!(load(&[]).is_err());
    }

    #[test]
    fn zero_attempts_is_rejected() {
        let result = load(&[
            ("DATABASE_URL", "postgres://db/seats"),
            ("BOOKING_MAX_ATTEMPTS", "0"),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn oversized_retry_backoff_is_rejected() {
        let result = load(&[
            ("DATABASE_URL", "postgres://db/seats"),
            ("BOOKING_RETRY_BACKOFF_MS", "18446744073709551615"),
        ]);
        assert!(result.is_err());

        let config = load(&[
            ("DATABASE_URL", "postgres://db/seats"),
            ("BOOKING_RETRY_BACKOFF_MS", "60000"),
        ])
        .unwrap();
        assert_eq!(config.booking.retry_backoff_ms, 60_000);
    }

    #[test]
    fn unknown_isolation_level_is_rejected() {
        let result = load(&[
            ("DATABASE_URL", "postgres://db/seats"),
            ("BOOKING_ISOLATION_LEVEL", "chaos"),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn repeatable_read_is_not_accepted() {
        let result = load(&[
            ("DATABASE_URL", "postgres://db/seats"),
            ("BOOKING_ISOLATION_LEVEL", "repeatable_read"),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn isolation_level_sql() {
        assert_eq!(
            IsolationLevel::Serializable.as_sql(),
            "SET TRANSACTION ISOLATION LEVEL SERIALIZABLE"
        );
    }
}
