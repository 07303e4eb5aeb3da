#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv, env_parse_or};

const DEFAULT_URL: &str = "mongodb://localhost:27017";
const DEFAULT_MAX_POOL_SIZE: u32 = 100;
const DEFAULT_MIN_POOL_SIZE: u32 = 5;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_SERVER_SELECTION_TIMEOUT_SECS: u64 = 30;

/// Connection settings for a MongoDB deployment and the database used by a service.
///
/// ```ignore
/// use database::mongodb::MongoConfig;
///
/// let config = MongoConfig::with_database("mongodb://localhost:27017", "furniture")
///     .with_app_name("furniture-api");
///
/// // `config` feature: MONGODB_URL / MONGODB_DATABASE are required
/// let config = MongoConfig::from_env()?;
///
/// // `config` feature: fall back to service defaults when unset
/// let config = MongoConfig::from_env_with_defaults("mongodb://localhost:27017", "furniture")?;
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MongoConfig {
    /// `mongodb://[username:password@]host[:port][/database][?options]`
    pub url: String,
    pub database: String,
    /// Reported to the server in its connection logs
    pub app_name: Option<String>,
    pub max_pool_size: u32,
    pub min_pool_size: u32,
    pub connect_timeout_secs: u64,
    pub server_selection_timeout_secs: u64,
}

impl MongoConfig {
    pub fn with_database(url: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            database: database.into(),
            app_name: None,
            max_pool_size: DEFAULT_MAX_POOL_SIZE,
            min_pool_size: DEFAULT_MIN_POOL_SIZE,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            server_selection_timeout_secs: DEFAULT_SERVER_SELECTION_TIMEOUT_SECS,
        }
    }

    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    pub fn with_pool_size(mut self, max_pool_size: u32, min_pool_size: u32) -> Self {
        self.max_pool_size = max_pool_size;
        self.min_pool_size = min_pool_size;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    /// Connection string with any `user:password@` credentials replaced, for logging.
    pub fn redacted_url(&self) -> String {
        match (self.url.find("://"), self.url.rfind('@')) {
            (Some(scheme_end), Some(at)) if at > scheme_end => {
                format!("{}://***@{}", &self.url[..scheme_end], &self.url[at + 1..])
            }
            _ => self.url.clone(),
        }
    }
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self::with_database(DEFAULT_URL, "default")
    }
}

#[cfg(feature = "config")]
fn first_env(keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| std::env::var(key).ok())
}

#[cfg(feature = "config")]
impl MongoConfig {
    /// Loads settings from the environment, using `default_url` and
    /// `default_database` when neither the `MONGODB_*` nor the `MONGO_*`
    /// variable is set.
    pub fn from_env_with_defaults(
        default_url: &str,
        default_database: &str,
    ) -> Result<Self, ConfigError> {
        let url = first_env(&["MONGODB_URL", "MONGO_URL"]).unwrap_or_else(|| default_url.to_string());
        let database = first_env(&["MONGODB_DATABASE", "MONGO_DATABASE"])
            .unwrap_or_else(|| default_database.to_string());
        Self::load_tuning(url, database)
    }

    fn load_tuning(url: String, database: String) -> Result<Self, ConfigError> {
        Ok(Self {
            url,
            database,
            app_name: std::env::var("MONGODB_APP_NAME").ok(),
            max_pool_size: env_parse_or("MONGODB_MAX_POOL_SIZE", DEFAULT_MAX_POOL_SIZE)?,
            min_pool_size: env_parse_or("MONGODB_MIN_POOL_SIZE", DEFAULT_MIN_POOL_SIZE)?,
            connect_timeout_secs: env_parse_or(
                "MONGODB_CONNECT_TIMEOUT_SECS",
                DEFAULT_CONNECT_TIMEOUT_SECS,
            )?,
            server_selection_timeout_secs: env_parse_or(
                "MONGODB_SERVER_SELECTION_TIMEOUT_SECS",
                DEFAULT_SERVER_SELECTION_TIMEOUT_SECS,
            )?,
        })
    }
}

/// Environment variables:
/// - `MONGODB_URL` or `MONGO_URL` (required)
/// - `MONGODB_DATABASE` or `MONGO_DATABASE` (required)
/// - `MONGODB_APP_NAME` (optional)
/// - `MONGODB_MAX_POOL_SIZE` / `MONGODB_MIN_POOL_SIZE` (default: 100 / 5)
/// - `MONGODB_CONNECT_TIMEOUT_SECS` (default: 10)
/// - `MONGODB_SERVER_SELECTION_TIMEOUT_SECS` (default: 30)
#[cfg(feature = "config")]
impl FromEnv for MongoConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let url = first_env(&["MONGODB_URL", "MONGO_URL"])
            .ok_or_else(|| ConfigError::MissingEnvVar("MONGODB_URL or MONGO_URL".to_string()))?;
        let database = first_env(&["MONGODB_DATABASE", "MONGO_DATABASE"]).ok_or_else(|| {
            ConfigError::MissingEnvVar("MONGODB_DATABASE or MONGO_DATABASE".to_string())
        })?;
        Self::load_tuning(url, database)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_database_uses_pool_defaults() {
        let config = MongoConfig::with_database("mongodb://localhost:27017", "furniture");
        assert_eq!(config.database(), "furniture");
        assert_eq!(config.max_pool_size, 100);
        assert_eq!(config.min_pool_size, 5);
        assert_eq!(config.connect_timeout_secs, 10);
        assert_eq!(config.server_selection_timeout_secs, 30);
        assert!(config.app_name.is_none());
    }

    #[test]
    fn test_builder_methods() {
        let config = MongoConfig::default()
            .with_app_name("furniture-api")
            .with_pool_size(20, 2);
        assert_eq!(config.url(), "mongodb://localhost:27017");
        assert_eq!(config.app_name.as_deref(), Some("furniture-api"));
        assert_eq!((config.max_pool_size, config.min_pool_size), (20, 2));
    }

    #[test]
    fn test_redacted_url_hides_credentials() {
        let config = MongoConfig::with_database("mongodb://admin:s3cret@db:27017/?tls=true", "x");
        assert_eq!(config.redacted_url(), "mongodb://***@db:27017/?tls=true");

        let config = MongoConfig::with_database("mongodb://localhost:27017", "x");
        assert_eq!(config.redacted_url(), "mongodb://localhost:27017");
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_from_env() {
        temp_env::with_vars(
            [
                ("MONGODB_URL", Some("mongodb://mongo:27017")),
                ("MONGODB_DATABASE", Some("testdb")),
                ("MONGODB_MAX_POOL_SIZE", Some("10")),
            ],
            || {
                let config = MongoConfig::from_env().unwrap();
                assert_eq!(config.url, "mongodb://mongo:27017");
                assert_eq!(config.database, "testdb");
                assert_eq!(config.max_pool_size, 10);
            },
        );
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_from_env_fallback_variables() {
        temp_env::with_vars(
            [
                ("MONGODB_URL", None::<&str>),
                ("MONGO_URL", Some("mongodb://fallback:27017")),
                ("MONGODB_DATABASE", None::<&str>),
                ("MONGO_DATABASE", Some("fallbackdb")),
            ],
            || {
                let config = MongoConfig::from_env().unwrap();
                assert_eq!(config.url, "mongodb://fallback:27017");
                assert_eq!(config.database, "fallbackdb");
            },
        );
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_from_env_missing_url() {
        temp_env::with_vars(
            [
                ("MONGODB_URL", None::<&str>),
                ("MONGO_URL", None::<&str>),
                ("MONGODB_DATABASE", Some("testdb")),
            ],
            || {
                let err = MongoConfig::from_env().unwrap_err();
                assert!(err.to_string().contains("MONGODB_URL"));
            },
        );
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_from_env_with_defaults() {
        temp_env::with_vars(
            [
                ("MONGODB_URL", None::<&str>),
                ("MONGO_URL", None::<&str>),
                ("MONGODB_DATABASE", None::<&str>),
                ("MONGO_DATABASE", None::<&str>),
            ],
            || {
                let config =
                    MongoConfig::from_env_with_defaults("mongodb://localhost:27017", "furniture")
                        .unwrap();
                assert_eq!(config.url, "mongodb://localhost:27017");
                assert_eq!(config.database, "furniture");
            },
        );
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_from_env_invalid_pool_size() {
        temp_env::with_vars(
            [
                ("MONGODB_URL", Some("mongodb://localhost:27017")),
                ("MONGODB_DATABASE", Some("testdb")),
                ("MONGODB_MIN_POOL_SIZE", Some("few")),
            ],
            || {
                let err = MongoConfig::from_env().unwrap_err();
                assert!(err.to_string().contains("MONGODB_MIN_POOL_SIZE"));
            },
        );
    }
}
