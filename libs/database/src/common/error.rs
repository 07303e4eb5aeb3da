/// Error returned by the connectors in this crate
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// Error raised by the MongoDB driver
    #[cfg(feature = "mongodb")]
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    /// The server could not be reached, even after retrying
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Invalid or missing connection settings
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

#[cfg(feature = "config")]
impl From<core_config::ConfigError> for DatabaseError {
    fn from(err: core_config::ConfigError) -> Self {
        DatabaseError::ConfigError(err.to_string())
    }
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;
