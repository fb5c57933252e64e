use thiserror::Error;

use crate::cache::CacheError;

/// Startup and runtime failures of the process's external resources.
#[derive(Debug, Error)]
pub enum InfraError {
    #[error("failed to bind http listener: {0}")]
    Bind(#[source] std::io::Error),
    #[error("database unavailable: {message}")]
    Database { message: String },
    #[error("cache backend unavailable: {0}")]
    Cache(#[from] CacheError),
    #[error("telemetry initialization failed: {0}")]
    Telemetry(String),
}

impl InfraError {
    pub fn database(err: impl std::fmt::Display) -> Self {
        Self::Database {
            message: err.to_string(),
        }
    }

    pub fn telemetry(message: impl Into<String>) -> Self {
        Self::Telemetry(message.into())
    }
}
