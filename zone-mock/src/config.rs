use thiserror::Error;

/// Default listen port
pub const DEFAULT_PORT: u16 = 8090;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("MOCK_PORT is not a valid port: {0}")]
    InvalidPort(String),
}

/// Standalone mock service settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockConfig {
    /// Listen port
    pub port: u16,
    /// Bearer token required on every request
    pub token: Option<String>,
}

impl MockConfig {
    /// Read `MOCK_PORT` and `MOCK_TOKEN` from the environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("MOCK_PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            port,
            token: lookup("MOCK_TOKEN").filter(|t| !t.is_empty()),
        })
    }
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            token: None,
        }
    }
}
