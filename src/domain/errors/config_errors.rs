use thiserror::Error;

/// Local configuration errors, raised while building a facade
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required configuration field is missing or blank
    #[error("Configuration error: {field} must be configured")]
    MissingField { field: &'static str },

    /// A required environment variable is not set
    #[error("Configuration error: {var} environment variable required")]
    MissingEnv { var: &'static str },

    /// A configuration value could not be interpreted
    #[error("Configuration error: invalid value '{value}' for {field}")]
    InvalidValue { field: &'static str, value: String },
}

/// Result type for configuration
pub type ConfigResult<T> = Result<T, ConfigError>;
