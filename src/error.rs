use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("DATABASE_URL is not set")]
    MissingDatabaseUrl,

    #[error("invalid DATABASE_URL: {0}")]
    InvalidDatabaseUrl(#[source] UrlError),
}

/// Errors produced while building or parsing connection URLs.
#[derive(Error, Debug)]
pub enum UrlError {
    #[error("invalid connection URL '{url}': {reason}")]
    Invalid { url: String, reason: String },

    #[error("unsupported URL scheme '{0}'")]
    UnsupportedScheme(String),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Url(#[from] UrlError),

    #[error("failed to establish connection: {0}")]
    Connection(#[from] diesel::ConnectionError),

    #[error("connection pool error: {0}")]
    Pool(String),

    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("schema creation failed: {0}")]
    Schema(String),

    #[error("support for {backend} is not compiled in; rebuild with the '{feature}' feature")]
    BackendDisabled {
        backend: &'static str,
        feature: &'static str,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("record '{name}' has no text content to write")]
    MissingContent { name: String },
}

pub type Result<T> = std::result::Result<T, Error>;
