use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP client error: {0}")]
    ClientError(#[from] reqwest::Error),

    #[error("HDX catalog error: {0}")]
    CatalogError(String),

    #[error("GeoNode adapter error: {0}")]
    AdapterError(String),
}
