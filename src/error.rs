use thiserror::Error;

/// Reasons a drop could not be turned into a new order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReorderError {
    /// The dragged item is no longer part of the list.
    #[error("dragged item {0} is not part of the list")]
    UnknownActive(String),
    /// The item under the pointer is no longer part of the list.
    #[error("drop target {0} is not part of the list")]
    UnknownTarget(String),
}

/// Errors while loading or saving a [`GridConfig`](crate::GridConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse grid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to serialize grid config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Invalid grid config: {0}")]
    Invalid(String),
}
