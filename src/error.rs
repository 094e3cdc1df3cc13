//! Error types for the city guide.

use thiserror::Error;

/// Result type used across the crate.
pub type Result<T> = std::result::Result<T, GuideError>;

/// Errors raised at the edges of the guide: loading data, loading config and
/// resolving cities. The search core itself never fails.
#[derive(Error, Debug)]
pub enum GuideError {
  /// I/O error while reading a data or config file.
  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),

  /// A place data file could not be decoded.
  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),

  /// A config file could not be decoded.
  #[error("Config parse error: {0}")]
  ConfigParse(#[from] toml::de::Error),

  /// The configuration decoded but is not usable.
  #[error("Configuration error: {0}")]
  Config(String),

  /// The requested city is not in the registry.
  #[error("Unknown city: {0}")]
  UnknownCity(String),

  /// A tag normalizes to an empty or comma-joined id.
  #[error("Invalid tag: {0:?}")]
  InvalidTag(String),

  /// A category string is not one of EAT, SEE or DO.
  #[error("Invalid category: {0}")]
  InvalidCategory(String),
}
