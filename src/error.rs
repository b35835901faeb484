//! Error types
//!
//! Asset loading is the only runtime failure the game recognizes; config
//! errors only surface while reading a tuning file.

use std::fmt;

/// Failure to acquire a sprite texture
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    /// File (or prefetched resource) does not exist
    NotFound { path: String },
    /// Bytes were present but could not be decoded as an image
    Decode { path: String, reason: String },
    /// Loaded texture failed the validity check (zero-sized)
    Invalid { path: String },
}

impl AssetError {
    pub fn path(&self) -> &str {
        match self {
            AssetError::NotFound { path }
            | AssetError::Decode { path, .. }
            | AssetError::Invalid { path } => path,
        }
    }
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::NotFound { path } => write!(f, "asset not found: {path}"),
            AssetError::Decode { path, reason } => {
                write!(f, "failed to decode {path}: {reason}")
            }
            AssetError::Invalid { path } => write!(f, "invalid texture: {path}"),
        }
    }
}

impl std::error::Error for AssetError {}

/// Failure to read or validate a `GameConfig`
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    /// Field value out of its allowed range
    Invalid { field: &'static str, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config: {e}"),
            ConfigError::Parse(e) => write!(f, "malformed config: {e}"),
            ConfigError::Invalid { field, reason } => write!(f, "invalid {field}: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid { .. } => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// Startup failure of a game session
#[derive(Debug)]
pub enum GameError {
    Asset(AssetError),
    /// Config does not fit the loaded sprites
    Config(ConfigError),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::Asset(e) => write!(f, "{e}"),
            GameError::Config(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::Asset(e) => Some(e),
            GameError::Config(e) => Some(e),
        }
    }
}

impl From<AssetError> for GameError {
    fn from(e: AssetError) -> Self {
        GameError::Asset(e)
    }
}

impl From<ConfigError> for GameError {
    fn from(e: ConfigError) -> Self {
        GameError::Config(e)
    }
}
