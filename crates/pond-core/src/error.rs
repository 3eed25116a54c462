//! Error types for Pond

use thiserror::Error;

/// The main error type for Pond operations
#[derive(Debug, Error)]
pub enum PondError {
    #[error("Asset error: {0}")]
    AssetError(String),

    #[error("Image decode error for '{name}': {reason}")]
    ImageDecodeError { name: String, reason: String },

    #[error("Animation error: {0}")]
    AnimationError(String),

    #[error("Scene error: {0}")]
    SceneError(String),

    #[error("Render error: {0}")]
    RenderError(String),

    #[error("Audio error: {0}")]
    AudioError(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("TOML serialization error: {0}")]
    TomlSerError(String),
}

/// Result type alias for Pond operations
pub type Result<T> = std::result::Result<T, PondError>;

impl From<toml::de::Error> for PondError {
    fn from(err: toml::de::Error) -> Self {
        PondError::TomlParseError(err.to_string())
    }
}

impl From<toml::ser::Error> for PondError {
    fn from(err: toml::ser::Error) -> Self {
        PondError::TomlSerError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_errors_convert() {
        let err: PondError = toml::from_str::<toml::Value>("= broken").unwrap_err().into();
        assert!(matches!(err, PondError::TomlParseError(_)));
    }

    #[test]
    fn decode_error_names_image() {
        let err = PondError::ImageDecodeError {
            name: "fruit".into(),
            reason: "truncated".into(),
        };
        assert_eq!(err.to_string(), "Image decode error for 'fruit': truncated");
    }
}
