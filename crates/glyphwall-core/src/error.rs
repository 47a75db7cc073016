//! Error types for Glyphwall

use thiserror::Error;

/// The main error type for Glyphwall operations
#[derive(Debug, Error)]
pub enum GlyphwallError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("Invalid field type: expected {expected}, got {got}")]
    InvalidFieldType { expected: String, got: String },

    #[error("Value out of range: {field} must be between {min} and {max}, got {value}")]
    ValueOutOfRange {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },

    #[error("Invalid enum value: {value} is not one of {allowed:?}")]
    InvalidEnumValue {
        value: String,
        allowed: Vec<String>,
    },
}

/// Result type alias for Glyphwall operations
pub type Result<T> = std::result::Result<T, GlyphwallError>;

impl From<toml::de::Error> for GlyphwallError {
    fn from(err: toml::de::Error) -> Self {
        GlyphwallError::TomlParseError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_error_lists_allowed() {
        let err = GlyphwallError::InvalidEnumValue {
            value: "spin".into(),
            allowed: vec!["press".into(), "swirl".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("spin"));
        assert!(msg.contains("swirl"));
    }

    #[test]
    fn test_range_error_names_bounds() {
        let err = GlyphwallError::ValueOutOfRange {
            field: "density".into(),
            min: 0.0,
            max: 1.0,
            value: 1.5,
        };
        assert_eq!(
            err.to_string(),
            "Value out of range: density must be between 0 and 1, got 1.5"
        );
    }

    #[test]
    fn test_toml_error_conversion() {
        let bad = toml::from_str::<toml::value::Table>("mode = ").unwrap_err();
        let err: GlyphwallError = bad.into();
        assert!(matches!(err, GlyphwallError::TomlParseError(_)));
    }
}
