//! Error types for rule configuration.

use thiserror::Error;

/// A configuration value that names no known option.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownOption {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownOption {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        UnknownOption {
            kind,
            value: value.to_string(),
        }
    }
}

/// Errors raised while turning configuration text into rules.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The checkstyle XML is not well formed.
    #[error("invalid checkstyle XML: {0}")]
    Xml(#[from] roxmltree::Error),

    /// The JSON rule list does not match the expected shape.
    #[error("invalid rule list: {0}")]
    Json(#[from] serde_json::Error),

    /// A `<property>` element without a `name` or `value` attribute.
    #[error("<property> in module '{module}' is missing its '{attribute}' attribute")]
    MissingAttribute {
        module: String,
        attribute: &'static str,
    },

    /// A recognised property whose value cannot be used.
    #[error("module '{module}': invalid value for property '{property}': {message}")]
    InvalidProperty {
        module: String,
        property: String,
        message: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid_property(
        module: &str,
        property: &str,
        message: impl Into<String>,
    ) -> Self {
        ConfigError::InvalidProperty {
            module: module.to_string(),
            property: property.to_string(),
            message: message.into(),
        }
    }
}
