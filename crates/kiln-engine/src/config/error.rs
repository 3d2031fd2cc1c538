use thiserror::Error;

/// A parameter value that could not be converted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("expected a boolean, found {0:?}")]
    InvalidBool(String),

    #[error("expected a number, found {0:?}")]
    InvalidNumber(String),

    #[error("expected {expected} components, found {found} in {value:?}")]
    ComponentCount {
        expected: usize,
        found: usize,
        value: String,
    },

    #[error("invalid colour {0:?}")]
    InvalidColour(String),

    #[error("unknown alignment anchor {0:?}")]
    UnknownAnchor(String),

    #[error("unknown value {value:?} for {key}")]
    UnknownVariant { key: String, value: String },

    #[error("missing parameter {0}")]
    Missing(String),
}
