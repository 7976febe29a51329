use thiserror::Error;

pub type Result<T> = std::result::Result<T, ParameterError>;

/// Rejections raised while turning host input into engine parameters. The
/// engines themselves never fail; they clamp.
#[derive(Debug, Error, PartialEq)]
pub enum ParameterError {
    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },

    #[error("initial units must be > 0, got {0}")]
    NonPositiveUnits(i64),

    #[error("{0}")]
    Incomplete(&'static str),

    #[error("invalid payload: {0}")]
    Payload(String),
}

impl From<serde_json::Error> for ParameterError {
    fn from(value: serde_json::Error) -> Self {
        ParameterError::Payload(value.to_string())
    }
}
