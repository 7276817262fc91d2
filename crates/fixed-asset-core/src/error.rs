use thiserror::Error;

#[derive(Debug, Error)]
pub enum FixedAssetError {
    #[error("Configuration error ({context}): {field} — {reason}")]
    Configuration {
        context: String,
        field: String,
        reason: String,
    },

    #[error("Input out of range ({context}): {field} — {reason}")]
    InputRange {
        context: String,
        field: String,
        reason: String,
    },

    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl FixedAssetError {
    pub(crate) fn configuration(
        context: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        FixedAssetError::Configuration {
            context: context.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn input_range(
        context: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        FixedAssetError::InputRange {
            context: context.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// The offending field, for callers that map errors back onto form inputs.
    pub fn field(&self) -> Option<&str> {
        match self {
            FixedAssetError::Configuration { field, .. }
            | FixedAssetError::InputRange { field, .. }
            | FixedAssetError::InvalidInput { field, .. } => Some(field),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for FixedAssetError {
    fn from(e: serde_json::Error) -> Self {
        FixedAssetError::SerializationError(e.to_string())
    }
}
