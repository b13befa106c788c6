use thiserror::Error;

/// Errors arising from analytics operations.
///
/// Every operation in this crate is total over its documented domain;
/// anything outside it is rejected synchronously with one of these.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("invalid input for {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("no matching {what}")]
    NoMatchingData { what: &'static str },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AnalyticsError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    /// Process exit code used by the command-line front end.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidInput { .. } => 2,
            Self::NoMatchingData { .. } => 3,
            Self::Config(_) => 4,
            Self::Io(_) | Self::Json(_) => 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_message() {
        let err = AnalyticsError::invalid("shipment_value", "must be positive, got -1");
        assert_eq!(
            err.to_string(),
            "invalid input for shipment_value: must be positive, got -1"
        );
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_json_error_converts() {
        let parse: Result<u32, _> = serde_json::from_str("not json");
        let err: AnalyticsError = parse.unwrap_err().into();
        assert!(matches!(err, AnalyticsError::Json(_)));
        assert_eq!(err.exit_code(), 5);
    }
}
