//! Error types for transferkit operations.
//!
//! Every error carries a stable numeric code so mobile and FFI hosts can
//! branch on failures without matching on message text.

/// Error codes for FFI and mobile integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum TransferkitErrorCode {
    /// Invalid request/data
    InvalidData = 5000,
    /// Serialization error
    Serialization = 5002,
    /// Token outside one of the closed enums (network, asset, ...)
    Unsupported = 5003,
}

/// Error type for configuration and data-model operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransferkitError {
    /// A field failed validation.
    #[error("invalid {field}: {reason}")]
    InvalidData {
        /// Field or parameter name
        field: String,
        /// Reason for invalidity
        reason: String,
    },

    /// A string token did not name any member of a closed set.
    #[error("unsupported {kind}: {value}")]
    Unsupported {
        /// Which closed set was consulted (e.g. "network")
        kind: &'static str,
        /// The rejected token
        value: String,
    },

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl TransferkitError {
    /// Get the error code for FFI/mobile integration.
    pub fn code(&self) -> TransferkitErrorCode {
        match self {
            Self::InvalidData { .. } => TransferkitErrorCode::InvalidData,
            Self::Unsupported { .. } => TransferkitErrorCode::Unsupported,
            Self::Serialization(_) => TransferkitErrorCode::Serialization,
        }
    }

    /// Get the error message as an owned String (useful for FFI).
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Create an invalid data error.
    pub fn invalid_data(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidData {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create an unsupported-token error.
    pub fn unsupported(kind: &'static str, value: impl Into<String>) -> Self {
        Self::Unsupported {
            kind,
            value: value.into(),
        }
    }
}

impl From<serde_json::Error> for TransferkitError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = TransferkitError::invalid_data("partnerId", "must not be empty");
        assert_eq!(err.code(), TransferkitErrorCode::InvalidData);
        assert_eq!(err.code() as i32, 5000);

        let err = TransferkitError::unsupported("network", "bitcoin:mainnet");
        assert_eq!(err.code(), TransferkitErrorCode::Unsupported);
    }

    #[test]
    fn test_error_display() {
        let err = TransferkitError::invalid_data("walletAddress", "must not be empty");
        assert_eq!(err.message(), "invalid walletAddress: must not be empty");

        let err = TransferkitError::unsupported("asset", "DOGE");
        assert!(err.to_string().contains("DOGE"));
    }

    #[test]
    fn test_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err: TransferkitError = json_err.into();
        assert_eq!(err.code(), TransferkitErrorCode::Serialization);
    }
}
