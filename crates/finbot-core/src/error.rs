use thiserror::Error;

use crate::http_client::HttpError;

/// Validation and contract errors exposed by `finbot-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter: '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("invalid table grammar '{value}', expected one of strict, lenient")]
    InvalidGrammar { value: String },
    #[error("invalid row alignment '{value}', expected one of preserve, pad, reject")]
    InvalidRowAlignment { value: String },

    #[error("invalid port '{value}' in {variable}")]
    InvalidPort { variable: &'static str, value: String },
    #[error("base url must start with http:// or https://: '{value}'")]
    InvalidBaseUrl { value: String },
    #[error("polling interval must be greater than zero")]
    ZeroInterval,
}

/// Failure of a single backend fetch.
///
/// Transport, status and decode failures are all "the backend could not be
/// reached properly" and share one user-facing message; payload errors carry
/// the backend's own text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(#[from] HttpError),

    #[error("backend returned status {0}")]
    Status(u16),

    #[error("failed to decode backend response: {0}")]
    Decode(String),

    #[error("{0}")]
    Payload(String),
}

impl FetchError {
    /// `true` for every failure that is not an error reported inside a
    /// well-formed payload.
    pub const fn is_transport(&self) -> bool {
        !matches!(self, Self::Payload(_))
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_errors_are_not_transport_errors() {
        assert!(!FetchError::Payload(String::from("No data available")).is_transport());
        assert!(FetchError::Status(502).is_transport());
        assert!(FetchError::Decode(String::from("eof")).is_transport());
    }

    #[test]
    fn payload_error_displays_backend_text_verbatim() {
        let error = FetchError::Payload(String::from("No data available for this symbol"));
        assert_eq!(error.to_string(), "No data available for this symbol");
    }
}
