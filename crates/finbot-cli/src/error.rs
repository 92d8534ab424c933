use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] finbot_core::ValidationError),

    #[error(transparent)]
    Fetch(#[from] finbot_core::FetchError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Fetch(_) => 3,
            Self::Serialization(_) => 4,
            Self::Io(_) => 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use finbot_core::{FetchError, ValidationError};

    use super::*;

    #[test]
    fn exit_codes_follow_error_category() {
        assert_eq!(CliError::from(ValidationError::EmptySymbol).exit_code(), 2);
        assert_eq!(CliError::from(FetchError::Status(503)).exit_code(), 3);
        assert_eq!(
            CliError::from(std::io::Error::other("closed pipe")).exit_code(),
            10
        );
    }
}
