use crate::file_processor::FileProcessorError;
use crate::lexical::ScanError;
use crate::logging::{codes, Code};

/// Session errors
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("File processing failed: {0}")]
    FileProcessing(#[from] FileProcessorError),

    #[error("Scan failed: {0}")]
    Scan(#[from] ScanError),

    #[error("Character source failed: {message}")]
    SourceRead { message: String },

    #[error("Invalid registration: {message}")]
    Configuration { message: String },

    #[error("Invalid token definitions: {message}")]
    Definitions { message: String },
}

impl SessionError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn definitions(message: impl Into<String>) -> Self {
        Self::Definitions {
            message: message.into(),
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            SessionError::FileProcessing(e) => e.error_code(),
            SessionError::Scan(e) => e.error_code(),
            SessionError::SourceRead { .. } => codes::scanning::SOURCE_READ_FAILURE,
            SessionError::Configuration { .. } => codes::configuration::INVALID_REGISTRATION,
            SessionError::Definitions { .. } => codes::configuration::INVALID_DEFINITIONS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_follow_source() {
        let error = SessionError::from(FileProcessorError::FileNotFound {
            path: "x".to_string(),
        });
        assert_eq!(error.error_code().as_str(), "E005");
        assert!(error.to_string().starts_with("File processing failed"));

        assert_eq!(SessionError::configuration("empty").error_code().as_str(), "E030");
        assert_eq!(SessionError::definitions("bad").error_code().as_str(), "E031");
        assert_eq!(
            SessionError::SourceRead {
                message: "broken pipe".to_string()
            }
            .error_code()
            .as_str(),
            "E020"
        );
    }
}
