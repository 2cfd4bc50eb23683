use thiserror::Error;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Error, Debug)]
pub enum ScrapingError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Browser error: {0}")]
    BrowserError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Missing required parameters")]
    MissingParameters,

    #[error("Invalid numeric parameter: {0}")]
    InvalidInput(String),
}

impl ScrapingError {
    /// Errors caused by the caller's request rather than by the service.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ScrapingError::MissingParameters | ScrapingError::InvalidInput(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_parameters_message() {
        let err = ScrapingError::MissingParameters;
        assert_eq!(err.to_string(), "Missing required parameters");
        assert!(err.is_client_error());
    }

    #[test]
    fn test_browser_error_is_not_client_error() {
        let err = ScrapingError::BrowserError("crashed".to_string());
        assert!(!err.is_client_error());
        assert_eq!(err.to_string(), "Browser error: crashed");
    }
}
