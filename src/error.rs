/// Error types for loading plugin options and locale data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum I18nError {
    /// Reading a file failed
    Io(String),
    /// A document was not valid JSON or did not match the expected shape
    Json(String),
    /// Plugin options were well-formed JSON but unusable
    InvalidOptions(String),
    /// A locale slug could not be parsed
    InvalidLocale(String),
}

impl std::fmt::Display for I18nError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            I18nError::Io(msg) => write!(f, "I/O error: {}", msg),
            I18nError::Json(msg) => write!(f, "JSON error: {}", msg),
            I18nError::InvalidOptions(msg) => write!(f, "Invalid plugin options: {}", msg),
            I18nError::InvalidLocale(msg) => write!(f, "Invalid locale: {}", msg),
        }
    }
}

impl std::error::Error for I18nError {}

/// Result type for loading operations
pub type I18nResult<T> = Result<T, I18nError>;
