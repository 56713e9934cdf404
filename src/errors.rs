use std::fmt;

/// Errors surfaced by the extraction and analysis pipeline.
///
/// Extraction and evaluation degrade to defaults wherever they can, so these
/// only cover the cases where no sensible value exists.
#[derive(Debug)]
pub enum AnalyzerError {
    /// Input could not be read as text (e.g. a non UTF-8 byte stream).
    InputError(String),
    /// Unsupported source format or file extension.
    ConfigurationError(String),
    /// A criterion the evaluator reads is absent from the criteria document.
    MissingCriteria(String),
    /// A criteria value was present but could not be parsed.
    CriteriaParse(String),
    /// Filesystem error.
    Io(std::io::Error),
    /// JSON (de)serialization error.
    Json(serde_json::Error),
    /// Error with context chain for better debugging.
    WithContext {
        /// The underlying source of the error.
        source: Box<AnalyzerError>,
        /// Additional context message.
        context: String,
    },
}

impl fmt::Display for AnalyzerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalyzerError::InputError(msg) => write!(f, "Input error: {}", msg),
            AnalyzerError::ConfigurationError(msg) => write!(f, "Configuration error: {}", msg),
            AnalyzerError::MissingCriteria(field) => {
                write!(f, "Missing investment criterion: {}", field)
            }
            AnalyzerError::CriteriaParse(msg) => write!(f, "Criteria parse error: {}", msg),
            AnalyzerError::Io(e) => write!(f, "I/O error: {}", e),
            AnalyzerError::Json(e) => write!(f, "JSON error: {}", e),
            AnalyzerError::WithContext { source, context } => {
                write!(f, "{}: {}", context, source)
            }
        }
    }
}

impl std::error::Error for AnalyzerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AnalyzerError::Io(e) => Some(e),
            AnalyzerError::Json(e) => Some(e),
            AnalyzerError::WithContext { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl From<std::io::Error> for AnalyzerError {
    fn from(err: std::io::Error) -> Self {
        AnalyzerError::Io(err)
    }
}

impl From<serde_json::Error> for AnalyzerError {
    fn from(err: serde_json::Error) -> Self {
        AnalyzerError::Json(err)
    }
}

impl AnalyzerError {
    /// Returns the innermost error, skipping any context wrappers.
    pub fn root(&self) -> &AnalyzerError {
        match self {
            AnalyzerError::WithContext { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Extension trait for adding context to errors.
/// Similar to `anyhow::Context` but for our `AnalyzerError` type.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T, AnalyzerError>;

    /// Add context lazily (only evaluated on error).
    fn with_context<F>(self, f: F) -> Result<T, AnalyzerError>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T, AnalyzerError> {
    fn context(self, context: impl Into<String>) -> Result<T, AnalyzerError> {
        self.map_err(|e| AnalyzerError::WithContext {
            source: Box::new(e),
            context: context.into(),
        })
    }

    fn with_context<F>(self, f: F) -> Result<T, AnalyzerError>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AnalyzerError::WithContext {
            source: Box::new(e),
            context: f(),
        })
    }
}

/// Extension for io::Error to add context
impl<T> ResultExt<T> for Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T, AnalyzerError> {
        self.map_err(|e| AnalyzerError::WithContext {
            source: Box::new(AnalyzerError::Io(e)),
            context: context.into(),
        })
    }

    fn with_context<F>(self, f: F) -> Result<T, AnalyzerError>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AnalyzerError::WithContext {
            source: Box::new(AnalyzerError::Io(e)),
            context: f(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_chain_display() {
        let result: Result<(), AnalyzerError> =
            Err(AnalyzerError::MissingCriteria("max_purchase_price".to_string()));
        let err = result.context("loading criteria").unwrap_err();

        assert_eq!(
            err.to_string(),
            "loading criteria: Missing investment criterion: max_purchase_price"
        );
        assert!(matches!(err.root(), AnalyzerError::MissingCriteria(_)));
    }

    #[test]
    fn test_io_error_context() {
        let result: Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no such file",
        ));
        let err = result
            .with_context(|| "reading criteria.md".to_string())
            .unwrap_err();

        assert!(err.to_string().starts_with("reading criteria.md: I/O error"));
        assert!(matches!(err.root(), AnalyzerError::Io(_)));
    }
}
