use thiserror::Error;

/// Result type for property list reading
pub type Result<T> = std::result::Result<T, PlistError>;

/// Errors that can occur while reading a property list
#[derive(Error, Debug)]
pub enum PlistError {
    /// Malformed OpenStep syntax
    #[error("Syntax error at {line}:{column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    /// Input ended inside a value
    #[error("Unexpected end of input while reading {0}")]
    UnexpectedEof(&'static str),

    /// JSON-encoded input failed to parse
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PlistError {
    /// Create a syntax error at a 1-based line/column
    pub fn syntax(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            column,
            message: message.into(),
        }
    }
}
