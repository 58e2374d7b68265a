//! Error types for swing parameter loading and interchange.
//!
//! Only terminal failures live here: malformed input and I/O. Everything
//! the data model can recover from (missing leaves, unresolved hashes,
//! lookup misses) is reported as a value, never raised as an error.

use thiserror::Error;

/// Errors that can occur while loading or writing swing parameter data.
#[derive(Debug, Error)]
pub enum SwingError {
    /// Malformed XML input. The document being loaded is discarded and
    /// prior state is left untouched.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// Malformed label CSV input.
    #[error("label CSV parse error: {0}")]
    CsvParse(String),

    /// A struct entry or leaf appeared somewhere the format does not
    /// allow it (e.g. a `<struct>` outside any list).
    #[error("invalid element: {element} in {context}")]
    InvalidElement {
        /// The offending element name.
        element: String,
        /// Where it was encountered.
        context: String,
    },

    /// A leaf carried a value that does not parse as its declared type.
    #[error("invalid value for {field} on {element}: {message}")]
    InvalidValue {
        /// The `hash` attribute naming the field.
        field: String,
        /// The leaf's element tag (`float`, `int`, `sbyte`, `hash40`).
        element: String,
        /// Why the value is invalid.
        message: String,
    },

    /// XML serialization error.
    #[error("XML write error: {0}")]
    XmlWrite(String),

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A named document or struct was requested but does not exist.
    /// Only used by operations where the caller asked for something
    /// specific by name; plain queries return `Option` instead.
    #[error("not found: {0}")]
    NotFound(String),
}

impl SwingError {
    /// Create an invalid element error.
    pub fn invalid_element(element: impl Into<String>, context: impl Into<String>) -> Self {
        Self::InvalidElement {
            element: element.into(),
            context: context.into(),
        }
    }

    /// Create an invalid value error.
    pub fn invalid_value(
        field: impl Into<String>,
        element: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            element: element.into(),
            message: message.into(),
        }
    }
}

/// Result type for swing data operations.
pub type Result<T> = std::result::Result<T, SwingError>;
