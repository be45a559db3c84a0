/// Convenience result type used across cardsheet.
pub type CardsheetResult<T> = Result<T, CardsheetError>;

/// Top-level error taxonomy used by the composer and PDF APIs.
///
/// The layout solver never produces an error: degenerate geometry yields an empty layout.
#[derive(thiserror::Error, Debug)]
pub enum CardsheetError {
    /// A source image or document could not be located.
    #[error("not found: {0}")]
    NotFound(String),

    /// Zero or negative dimensions, undecodable images, unknown sheet names.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Reading or writing a file failed.
    #[error("io error: {context}")]
    Io {
        /// What was being done when the failure happened.
        context: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// Errors when serializing or deserializing settings and lists.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CardsheetError {
    /// Build a [`CardsheetError::NotFound`] value.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Build a [`CardsheetError::InvalidInput`] value.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Build a [`CardsheetError::Io`] value.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Build a [`CardsheetError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
