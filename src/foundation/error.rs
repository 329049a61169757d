/// Result type used throughout the crate.
pub type WrappedResult<T> = Result<T, WrappedError>;

/// Failure taxonomy shared by aggregation, rendering and report output.
#[derive(thiserror::Error, Debug)]
pub enum WrappedError {
    /// A play points at a game or player the log does not define, or carries an unreadable date.
    #[error("reference error: {0}")]
    Reference(String),

    /// Missing or undecodable template, font or cover art, or an unwritable output directory.
    #[error("asset error: {0}")]
    Asset(String),

    /// Game metadata could not be resolved.
    #[error("lookup error: {0}")]
    Lookup(String),

    /// Invalid layout, canvas or configuration values.
    #[error("validation error: {0}")]
    Validation(String),

    /// JSON input or output failed to (de)serialize.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Lower-level error from a dependency or I/O, with its context chain.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WrappedError {
    /// Build a [`WrappedError::Reference`] value.
    pub fn reference(msg: impl Into<String>) -> Self {
        Self::Reference(msg.into())
    }

    /// Build a [`WrappedError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`WrappedError::Lookup`] value.
    pub fn lookup(msg: impl Into<String>) -> Self {
        Self::Lookup(msg.into())
    }

    /// Build a [`WrappedError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`WrappedError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for WrappedError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
