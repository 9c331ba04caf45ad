/// Convenience result type used across softgl.
pub type SoftGlResult<T> = Result<T, SoftGlError>;

/// Errors raised by the fallible, data-fed surfaces: options, uploads and scene scripts.
///
/// Submission and presentation never return these. Misuse of the submission API is a
/// programmer error and panics instead.
#[derive(thiserror::Error, Debug)]
pub enum SoftGlError {
    /// Invalid options or script data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Pixel data handed to a texture or image upload does not match its declared shape.
    #[error("upload error: {0}")]
    Upload(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SoftGlError {
    /// Build a [`SoftGlError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SoftGlError::Upload`] value.
    pub fn upload(msg: impl Into<String>) -> Self {
        Self::Upload(msg.into())
    }

    /// Build a [`SoftGlError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
