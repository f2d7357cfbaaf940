//! # Error Types
//!
//! This module defines error types used throughout the labelkit library.
//!
//! Only failures that must stop a run live here. A barcode or QR block that
//! cannot be rendered is not an error: the composer records a
//! [`RenderDegradation`](crate::label::RenderDegradation) and keeps going.

use thiserror::Error;

/// Main error type for labelkit operations
#[derive(Debug, Error)]
pub enum LabelError {
    /// Malformed or missing configuration field
    #[error("Config error: {0}")]
    Config(String),

    /// Rendering collaborator failure
    #[error("Render error: {0}")]
    Render(String),

    /// Image encoding or decoding error
    #[error("Image error: {0}")]
    Image(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for LabelError {
    fn from(e: serde_json::Error) -> Self {
        LabelError::Config(e.to_string())
    }
}

impl From<image::ImageError> for LabelError {
    fn from(e: image::ImageError) -> Self {
        LabelError::Image(e.to_string())
    }
}
