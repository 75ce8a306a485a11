use std::path::PathBuf;
use thiserror::Error;

/// A specialized `Result` type for matching operations.
pub type Result<T> = std::result::Result<T, MatchError>;

/// The error type for all matching operations.
///
/// "No match" is never an error: the engine reports it as an empty result
/// list (or `None`). Only `expect` turns absence into [`MatchError::TemplateNotFound`].
#[derive(Debug, Error)]
pub enum MatchError {
    #[error(
        "Mask size {mask_width}x{mask_height} does not match template size {template_width}x{template_height}"
    )]
    MaskShapeMismatch {
        mask_width: u32,
        mask_height: u32,
        template_width: u32,
        template_height: u32,
    },

    #[error("Invalid argument: {description}")]
    InvalidArgument { description: String },

    #[error("Template not found: {name}")]
    TemplateNotFound { name: String },

    #[error("Failed to load image {path:?}: {source}")]
    ImageLoad {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to save image {path:?}: {source}")]
    ImageSave {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Operation timed out after {duration:?}: {description}")]
    Timeout {
        duration: std::time::Duration,
        description: String,
    },
}

impl MatchError {
    pub(crate) fn invalid(description: impl Into<String>) -> Self {
        MatchError::InvalidArgument {
            description: description.into(),
        }
    }

    /// Whether the search could not be performed because of the caller's input,
    /// as opposed to a missing template or an I/O failure.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            MatchError::MaskShapeMismatch { .. } | MatchError::InvalidArgument { .. }
        )
    }
}
