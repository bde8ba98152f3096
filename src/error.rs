use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Text or options the renderer cannot work with.
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// The asset catalog could not be loaded.
    #[error("Missing asset {}: {reason}", path.display())]
    MissingAsset { path: PathBuf, reason: String },

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Error::InvalidInput {
            reason: reason.into(),
        }
    }

    pub fn missing_asset(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::MissingAsset {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// A character with no alphabet entry. Skipped during layout, never fatal.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("unknown character {ch:?} at position {index}")]
pub struct UnknownCharacter {
    pub ch: char,
    pub index: usize,
}
