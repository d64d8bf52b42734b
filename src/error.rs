use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShowError {
    /// A document or image could not be opened or decoded.
    #[error("failed to load {}: {reason}", path.display())]
    Load { path: PathBuf, reason: String },
    /// A cover-dependent action was attempted before a cover was set.
    #[error("no cover set")]
    NoCover,
    #[error("page {index} is out of range for a deck of {len}")]
    InvalidIndex { index: usize, len: usize },
    /// The output process could not be spawned or stopped accepting commands.
    #[error("output surface failed: {0}")]
    Surface(#[from] io::Error),
}

impl ShowError {
    pub fn load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Load { path: path.into(), reason: reason.to_string() }
    }
}

pub type Result<T> = std::result::Result<T, ShowError>;
