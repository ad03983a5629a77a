//! Pipeline error types.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failures of the open → composite → encode → write pipeline.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("input document `{0}` does not exist")]
    NotFound(PathBuf),

    #[error("IO error when reading `{0}`")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("failed to decode `{path}`: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("failed to encode PNG for `{0}`")]
    Encode(PathBuf, #[source] image::ImageError),

    #[error("IO error when writing `{0}`")]
    Write(PathBuf, #[source] std::io::Error),
}

impl ProcessError {
    pub fn decode(path: &Path, reason: impl Into<String>) -> Self {
        Self::Decode {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Process exit code for this failure class.
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::NotFound(_) => 2,
            Self::Read(..) | Self::Decode { .. } => 3,
            Self::Encode(..) | Self::Write(..) => 4,
        }
    }
}
