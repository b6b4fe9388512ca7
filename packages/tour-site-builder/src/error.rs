use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}: invalid GPX: {source}")]
    Gpx {
        path: PathBuf,
        #[source]
        source: gpx::errors::GpxError,
    },
    #[error("{path}: invalid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("directory not found: {0}")]
    MissingDirectory(PathBuf),
    #[error("template not found: {0}")]
    MissingTemplate(PathBuf),
    #[error("no {extension} files found in {dir}")]
    NoInputs { dir: PathBuf, extension: String },
}

impl BuildError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        BuildError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn json(path: &Path, source: serde_json::Error) -> Self {
        BuildError::Json {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, BuildError>;
