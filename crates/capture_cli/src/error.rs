use std::{
    io,
    path::{Path, PathBuf},
};

use capture_client::{ConfigError, DispatchError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid dsn: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to build store request: {0}")]
    Dispatch(#[from] DispatchError),
}

pub(crate) fn read_input(path: &Path) -> Result<String, Error> {
    std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })
}
