//! JSON file helpers shared by the input files, the catalog cache and the
//! token store.

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::AppError;

pub async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| AppError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Like [`read_json`], but a missing file reads as `None`.
pub async fn read_json_if_exists<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, AppError> {
    match tokio::fs::try_exists(path).await {
        Ok(true) => read_json(path).await.map(Some),
        Ok(false) => Ok(None),
        Err(source) => Err(AppError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Overwrites `path` with `value`, creating the parent directory if needed.
pub async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), AppError> {
    let io_err = |source| AppError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
    }

    let body = serde_json::to_vec(value).map_err(|source| AppError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    tokio::fs::write(path, body).await.map_err(io_err)
}
