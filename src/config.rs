use std::env;
use std::path::{Path, PathBuf};

use crate::error::AppError;

pub const DEFAULT_API_BASE: &str = "https://classroom.googleapis.com/v1";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub credentials_path: PathBuf,
    pub token_path: PathBuf,
    pub api_base: String,
}

impl AppConfig {
    /// Data files are looked up relative to the working directory unless
    /// `CLASSHARD_DIR` points elsewhere.
    pub fn new_from_env() -> Result<Self, AppError> {
        let data_dir = env::var("CLASSHARD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));
        if !data_dir.is_dir() {
            return Err(AppError::Config(format!(
                "CLASSHARD_DIR {} is not a directory",
                data_dir.display()
            )));
        }

        let mut config = Self::with_data_dir(data_dir);
        if let Ok(path) = env::var("CLASSHARD_CREDENTIALS") {
            config.credentials_path = PathBuf::from(path);
        }
        if let Ok(path) = env::var("CLASSHARD_TOKEN") {
            config.token_path = PathBuf::from(path);
        }
        if let Ok(base) = env::var("CLASSROOM_API_BASE") {
            config.api_base = base.trim_end_matches('/').to_string();
        }

        Ok(config)
    }

    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            credentials_path: data_dir.join("credentials.json"),
            token_path: data_dir.join("token.json"),
            api_base: DEFAULT_API_BASE.to_string(),
            data_dir,
        }
    }

    pub fn schedules_path(&self) -> PathBuf {
        self.data_dir.join("schedules.json")
    }

    pub fn course_works_path(&self) -> PathBuf {
        self.data_dir.join("courseWorks.json")
    }

    pub fn cache_dir(&self) -> &Path {
        &self.data_dir
    }
}
