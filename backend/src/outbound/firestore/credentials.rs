//! Service-account key files.

use std::path::Path;

use cap_std::{ambient_authority, fs::Dir};
use serde::Deserialize;
use thiserror::Error;

/// Fields of a service-account JSON key the store needs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceAccountKey {
    pub project_id: String,
    #[serde(default)]
    pub client_email: Option<String>,
}

/// Errors raised while reading a service-account key.
#[derive(Debug, Error)]
pub enum ServiceAccountKeyError {
    #[error("read service account key '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parse service account key '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("service account key '{path}' has an empty project_id")]
    MissingProject { path: String },
}

impl ServiceAccountKey {
    /// Read and validate a key file.
    pub fn read(path: &Path) -> Result<Self, ServiceAccountKeyError> {
        let display = path.display().to_string();
        let read_error = |source| ServiceAccountKeyError::Read {
            path: display.clone(),
            source,
        };

        let parent = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let file_name = path.file_name().ok_or_else(|| {
            read_error(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "key path must name a file",
            ))
        })?;
        let directory = Dir::open_ambient_dir(parent, ambient_authority()).map_err(read_error)?;
        let contents = directory.read_to_string(file_name).map_err(read_error)?;

        Self::parse(&contents, &display)
    }

    fn parse(contents: &str, path: &str) -> Result<Self, ServiceAccountKeyError> {
        let key: Self =
            serde_json::from_str(contents).map_err(|source| ServiceAccountKeyError::Parse {
                path: path.to_owned(),
                source,
            })?;
        if key.project_id.trim().is_empty() {
            return Err(ServiceAccountKeyError::MissingProject {
                path: path.to_owned(),
            });
        }
        Ok(key)
    }
}
