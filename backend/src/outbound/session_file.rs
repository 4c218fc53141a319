//! Cached session persisted as a JSON file.
//!
//! The file plays the role a browser's persisted auth state plays for the
//! web client: it survives restarts and is what a reload reads back. The
//! in-memory cache is the "local state" cleared by a force-reset.

use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::AuthenticatedUser;
use crate::domain::ports::{
    AuthService, AuthServiceError, IdentityStore, PageReloader, SessionStateStore,
};

/// Errors raised while reading or writing the session file.
#[derive(Debug, Error)]
pub enum SessionFileError {
    #[error("session file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("session file '{path}' is not a valid session: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone)]
enum Cached {
    Unknown,
    Known(Option<AuthenticatedUser>),
}

/// Session store backed by a single JSON file.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    cache: Mutex<Cached>,
}

impl FileSessionStore {
    /// Create a store for `path`. Nothing is read until first use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: Mutex::new(Cached::Unknown),
        }
    }

    /// Location of the session file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted user. A missing file means nobody is signed in.
    pub fn load(&self) -> Result<Option<AuthenticatedUser>, SessionFileError> {
        let contents = match self
            .open_parent()
            .and_then(|(dir, name)| dir.read_to_string(name))
        {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(self.io_error(err)),
        };
        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|source| SessionFileError::Parse {
                path: self.path.display().to_string(),
                source,
            })
    }

    /// Persist `user` and make it the cached session.
    pub fn save(&self, user: &AuthenticatedUser) -> Result<(), SessionFileError> {
        let parent = self.parent();
        Dir::create_ambient_dir_all(parent, ambient_authority())
            .map_err(|err| self.io_error(err))?;
        let encoded = serde_json::to_vec_pretty(user).map_err(|source| SessionFileError::Parse {
            path: self.path.display().to_string(),
            source,
        })?;
        self.open_parent()
            .and_then(|(dir, name)| dir.write(name, encoded))
            .map_err(|err| self.io_error(err))?;
        self.set_cache(Cached::Known(Some(user.clone())));
        Ok(())
    }

    fn parent(&self) -> &Path {
        self.path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
    }

    fn open_parent(&self) -> io::Result<(Dir, &OsStr)> {
        let name = self.path.file_name().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "session path must name a file")
        })?;
        let dir = Dir::open_ambient_dir(self.parent(), ambient_authority())?;
        Ok((dir, name))
    }

    fn io_error(&self, source: io::Error) -> SessionFileError {
        SessionFileError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }

    fn set_cache(&self, cached: Cached) {
        *self.cache.lock().unwrap_or_else(PoisonError::into_inner) = cached;
    }
}

impl IdentityStore for FileSessionStore {
    fn current_user(&self) -> Option<AuthenticatedUser> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Cached::Known(user) = &*cache {
            return user.clone();
        }
        let user = self.load().unwrap_or_else(|err| {
            warn!(error = %err, "ignoring unreadable session file");
            None
        });
        *cache = Cached::Known(user.clone());
        user
    }
}

impl SessionStateStore for FileSessionStore {
    fn clear(&self) {
        self.set_cache(Cached::Known(None));
    }
}

#[async_trait]
impl AuthService for FileSessionStore {
    async fn sign_out(&self) -> Result<(), AuthServiceError> {
        match self
            .open_parent()
            .and_then(|(dir, name)| dir.remove_file(name))
        {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(AuthServiceError::sign_out(self.io_error(err).to_string())),
        }
    }
}

impl PageReloader for FileSessionStore {
    fn reload(&self) {
        self.set_cache(Cached::Unknown);
        let user = self.current_user();
        info!(
            signed_in = user.is_some(),
            path = %self.path.display(),
            "session reloaded from disk"
        );
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn temp_dir() -> TempDir {
        tempfile::tempdir().expect("temp dir")
    }

    fn user() -> AuthenticatedUser {
        AuthenticatedUser::new("u1", "a@b.com").with_names("Ada", "Lovelace")
    }

    #[rstest]
    fn missing_file_means_signed_out(temp_dir: TempDir) {
        let store = FileSessionStore::new(temp_dir.path().join("session.json"));
        assert!(store.load().expect("load succeeds").is_none());
        assert!(store.current_user().is_none());
    }

    #[rstest]
    fn saved_sessions_round_trip_through_disk(temp_dir: TempDir) {
        let path = temp_dir.path().join("nested").join("session.json");
        FileSessionStore::new(&path).save(&user()).expect("save");

        let reopened = FileSessionStore::new(&path);
        assert_eq!(reopened.current_user(), Some(user()));
    }

    #[rstest]
    fn corrupt_files_are_reported_and_treated_as_signed_out(temp_dir: TempDir) {
        let path = temp_dir.path().join("session.json");
        std::fs::write(&path, "{not json").expect("write corrupt file");
        let store = FileSessionStore::new(&path);

        assert!(matches!(store.load(), Err(SessionFileError::Parse { .. })));
        assert!(store.current_user().is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn clear_sign_out_and_reload_end_signed_out(temp_dir: TempDir) {
        let path = temp_dir.path().join("session.json");
        let store = FileSessionStore::new(&path);
        store.save(&user()).expect("save");

        store.clear();
        assert!(store.current_user().is_none(), "cleared cache hides user");
        assert!(path.exists(), "clearing local state keeps the file");

        store.sign_out().await.expect("sign out");
        assert!(!path.exists());

        store.reload();
        assert!(store.current_user().is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn signing_out_twice_is_not_an_error(temp_dir: TempDir) {
        let store = FileSessionStore::new(temp_dir.path().join("session.json"));
        store.sign_out().await.expect("first sign out");
        store.sign_out().await.expect("second sign out");
    }

    #[rstest]
    fn reload_picks_up_external_changes(temp_dir: TempDir) {
        let path = temp_dir.path().join("session.json");
        let store = FileSessionStore::new(&path);
        assert!(store.current_user().is_none());

        FileSessionStore::new(&path).save(&user()).expect("save elsewhere");
        assert!(store.current_user().is_none(), "cache is sticky until reload");

        store.reload();
        assert_eq!(store.current_user(), Some(user()));
    }
}
