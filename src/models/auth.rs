use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token is empty")]
    EmptyToken,
    #[error("not logged in, run `login --token <TOKEN>` first")]
    NotLoggedIn,
    #[error("token store {path}: {source}")]
    Store {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Bearer credentials for the clinic API.
///
/// Issued at login and dropped at logout. Callers pass it to the API client
/// explicitly; nothing reads it from global state.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthSession {
    token: String,
}

impl AuthSession {
    pub fn issue(token: &str) -> Result<Self, AuthError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::EmptyToken);
        }
        Ok(Self {
            token: token.to_string(),
        })
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession").field("token", &"<redacted>").finish()
    }
}

/// File-backed persistence for the token between CLI invocations.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self, session: &AuthSession) -> Result<(), AuthError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| self.store_error(source))?;
            }
        }
        fs::write(&self.path, session.token()).map_err(|source| self.store_error(source))?;
        info!(path = %self.path.display(), "stored auth token");
        Ok(())
    }

    /// Returns `None` when nobody is logged in.
    pub fn load(&self) -> Result<Option<AuthSession>, AuthError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => match AuthSession::issue(&content) {
                Ok(session) => Ok(Some(session)),
                Err(AuthError::EmptyToken) => Ok(None),
                Err(other) => Err(other),
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(self.store_error(source)),
        }
    }

    pub fn clear(&self) -> Result<(), AuthError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), "cleared auth token");
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("no stored token to clear");
                Ok(())
            }
            Err(source) => Err(self.store_error(source)),
        }
    }

    fn store_error(&self, source: io::Error) -> AuthError {
        AuthError::Store {
            path: self.path.clone(),
            source,
        }
    }
}
