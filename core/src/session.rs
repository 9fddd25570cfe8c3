//! Session lifecycle: keeping the client's bearer token and durable storage in step.
//!
//! # Design
//! The client caches the token in memory and never touches storage on its
//! own. `Session` is the one place that writes both: at startup (`restore`),
//! after a successful login or sign-up (`begin`), and at logout (`end`).

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::client::ApiClient;
use crate::error::ApiError;

/// Storage key of the persisted bearer token.
pub const TOKEN_KEY: &str = "token";

/// Durable key/value storage for credentials.
pub trait TokenStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, ApiError>;
    fn set(&self, key: &str, value: &str) -> Result<(), ApiError>;
    fn delete(&self, key: &str) -> Result<(), ApiError>;
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: &str) -> Result<Option<String>, ApiError> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ApiError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), ApiError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.remove(key);
        Ok(())
    }
}

/// One file per key inside `dir`.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    dir: PathBuf,
}

impl FileTokenStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, key: &str) -> Result<Option<String>, ApiError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(ApiError::Storage(err)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ApiError> {
        std::fs::create_dir_all(&self.dir).map_err(ApiError::Storage)?;
        std::fs::write(self.path_for(key), value).map_err(ApiError::Storage)
    }

    fn delete(&self, key: &str) -> Result<(), ApiError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(ApiError::Storage(err)),
        }
    }
}

/// A client handle paired with the store its token is persisted in.
#[derive(Debug)]
pub struct Session<S> {
    api: ApiClient,
    store: S,
}

impl<S: TokenStore> Session<S> {
    pub fn new(api: ApiClient, store: S) -> Self {
        Self { api, store }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Load a persisted token into the client. Returns whether one was found.
    pub fn restore(&self) -> Result<bool, ApiError> {
        match self.store.get(TOKEN_KEY)? {
            Some(token) if !token.is_empty() => {
                self.api.set_authorization(token);
                tracing::debug!("restored persisted session");
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Adopt a freshly issued token: storage first, then the client. A
    /// storage failure leaves the client token as it was.
    pub fn begin(&self, token: &str) -> Result<(), ApiError> {
        self.store.set(TOKEN_KEY, token)?;
        self.api.set_authorization(token);
        Ok(())
    }

    /// Drop the token from storage and from the client. The client is
    /// cleared even when storage fails.
    pub fn end(&self) -> Result<(), ApiError> {
        let removed = self.store.delete(TOKEN_KEY);
        self.api.clear_authorization();
        tracing::debug!("session ended");
        removed
    }
}
