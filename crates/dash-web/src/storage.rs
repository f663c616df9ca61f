//! `window.localStorage` store

use dash_grid::{Storage, StorageError};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::DomException;

/// Persistent store over the page's local storage
///
/// When local storage is unavailable (privacy mode, sandboxed frame) every
/// call fails with [`StorageError::Unavailable`] and the dashboard runs
/// from memory.
#[derive(Clone, Debug)]
pub struct LocalStorage {
    storage: Option<web_sys::Storage>,
}

impl LocalStorage {
    pub fn open() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        Self { storage }
    }

    pub fn is_available(&self) -> bool {
        self.storage.is_some()
    }

    fn storage(&self) -> Result<&web_sys::Storage, StorageError> {
        self.storage
            .as_ref()
            .ok_or_else(|| StorageError::Unavailable("localStorage is not accessible".into()))
    }
}

impl Storage for LocalStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage()?
            .get_item(key)
            .map_err(|e| StorageError::Read(describe(&e)))
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage()?.set_item(key, value).map_err(write_error)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.storage()?.remove_item(key).map_err(write_error)
    }
}

fn write_error(err: JsValue) -> StorageError {
    match err.dyn_ref::<DomException>() {
        Some(exception) if exception.name() == "QuotaExceededError" => {
            StorageError::QuotaExceeded(exception.message())
        }
        _ => StorageError::Write(describe(&err)),
    }
}

fn describe(err: &JsValue) -> String {
    match err.dyn_ref::<DomException>() {
        Some(exception) => format!("{}: {}", exception.name(), exception.message()),
        None => err.as_string().unwrap_or_else(|| format!("{err:?}")),
    }
}
