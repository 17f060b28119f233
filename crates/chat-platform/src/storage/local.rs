//! `window.localStorage` backend.
//! Persistent across page reloads, scoped to the browser profile and origin.
//!
//! Every call can throw (private browsing, disabled storage, quota), so each
//! one is mapped to `ChatError::Storage` rather than assumed to succeed.

use async_trait::async_trait;
use wasm_bindgen::JsValue;
use web_sys::Storage;

use chat_core::ports::StoragePort;
use chat_types::{ChatError, Result};

pub struct LocalStorage {
    storage: Storage,
}

impl LocalStorage {
    pub fn open() -> Result<Self> {
        let window = web_sys::window()
            .ok_or_else(|| ChatError::Storage("No window object".to_string()))?;

        let storage = window
            .local_storage()
            .map_err(js_err)?
            .ok_or_else(|| ChatError::Storage("localStorage not available".to_string()))?;

        Ok(Self { storage })
    }
}

#[async_trait(?Send)]
impl StoragePort for LocalStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.storage.get_item(key).map_err(js_err)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.storage.set_item(key, value).map_err(js_err)
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.storage.remove_item(key).map_err(js_err)
    }

    fn backend_name(&self) -> &str {
        "localstorage"
    }
}

fn js_err(e: JsValue) -> ChatError {
    ChatError::Storage(format!("{:?}", e))
}
