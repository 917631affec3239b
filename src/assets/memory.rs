//! Ассеты в памяти

use super::AssetStore;
use crate::error::{InstallError, Result};
use std::collections::HashMap;
use std::io::Read;

/// Хранилище ассетов в памяти (встроенные ресурсы, тесты)
#[derive(Clone, Debug, Default)]
pub struct MemoryAssetStore {
    assets: HashMap<String, Vec<u8>>,
}

impl MemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Добавить или заменить ассет
    pub fn insert(&mut self, path: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.assets.insert(path.into(), data.into());
    }

    pub fn with(mut self, path: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        self.insert(path, data);
        self
    }

}

impl AssetStore for MemoryAssetStore {
    fn open(&self, path: &str) -> Result<Box<dyn Read + '_>> {
        self.assets
            .get(path)
            .map(|data| Box::new(data.as_slice()) as Box<dyn Read + '_>)
            .ok_or_else(|| InstallError::AssetNotFound(path.to_string()))
    }

    fn exists(&self, path: &str) -> bool {
        self.assets.contains_key(path)
    }
}
