//! Ассеты из папки на диске

use super::{is_safe_asset_path, AssetStore};
use crate::error::{InstallError, Result};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

/// Ассеты - обычные файлы внутри корневой папки
#[derive(Clone, Debug)]
pub struct DirAssetStore {
    root: PathBuf,
}

impl DirAssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> Option<PathBuf> {
        is_safe_asset_path(path).then(|| self.root.join(path))
    }
}

impl AssetStore for DirAssetStore {
    fn open(&self, path: &str) -> Result<Box<dyn Read + '_>> {
        let full = self
            .resolve(path)
            .ok_or_else(|| InstallError::AssetNotFound(path.to_string()))?;

        match File::open(&full) {
            Ok(file) if full.is_file() => Ok(Box::new(BufReader::new(file))),
            Ok(_) => Err(InstallError::AssetNotFound(path.to_string())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(InstallError::AssetNotFound(path.to_string()))
            }
            Err(e) => Err(InstallError::io(full, e)),
        }
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_some_and(|p| p.is_file())
    }
}
