//! Хранилища ассетов - источники ресурсов, упакованных в приложение
//!
//! Поддерживаемые источники:
//! - папка на диске (распакованный пакет)
//! - zip-пакет приложения (APK и подобные), ассеты под префиксом `assets/`
//! - память (встроенные ресурсы)

mod dir;
mod memory;
mod package;

pub use dir::DirAssetStore;
pub use memory::MemoryAssetStore;
pub use package::{PackageAssetStore, DEFAULT_ASSET_PREFIX};

use crate::error::Result;
use std::io::Read;
use std::path::Path;

/// Хранилище ассетов только для чтения, ключ - строковый путь
pub trait AssetStore {
    /// Открыть поток чтения ассета.
    /// Отсутствующий ассет - `InstallError::AssetNotFound`.
    fn open(&self, path: &str) -> Result<Box<dyn Read + '_>>;

    /// Есть ли ассет в хранилище
    fn exists(&self, path: &str) -> bool {
        self.open(path).is_ok()
    }
}

impl<S: AssetStore + ?Sized> AssetStore for &S {
    fn open(&self, path: &str) -> Result<Box<dyn Read + '_>> {
        (**self).open(path)
    }

    fn exists(&self, path: &str) -> bool {
        (**self).exists(path)
    }
}

impl<S: AssetStore + ?Sized> AssetStore for Box<S> {
    fn open(&self, path: &str) -> Result<Box<dyn Read + '_>> {
        (**self).open(path)
    }

    fn exists(&self, path: &str) -> bool {
        (**self).exists(path)
    }
}

/// Выбрать хранилище по пути: папка или zip-пакет
pub fn open_store(path: &Path) -> Result<Box<dyn AssetStore>> {
    if path.is_dir() {
        Ok(Box::new(DirAssetStore::new(path)))
    } else {
        Ok(Box::new(PackageAssetStore::open(path)?))
    }
}

/// Путь ассета не должен выходить за пределы хранилища
pub(crate) fn is_safe_asset_path(path: &str) -> bool {
    use std::path::Component;

    !path.is_empty()
        && Path::new(path)
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
}
