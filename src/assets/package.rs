//! Ассеты внутри zip-пакета приложения

use super::{is_safe_asset_path, AssetStore};
use crate::error::{InstallError, IoContext, Result};
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::{Path, PathBuf};
use zip::result::ZipError;
use zip::ZipArchive;

/// Префикс ассетов внутри пакета
pub const DEFAULT_ASSET_PREFIX: &str = "assets/";

/// Предел предварительного выделения буфера под ассет (16 МБ)
const MAX_SIZE_HINT: u64 = 16 * 1024 * 1024;

/// Пакет приложения в формате zip, ассеты лежат под префиксом
#[derive(Clone, Debug)]
pub struct PackageAssetStore {
    package: PathBuf,
    prefix: String,
}

impl PackageAssetStore {
    /// Открыть пакет с префиксом по умолчанию (`assets/`)
    pub fn open(package: impl Into<PathBuf>) -> Result<Self> {
        Self::with_prefix(package, DEFAULT_ASSET_PREFIX)
    }

    /// Открыть пакет с произвольным префиксом (пустой - корень архива)
    pub fn with_prefix(package: impl Into<PathBuf>, prefix: &str) -> Result<Self> {
        let store = Self {
            package: package.into(),
            prefix: normalize_prefix(prefix),
        };
        // Проверяем что это читаемый zip
        store.archive()?;
        Ok(store)
    }

    pub fn package(&self) -> &Path {
        &self.package
    }

    fn archive(&self) -> Result<ZipArchive<BufReader<File>>> {
        let file = File::open(&self.package).at(&self.package)?;
        ZipArchive::new(BufReader::new(file)).map_err(|source| InstallError::Archive {
            asset: self.package.display().to_string(),
            source,
        })
    }

    fn entry_name(&self, path: &str) -> String {
        format!("{}{}", self.prefix, path)
    }
}

impl AssetStore for PackageAssetStore {
    fn open(&self, path: &str) -> Result<Box<dyn Read + '_>> {
        if !is_safe_asset_path(path) {
            return Err(InstallError::AssetNotFound(path.to_string()));
        }

        let mut archive = self.archive()?;
        let mut entry = match archive.by_name(&self.entry_name(path)) {
            Ok(entry) if entry.is_file() => entry,
            Ok(_) | Err(ZipError::FileNotFound) => {
                return Err(InstallError::AssetNotFound(path.to_string()))
            }
            Err(source) => {
                return Err(InstallError::Archive {
                    asset: path.to_string(),
                    source,
                })
            }
        };

        // Запись заимствует архив, поэтому ассет читается целиком.
        // Размер из заголовка - только подсказка, ограничиваем её
        let mut data = Vec::with_capacity(entry.size().min(MAX_SIZE_HINT) as usize);
        entry.read_to_end(&mut data).at(&self.package)?;

        Ok(Box::new(Cursor::new(data)))
    }

    fn exists(&self, path: &str) -> bool {
        if !is_safe_asset_path(path) {
            return false;
        }
        let name = self.entry_name(path);
        self.archive()
            .map(|archive| archive.file_names().any(|n| n == name))
            .unwrap_or(false)
    }
}

fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{}/", trimmed)
    }
}
