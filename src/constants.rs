//! Константы установки: имена ассетов и файлов в папке установки
//!
//! Значения по умолчанию совпадают с раскладкой ассетов в пакете
//! приложения; любое поле можно переопределить JSON-файлом.

use crate::error::{InstallError, IoContext, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Размер буфера копирования по умолчанию
pub const DEFAULT_BUFFER_SIZE: usize = 1024;

/// Имя папки установки внутри каталога данных приложения
pub const DEFAULT_INSTALL_DIR: &str = "tor";

/// Именованные константы установщика
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TorConstants {
    /// Ключ бинарника Tor в папке установки
    pub binary_key: String,
    pub torrc_key: String,
    pub geoip_key: String,
    pub geoip6_key: String,
    /// Пользовательский файл переопределения torrc
    pub torrc_custom_key: String,
    /// Путь torrc в хранилище ассетов
    pub torrc_asset: String,
    pub geoip_asset: String,
    pub geoip6_asset: String,
    /// Размер промежуточного буфера при копировании (байт)
    pub file_write_buffer_size: usize,
}

impl Default for TorConstants {
    fn default() -> Self {
        Self {
            binary_key: "libtor".to_string(),
            torrc_key: "torrc".to_string(),
            geoip_key: "geoip".to_string(),
            geoip6_key: "geoip6".to_string(),
            torrc_custom_key: "torrc.custom".to_string(),
            torrc_asset: "tor-config/torrc".to_string(),
            geoip_asset: "tor-config/geoip".to_string(),
            geoip6_asset: "tor-config/geoip6".to_string(),
            file_write_buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl TorConstants {
    /// Загрузить константы из JSON (отсутствующие поля берутся по умолчанию)
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).at(path)?;
        let mut constants: Self = serde_json::from_str(&contents).map_err(|source| {
            InstallError::Config {
                path: path.to_path_buf(),
                source,
            }
        })?;

        // Нулевой буфер зациклил бы копирование
        if constants.file_write_buffer_size == 0 {
            constants.file_write_buffer_size = DEFAULT_BUFFER_SIZE;
        }

        Ok(constants)
    }

    /// Сохранить константы в JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).at(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| InstallError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).at(path)
    }
}

/// Папка установки по умолчанию
pub fn default_install_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tor_installer")
        .join(DEFAULT_INSTALL_DIR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let c = TorConstants::default();
        assert_eq!(c.binary_key, "libtor");
        assert_eq!(c.torrc_asset, "tor-config/torrc");
        assert_eq!(c.geoip6_asset, "tor-config/geoip6");
        assert_eq!(c.torrc_custom_key, "torrc.custom");
        assert_eq!(c.file_write_buffer_size, 1024);
    }

    #[test]
    fn test_load_partial_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("constants.json");
        let json = r#"{ "torrc_key": "torrc.default", "file_write_buffer_size": 0 }"#;
        fs::write(&path, json).unwrap();

        let c = TorConstants::load(&path).unwrap();
        assert_eq!(c.torrc_key, "torrc.default");
        assert_eq!(c.geoip_key, "geoip");
        assert_eq!(c.file_write_buffer_size, DEFAULT_BUFFER_SIZE);
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let err = TorConstants::load(&path).unwrap_err();
        assert!(matches!(err, InstallError::Config { .. }));
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("constants.json");

        let mut c = TorConstants::default();
        c.geoip_asset = "geo/geoip.zip".to_string();
        c.save(&path).unwrap();

        assert_eq!(TorConstants::load(&path).unwrap(), c);
    }

    #[test]
    fn test_default_install_dir() {
        let dir = default_install_dir();
        assert!(dir.ends_with("tor_installer/tor"));
    }
}
