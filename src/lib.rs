//! Tor Installer - установка ресурсов Tor из пакета приложения
//!
//! Общая библиотека для приложения и CLI.
//!
//! # Модули
//! - `installer` - установка torrc, GeoIP и бинарника в папку установки
//! - `assets` - хранилища ассетов (папка, zip-пакет, память)
//! - `extract` - копирование потока, снятие zip-обёртки, права
//! - `constants` - имена ассетов и файлов, настройки из JSON
//! - `error` - ошибки установки
//! - `logging` - подписчик `tracing` для бинарника
//! - `utils` - вспомогательные функции

pub mod assets;
pub mod constants;
pub mod error;
pub mod extract;
pub mod installer;
pub mod logging;
pub mod utils;

pub use assets::AssetStore;
pub use constants::TorConstants;
pub use error::{InstallError, Result};
pub use installer::{update_config_override, InstallOptions, InstalledResources, TorInstaller};
