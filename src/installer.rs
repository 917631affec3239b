//! Установщик ресурсов Tor
//!
//! Извлекает torrc и базы GeoIP из хранилища ассетов в папку установки,
//! по запросу снимает zip-обёртку и выставляет права на исполнение.
//! Всё синхронно, без повторов: первая ошибка ввода-вывода возвращается
//! вызывающему, уже записанные файлы остаются на месте.

use crate::assets::{is_safe_asset_path, AssetStore};
use crate::constants::TorConstants;
use crate::error::{InstallError, IoContext, Result};
use crate::extract::{extract_stream, CopyOptions, CopyResult};
use crate::utils::{format_size, list_files_recursive, ListedFile};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Опции прохода установки
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InstallOptions {
    /// Перезаписывать уже существующие файлы
    pub overwrite: bool,
}

impl Default for InstallOptions {
    fn default() -> Self {
        Self { overwrite: true }
    }
}

/// Пути ресурсов в папке установки
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstalledResources {
    pub install_dir: PathBuf,
    /// Ключ бинарника; `install_resources` его не пишет
    pub tor_binary: PathBuf,
    pub torrc: PathBuf,
    pub geoip: PathBuf,
    pub geoip6: PathBuf,
    pub torrc_custom: PathBuf,
}

impl InstalledResources {
    pub fn new(install_dir: &Path, constants: &TorConstants) -> Self {
        Self {
            install_dir: install_dir.to_path_buf(),
            tor_binary: install_dir.join(&constants.binary_key),
            torrc: install_dir.join(&constants.torrc_key),
            geoip: install_dir.join(&constants.geoip_key),
            geoip6: install_dir.join(&constants.geoip6_key),
            torrc_custom: install_dir.join(&constants.torrc_custom_key),
        }
    }
}

/// Итог прохода `install_resources`
#[derive(Clone, Debug)]
pub struct InstallReport {
    pub resources: InstalledResources,
    /// Скопированные ассеты
    pub copied: Vec<CopyResult>,
    /// Пропущенные (уже существовали, `overwrite = false`)
    pub skipped: Vec<PathBuf>,
}

impl InstallReport {
    pub fn total_size(&self) -> u64 {
        self.copied.iter().map(|c| c.size).sum()
    }
}

/// Установщик ресурсов
pub struct TorInstaller<S> {
    store: S,
    install_dir: PathBuf,
    constants: TorConstants,
    options: InstallOptions,
    resources: InstalledResources,
}

impl<S: AssetStore> TorInstaller<S> {
    pub fn new(store: S, install_dir: impl Into<PathBuf>, constants: TorConstants) -> Self {
        let install_dir = install_dir.into();
        let resources = InstalledResources::new(&install_dir, &constants);

        Self {
            store,
            install_dir,
            constants,
            options: InstallOptions::default(),
            resources,
        }
    }

    pub fn with_options(mut self, options: InstallOptions) -> Self {
        self.options = options;
        self
    }

    pub fn install_dir(&self) -> &Path {
        &self.install_dir
    }

    pub fn resources(&self) -> &InstalledResources {
        &self.resources
    }

    /// Создать папку установки, если её нет
    pub fn ensure_install_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.install_dir).at(&self.install_dir)
    }

    /// Извлечь GeoIP (IPv4/IPv6) и шаблон torrc в папку установки
    pub fn install_resources(&mut self) -> Result<InstallReport> {
        self.ensure_install_dir()?;
        info!(dir = %self.install_dir.display(), "установка ресурсов Tor");

        let plan = [
            (self.constants.geoip_asset.clone(), self.constants.geoip_key.clone()),
            (self.constants.geoip6_asset.clone(), self.constants.geoip6_key.clone()),
            (self.constants.torrc_asset.clone(), self.constants.torrc_key.clone()),
        ];

        let mut copied = Vec::with_capacity(plan.len());
        let mut skipped = Vec::new();

        for (asset, key) in &plan {
            let dest = self.install_dir.join(key);
            if !self.options.overwrite && dest.is_file() {
                debug!(dest = %dest.display(), "файл уже установлен, пропуск");
                skipped.push(dest);
                continue;
            }

            let options = if is_zip_asset(asset) {
                CopyOptions::zipped()
            } else {
                CopyOptions::plain()
            };
            match self.copy_with(asset, key, options) {
                Ok(result) => copied.push(result),
                Err(e) => {
                    warn!(asset = %asset, error = %e, "не удалось извлечь ассет");
                    return Err(e);
                }
            }
        }

        self.resources = InstalledResources::new(&self.install_dir, &self.constants);
        self.log_installed();

        let report = InstallReport {
            resources: self.resources.clone(),
            copied,
            skipped,
        };
        info!(
            copied = report.copied.len(),
            skipped = report.skipped.len(),
            size = %format_size(report.total_size()),
            "ресурсы Tor установлены"
        );

        Ok(report)
    }

    /// Скопировать ассет `asset_path` в `install_dir/dest_key`
    pub fn copy_asset(
        &self,
        asset_path: &str,
        dest_key: &str,
        unzip: bool,
        make_executable: bool,
    ) -> Result<CopyResult> {
        self.copy_with(
            asset_path,
            dest_key,
            CopyOptions {
                unzip,
                executable: make_executable,
            },
        )
    }

    /// Установить бинарник Tor под ключом `binary_key` и сделать исполняемым
    pub fn install_binary(&self, asset_path: &str, unzip: bool) -> Result<CopyResult> {
        self.ensure_install_dir()?;
        let options = CopyOptions {
            unzip,
            ..CopyOptions::default()
        };
        self.copy_with(asset_path, &self.constants.binary_key, options.executable())
    }

    /// Перезаписать `torrc.custom` в папке установки
    pub fn update_config_override(&self, content: &str) -> Result<PathBuf> {
        self.ensure_install_dir()?;
        update_config_override(&self.resources.torrc_custom, content)?;
        Ok(self.resources.torrc_custom.clone())
    }

    /// Все файлы папки установки
    pub fn list_installed(&self) -> Result<Vec<ListedFile>> {
        list_files_recursive(&self.install_dir).at(&self.install_dir)
    }

    fn copy_with(
        &self,
        asset_path: &str,
        dest_key: &str,
        options: CopyOptions,
    ) -> Result<CopyResult> {
        if !is_safe_asset_path(dest_key) {
            return Err(InstallError::io(
                &self.install_dir,
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("недопустимое имя файла: {}", dest_key),
                ),
            ));
        }
        let dest = self.install_dir.join(dest_key);

        // Источник открывается до создания файла: нет ассета - нет файла
        let mut source = self.store.open(asset_path)?;
        let result = extract_stream(
            &mut source,
            &dest,
            options,
            self.constants.file_write_buffer_size,
            asset_path,
        )?;

        debug!(
            asset = asset_path,
            dest = %result.path.display(),
            size = result.size,
            unzip = options.unzip,
            executable = options.executable,
            "ассет извлечён"
        );

        Ok(result)
    }

    fn log_installed(&self) {
        match self.list_installed() {
            Ok(files) => {
                for file in files {
                    debug!(file = %file.relative_path, size = file.size, "в папке установки");
                }
            }
            Err(e) => warn!(error = %e, "не удалось прочитать папку установки"),
        }
    }
}

/// Полностью перезаписать файл переопределения конфигурации
pub fn update_config_override(path: &Path, content: &str) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => debug!(path = %path.display(), "старый файл переопределения удалён"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(InstallError::io(path, e)),
    }

    let mut file = File::create(path).at(path)?;
    file.write_all(content.as_bytes()).at(path)?;
    file.sync_all().at(path)?;

    info!(path = %path.display(), bytes = content.len(), "файл переопределения обновлён");
    Ok(())
}

fn is_zip_asset(asset: &str) -> bool {
    asset.to_lowercase().ends_with(".zip")
}
