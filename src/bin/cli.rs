//! Tor Installer CLI - установка ресурсов Tor из консоли

use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tor_installer::assets::open_store;
use tor_installer::constants::{default_install_dir, TorConstants};
use tor_installer::error::{IoContext as _, Result};
use tor_installer::installer::{
    update_config_override, InstallOptions, InstalledResources, TorInstaller,
};
use tor_installer::logging;
use tor_installer::utils::{format_size, list_files_recursive};

#[derive(Parser)]
#[command(name = "tor_installer")]
#[command(author = "toolza")]
#[command(version = "1.0")]
#[command(about = "Установка ресурсов Tor (torrc, GeoIP) из пакета приложения", long_about = None)]
struct Cli {
    /// Папка установки (по умолчанию - в каталоге данных пользователя)
    #[arg(short, long, global = true)]
    dir: Option<PathBuf>,

    /// JSON-файл с константами (имена ассетов и файлов)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Подробный лог
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Извлечь torrc и базы GeoIP
    Install {
        /// Папка ассетов или zip-пакет приложения (APK)
        #[arg(short, long)]
        assets: PathBuf,

        /// Не перезаписывать уже установленные файлы
        #[arg(long)]
        keep_existing: bool,
    },

    /// Извлечь произвольный ассет
    Copy {
        /// Папка ассетов или zip-пакет приложения (APK)
        #[arg(short, long)]
        assets: PathBuf,

        /// Путь ассета в хранилище
        asset: String,

        /// Имя файла в папке установки
        key: String,

        /// Ассет обёрнут в zip
        #[arg(long)]
        unzip: bool,

        /// Сделать файл исполняемым
        #[arg(long)]
        exec: bool,
    },

    /// Установить бинарник Tor (исполняемый)
    Binary {
        /// Папка ассетов или zip-пакет приложения (APK)
        #[arg(short, long)]
        assets: PathBuf,

        /// Путь бинарника в хранилище
        asset: String,

        /// Бинарник обёрнут в zip
        #[arg(long)]
        unzip: bool,
    },

    /// Перезаписать файл переопределения torrc
    Override {
        /// Файл переопределения (по умолчанию torrc.custom в папке установки)
        file: Option<PathBuf>,

        /// Новое содержимое
        #[arg(long, conflicts_with = "from", required_unless_present = "from")]
        text: Option<String>,

        /// Взять содержимое из файла
        #[arg(long)]
        from: Option<PathBuf>,
    },

    /// Показать установленные файлы
    List,

    /// Записать текущие константы в JSON (заготовка для --config)
    InitConfig {
        /// Куда сохранить
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ Ошибка: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let constants = match &cli.config {
        Some(path) => TorConstants::load(path)?,
        None => TorConstants::default(),
    };
    let install_dir = cli.dir.unwrap_or_else(default_install_dir);

    match cli.command {
        Commands::Install { assets, keep_existing } => {
            install(&assets, install_dir, constants, keep_existing)
        }
        Commands::Copy { assets, asset, key, unzip, exec } => {
            let installer = TorInstaller::new(open_store(&assets)?, install_dir, constants);
            installer.ensure_install_dir()?;
            let result = installer.copy_asset(&asset, &key, unzip, exec)?;
            println!("✅ {} → {} ({})", asset, result.path.display(), format_size(result.size));
            Ok(())
        }
        Commands::Binary { assets, asset, unzip } => {
            let installer = TorInstaller::new(open_store(&assets)?, install_dir, constants);
            let result = installer.install_binary(&asset, unzip)?;
            println!(
                "🔧 Бинарник установлен: {} ({})",
                result.path.display(),
                format_size(result.size)
            );
            Ok(())
        }
        Commands::Override { file, text, from } => {
            let path = match file {
                Some(path) => path,
                None => {
                    fs::create_dir_all(&install_dir).at(&install_dir)?;
                    InstalledResources::new(&install_dir, &constants).torrc_custom
                }
            };
            let content = match (text, from) {
                (Some(text), _) => text,
                (None, Some(from)) => fs::read_to_string(&from).at(&from)?,
                (None, None) => String::new(),
            };
            update_config_override(&path, &content)?;
            println!("📝 Обновлён: {}", path.display());
            Ok(())
        }
        Commands::List => list(&install_dir),
        Commands::InitConfig { file } => {
            constants.save(&file)?;
            println!("📝 Настройки сохранены: {}", file.display());
            Ok(())
        }
    }
}

fn install(
    assets: &Path,
    install_dir: PathBuf,
    constants: TorConstants,
    keep_existing: bool,
) -> Result<()> {
    let store = open_store(assets)?;
    let mut installer = TorInstaller::new(store, install_dir, constants)
        .with_options(InstallOptions { overwrite: !keep_existing });

    println!();
    println!("📦 Источник: {}", assets.display());
    println!("📂 Папка установки: {}", installer.install_dir().display());
    println!();

    let report = installer.install_resources()?;

    for copied in &report.copied {
        println!("✅ {} ({})", copied.path.display(), format_size(copied.size));
    }
    for skipped in &report.skipped {
        println!("⏭️ Пропущен (уже установлен): {}", skipped.display());
    }

    println!();
    println!("🎉 Готово: {} файл(ов), {}", report.copied.len(), format_size(report.total_size()));
    Ok(())
}

fn list(install_dir: &Path) -> Result<()> {
    let files = list_files_recursive(install_dir).at(install_dir)?;

    println!("📂 {}", install_dir.display());
    if files.is_empty() {
        println!("   (пусто)");
    }
    for file in files {
        println!("   {} ({})", file.relative_path, format_size(file.size));
    }
    Ok(())
}
