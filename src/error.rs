//! Ошибки установки ресурсов

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Ошибка установки. Все варианты - ошибки ввода-вывода разной природы,
/// восстановление остаётся за вызывающим кодом.
#[derive(Debug, Error)]
pub enum InstallError {
    /// Ошибка файловой системы
    #[error("ошибка ввода-вывода ({}): {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Ассет отсутствует в хранилище
    #[error("ассет не найден: {0}")]
    AssetNotFound(String),

    /// Повреждённая zip-обёртка ассета
    #[error("не удалось прочитать zip-ассет {asset}: {source}")]
    Archive {
        asset: String,
        #[source]
        source: zip::result::ZipError,
    },

    /// В zip-обёртке нет ни одной записи
    #[error("zip-ассет {0} не содержит файлов")]
    EmptyArchive(String),

    /// Некорректный файл констант
    #[error("некорректный файл настроек {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, InstallError>;

impl InstallError {
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Соответствующий `io::ErrorKind`
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            Self::Io { source, .. } => source.kind(),
            Self::AssetNotFound(_) => io::ErrorKind::NotFound,
            Self::Archive { .. } | Self::EmptyArchive(_) | Self::Config { .. } => {
                io::ErrorKind::InvalidData
            }
        }
    }
}

impl From<InstallError> for io::Error {
    fn from(err: InstallError) -> Self {
        match err {
            InstallError::Io { source, .. } => source,
            other => io::Error::new(other.kind(), other.to_string()),
        }
    }
}

/// Приклеить путь к `io::Error`
pub trait IoContext<T> {
    fn at(self, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> IoContext<T> for io::Result<T> {
    fn at(self, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|e| InstallError::io(path, e))
    }
}
