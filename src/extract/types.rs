//! Типы для модуля извлечения

use std::path::PathBuf;

/// Результат извлечения одного ассета
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CopyResult {
    /// Итоговый путь файла
    pub path: PathBuf,
    /// Записано байт (после распаковки)
    pub size: u64,
    /// Выставлены ли права на исполнение
    pub executable: bool,
}

/// Как извлекать ассет
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CopyOptions {
    /// Ассет обёрнут в zip - копировать содержимое первой записи
    pub unzip: bool,
    /// Сделать файл исполняемым (только для владельца)
    pub executable: bool,
}

impl CopyOptions {
    pub fn plain() -> Self {
        Self::default()
    }

    pub fn zipped() -> Self {
        Self {
            unzip: true,
            ..Self::default()
        }
    }

    pub fn executable(mut self) -> Self {
        self.executable = true;
        self
    }
}
