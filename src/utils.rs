//! Вспомогательные утилиты

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Форматирование размера файла в человекочитаемый вид
pub fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} ГБ", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} МБ", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} КБ", size as f64 / KB as f64)
    } else {
        format!("{} Б", size)
    }
}

/// Файл в папке установки
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListedFile {
    /// Путь относительно корня обхода, через `/`
    pub relative_path: String,
    pub path: PathBuf,
    pub size: u64,
}

/// Рекурсивно собрать все файлы папки (сортировка по относительному пути)
pub fn list_files_recursive(root: &Path) -> io::Result<Vec<ListedFile>> {
    let mut files = Vec::new();
    collect_files_recursive(root, "", &mut files)?;
    files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    Ok(files)
}

fn collect_files_recursive(
    current_path: &Path,
    relative_base: &str,
    files: &mut Vec<ListedFile>,
) -> io::Result<()> {
    for entry in fs::read_dir(current_path)? {
        let entry = entry?;
        let path = entry.path();
        let file_name = entry.file_name().to_string_lossy().to_string();

        let relative_path = if relative_base.is_empty() {
            file_name
        } else {
            format!("{}/{}", relative_base, file_name)
        };

        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            collect_files_recursive(&path, &relative_path, files)?;
        } else if file_type.is_file() {
            let size = entry.metadata()?.len();
            files.push(ListedFile {
                relative_path,
                path,
                size,
            });
        }
    }
    Ok(())
}
