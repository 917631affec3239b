//! Модуль извлечения ассетов
//!
//! - `copy` - копирование с фиксированным буфером, атомарная запись, права
//! - `unzip` - снятие zip-обёртки (первая запись архива)

mod copy;
mod types;
mod unzip;

pub use copy::{buffered_copy, make_executable, AtomicFile};
#[cfg(unix)]
pub use copy::EXECUTABLE_MODE;
pub use types::{CopyOptions, CopyResult};
pub use unzip::copy_first_entry;

use crate::error::{InstallError, Result};
use std::io::Read;
use std::path::Path;

/// Извлечь поток ассета в файл `dest`.
///
/// Файл появляется под своим именем только после полной записи; при
/// ошибке временный файл удаляется, а существующий `dest` не трогается.
pub fn extract_stream<R: Read>(
    source: &mut R,
    dest: &Path,
    options: CopyOptions,
    buffer_size: usize,
    asset: &str,
) -> Result<CopyResult> {
    let mut file = AtomicFile::create(dest)?;

    let size = if options.unzip {
        copy_first_entry(source, file.writer(), buffer_size, asset)?
    } else {
        buffered_copy(source, file.writer(), buffer_size)
            .map_err(|e| InstallError::io(dest, e))?
    };

    let path = file.commit(options.executable)?;

    Ok(CopyResult {
        path,
        size,
        executable: options.executable,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::{self, Cursor};
    use tempfile::TempDir;

    /// Поток, ломающийся после части данных
    struct Failing {
        sent: bool,
    }

    impl Read for Failing {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.sent {
                return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "asset truncated"));
            }
            self.sent = true;
            buf[..4].copy_from_slice(b"half");
            Ok(4)
        }
    }

    #[test]
    fn test_extract_plain() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("torrc");

        let result = extract_stream(
            &mut Cursor::new(b"SocksPort 9050\n".to_vec()),
            &dest,
            CopyOptions::plain(),
            1024,
            "tor-config/torrc",
        )
        .unwrap();

        assert_eq!(result.path, dest);
        assert_eq!(result.size, 15);
        assert!(!result.executable);
        assert_eq!(fs::read(&dest).unwrap(), b"SocksPort 9050\n");
    }

    #[test]
    fn test_failed_copy_leaves_nothing() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("geoip");

        let mut source = Failing { sent: false };
        let err = extract_stream(&mut source, &dest, CopyOptions::plain(), 1024, "geoip")
            .unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
        assert!(!dest.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_failed_copy_keeps_previous_file() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("geoip");
        fs::write(&dest, b"old complete geoip").unwrap();

        let mut source = Failing { sent: false };
        assert!(extract_stream(&mut source, &dest, CopyOptions::plain(), 1024, "geoip").is_err());
        assert_eq!(fs::read(&dest).unwrap(), b"old complete geoip");
    }

    #[test]
    fn test_missing_directory() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("absent").join("torrc");

        let err = extract_stream(&mut io::empty(), &dest, CopyOptions::plain(), 1024, "torrc")
            .unwrap_err();
        assert!(matches!(err, InstallError::Io { .. }));
    }
}
