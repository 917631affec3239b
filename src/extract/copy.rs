//! Копирование потока в файл: фиксированный буфер, атомарная запись, права

use crate::error::{InstallError, IoContext, Result};
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// Права исполняемого файла: чтение, запись и исполнение только владельцем
#[cfg(unix)]
pub const EXECUTABLE_MODE: u32 = 0o700;

/// Копирование через промежуточный буфер фиксированного размера
pub fn buffered_copy<R: Read + ?Sized, W: Write + ?Sized>(
    reader: &mut R,
    writer: &mut W,
    buffer_size: usize,
) -> io::Result<u64> {
    let mut buffer = vec![0u8; buffer_size.max(1)];
    let mut total = 0u64;

    loop {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        writer.write_all(&buffer[..bytes_read])?;
        total += bytes_read as u64;
    }

    Ok(total)
}

/// Файл, который появляется под своим именем только целиком.
///
/// Данные пишутся во временный `.<имя>.part` рядом с целевым файлом,
/// `commit` переименовывает его на место. Без `commit` временный файл
/// удаляется при drop.
pub struct AtomicFile {
    dest: PathBuf,
    part: PathBuf,
    writer: Option<BufWriter<File>>,
    committed: bool,
}

impl AtomicFile {
    pub fn create(dest: &Path) -> Result<Self> {
        let part = part_path(dest);
        let file = File::create(&part).at(&part)?;

        Ok(Self {
            dest: dest.to_path_buf(),
            part,
            writer: Some(BufWriter::new(file)),
            committed: false,
        })
    }

    pub fn writer(&mut self) -> &mut BufWriter<File> {
        // writer забирается только в commit, который поглощает self
        self.writer.as_mut().expect("writer taken before commit")
    }

    /// Дописать, выставить права и переименовать на место
    pub fn commit(mut self, executable: bool) -> Result<PathBuf> {
        if let Some(writer) = self.writer.take() {
            let file = writer
                .into_inner()
                .map_err(|e| InstallError::io(&self.part, e.into_error()))?;
            file.sync_all().at(&self.part)?;
        }

        if executable {
            make_executable(&self.part)?;
        }

        fs::rename(&self.part, &self.dest).at(&self.dest)?;
        self.committed = true;

        Ok(self.dest.clone())
    }
}

impl Drop for AtomicFile {
    fn drop(&mut self) {
        if !self.committed {
            self.writer.take();
            let _ = fs::remove_file(&self.part);
        }
    }
}

fn part_path(dest: &Path) -> PathBuf {
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "asset".to_string());
    dest.with_file_name(format!(".{}.part", name))
}

/// Сделать файл исполняемым только для владельца
#[cfg(unix)]
pub fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(EXECUTABLE_MODE)).at(path)
}

/// Вне Unix прав на исполнение нет, снимаем только read-only
#[cfg(not(unix))]
pub fn make_executable(path: &Path) -> Result<()> {
    let mut perms = fs::metadata(path).at(path)?.permissions();
    perms.set_readonly(false);
    fs::set_permissions(path, perms).at(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    /// Читатель, отдающий данные мелкими порциями
    struct Trickle<'a>(&'a [u8]);

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.0.len().min(buf.len()).min(3);
            buf[..n].copy_from_slice(&self.0[..n]);
            self.0 = &self.0[n..];
            Ok(n)
        }
    }

    #[test]
    fn test_buffered_copy_small_buffer() {
        let data: Vec<u8> = (0..=255u8).cycle().take(5000).collect();
        let mut out = Vec::new();

        let copied = buffered_copy(&mut Cursor::new(&data), &mut out, 7).unwrap();
        assert_eq!(copied, 5000);
        assert_eq!(out, data);
    }

    #[test]
    fn test_buffered_copy_short_reads() {
        let data = b"GeoIPv6 data, short reads".to_vec();
        let mut out = Vec::new();

        let copied = buffered_copy(&mut Trickle(&data), &mut out, 1024).unwrap();
        assert_eq!(copied as usize, data.len());
        assert_eq!(out, data);
    }

    #[test]
    fn test_buffered_copy_empty() {
        let mut out = Vec::new();
        assert_eq!(buffered_copy(&mut io::empty(), &mut out, 1024).unwrap(), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_atomic_file_commit() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("torrc");

        let mut file = AtomicFile::create(&dest).unwrap();
        let part = file.part.clone();
        file.writer().write_all(b"ControlPort auto\n").unwrap();

        assert!(part.exists());
        assert!(!dest.exists());

        file.commit(false).unwrap();
        assert!(!part.exists());
        assert_eq!(fs::read(&dest).unwrap(), b"ControlPort auto\n");
    }

    #[test]
    fn test_atomic_file_drop_removes_part() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("geoip");

        let part = {
            let mut file = AtomicFile::create(&dest).unwrap();
            file.writer().write_all(b"partial").unwrap();
            file.part.clone()
        };

        assert!(!part.exists());
        assert!(!dest.exists());
    }

    #[test]
    fn test_part_path_is_hidden_sibling() {
        let part = part_path(Path::new("/data/tor/geoip6"));
        assert_eq!(part, PathBuf::from("/data/tor/.geoip6.part"));
    }

    #[cfg(unix)]
    #[test]
    fn test_make_executable_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("libtor");
        fs::write(&path, b"\x7fELF").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o666)).unwrap();

        make_executable(&path).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode & 0o500, 0o500);
        assert_eq!(mode & 0o002, 0);
        assert_eq!(mode & 0o077, 0);
    }
}
