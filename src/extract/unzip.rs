//! Снятие zip-обёртки с ассета

use super::copy::buffered_copy;
use crate::error::{InstallError, Result};
use std::io::{Cursor, Read, Write};
use std::path::Path;
use zip::ZipArchive;

/// Скопировать распакованное содержимое первого файла zip-ассета.
///
/// Ассет читается в память целиком и открывается через центральный
/// каталог, поэтому записи с дескриптором данных (бит 3 флагов) тоже
/// читаются. Записи-папки пропускаются, файлы после первого игнорируются.
pub fn copy_first_entry<R: Read, W: Write + ?Sized>(
    reader: &mut R,
    writer: &mut W,
    buffer_size: usize,
    asset: &str,
) -> Result<u64> {
    let mut data = Vec::new();
    reader
        .read_to_end(&mut data)
        .map_err(|e| InstallError::io(Path::new(asset), e))?;

    let archive_error = |source| InstallError::Archive {
        asset: asset.to_string(),
        source,
    };
    let mut archive = ZipArchive::new(Cursor::new(data)).map_err(archive_error)?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(archive_error)?;
        if entry.is_dir() {
            continue;
        }
        return buffered_copy(&mut entry, writer, buffer_size)
            .map_err(|e| InstallError::io(Path::new(asset), e));
    }

    Err(InstallError::EmptyArchive(asset.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use zip::write::SimpleFileOptions;
    use zip::CompressionMethod;

    fn zip_bytes(entries: &[(&str, &[u8])], dirs: &[&str]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        for dir in dirs {
            writer.add_directory(*dir, options).unwrap();
        }
        for (name, data) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_copies_first_entry_only() {
        let archive = zip_bytes(&[("geoip", b"first payload"), ("extra", b"ignored")], &[]);
        let mut out = Vec::new();

        let size =
            copy_first_entry(&mut Cursor::new(archive), &mut out, 16, "geoip.zip").unwrap();
        assert_eq!(out, b"first payload");
        assert_eq!(size, 13);
    }

    #[test]
    fn test_skips_leading_directory() {
        let archive = zip_bytes(&[("tor/geoip6", b"v6 ranges")], &["tor/"]);
        let mut out = Vec::new();

        copy_first_entry(&mut Cursor::new(archive), &mut out, 1024, "geoip6.zip").unwrap();
        assert_eq!(out, b"v6 ranges");
    }

    #[test]
    fn test_empty_archive() {
        let archive = zip_bytes(&[], &[]);
        let mut out = Vec::new();

        let err =
            copy_first_entry(&mut Cursor::new(archive), &mut out, 1024, "empty.zip").unwrap_err();
        assert!(matches!(err, InstallError::EmptyArchive(_)));
        assert!(out.is_empty());
    }

    #[test]
    fn test_only_directories() {
        let archive = zip_bytes(&[], &["tor/", "tor/config/"]);
        let mut out = Vec::new();

        let err =
            copy_first_entry(&mut Cursor::new(archive), &mut out, 1024, "dirs.zip").unwrap_err();
        assert!(matches!(err, InstallError::EmptyArchive(ref a) if a == "dirs.zip"));
    }

    #[test]
    fn test_not_a_zip() {
        let mut out = Vec::new();
        let mut source = Cursor::new(b"plain torrc text".to_vec());

        let err = copy_first_entry(&mut source, &mut out, 1024, "torrc").unwrap_err();
        assert!(matches!(err, InstallError::Archive { .. }));
    }
}
