//! Zip extraction into a fixed directory.

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::Path;

use tracing::trace;
use zip::ZipArchive;

use crate::error::{NormalizeError, Result};

/// Extract every entry of the archive at `archive` into `dest`.
///
/// `dest` is created first, so an archive without entries still yields an
/// (empty) directory. Returns the number of entries written.
pub fn extract_zip(archive: &Path, dest: &Path) -> Result<usize> {
    fs::create_dir_all(dest).map_err(|source| NormalizeError::CreateDir {
        path: dest.to_path_buf(),
        source,
    })?;

    let file = File::open(archive).map_err(|source| NormalizeError::OpenArchive {
        path: archive.to_path_buf(),
        source,
    })?;
    let mut zip =
        ZipArchive::new(BufReader::new(file)).map_err(|source| NormalizeError::Archive {
            path: archive.to_path_buf(),
            source,
        })?;

    for index in 0..zip.len() {
        let mut entry = zip
            .by_index(index)
            .map_err(|source| NormalizeError::Archive {
                path: archive.to_path_buf(),
                source,
            })?;
        let Some(relative) = entry.enclosed_name() else {
            return Err(NormalizeError::UnsafeEntry {
                archive: archive.to_path_buf(),
                entry: entry.name().to_string(),
            });
        };
        let out_path = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path).map_err(|source| NormalizeError::CreateDir {
                path: out_path.clone(),
                source,
            })?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent).map_err(|source| NormalizeError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        trace!(entry = %entry.name(), path = %out_path.display(), "extracting");
        let mut out = File::create(&out_path).map_err(|source| NormalizeError::Write {
            path: out_path.clone(),
            source,
        })?;
        io::copy(&mut entry, &mut out).map_err(|source| NormalizeError::Write {
            path: out_path.clone(),
            source,
        })?;
    }

    Ok(zip.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    #[test]
    fn test_extract_files_and_directories() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("types.zip");
        let mut writer = ZipWriter::new(File::create(&archive).unwrap());
        let options = SimpleFileOptions::default();
        writer.add_directory("dataTypes/", options).unwrap();
        writer.start_file("dataTypes/Order.raml", options).unwrap();
        writer.write_all(b"#%RAML 1.0 DataType\ntype: object\n").unwrap();
        writer.start_file("exchange.json", options).unwrap();
        writer.write_all(b"{}").unwrap();
        writer.finish().unwrap();

        let dest = dir.path().join("out");
        let count = extract_zip(&archive, &dest).unwrap();
        assert_eq!(count, 3);
        assert_eq!(
            fs::read_to_string(dest.join("dataTypes/Order.raml")).unwrap(),
            "#%RAML 1.0 DataType\ntype: object\n"
        );
        assert!(dest.join("exchange.json").is_file());
    }

    #[test]
    fn test_rejects_entries_escaping_destination() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("evil.zip");
        let mut writer = ZipWriter::new(File::create(&archive).unwrap());
        writer
            .start_file("../escape.txt", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"nope").unwrap();
        writer.finish().unwrap();

        let dest = dir.path().join("out");
        let error = extract_zip(&archive, &dest).unwrap_err();
        assert!(matches!(error, NormalizeError::UnsafeEntry { .. }));
        assert!(!dir.path().join("escape.txt").exists());
    }

    #[test]
    fn test_not_a_zip() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("broken.zip");
        fs::write(&archive, b"definitely not a zip").unwrap();
        let error = extract_zip(&archive, &dir.path().join("out")).unwrap_err();
        assert!(matches!(error, NormalizeError::Archive { .. }));
        assert!(error.to_string().contains("broken.zip"));
    }
}
