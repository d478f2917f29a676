//! Filesystem-backed storage.

use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::error::{PapyrusError, Result};
use crate::storage::{Storage, StorageOutput};

/// Directory-backed storage.
///
/// Each logical file maps to one file directly inside the directory;
/// subdirectories are not used. Renames within one directory are atomic
/// on all supported platforms, which is what the commit record relies on.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Open the directory, creating it when missing.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        fs::create_dir_all(path)?;
        Ok(FileStorage {
            path: path.to_path_buf(),
        })
    }

    /// Open an existing directory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_dir() {
            return Err(PapyrusError::storage(format!(
                "Directory does not exist: {}",
                path.display()
            )));
        }
        Ok(FileStorage {
            path: path.to_path_buf(),
        })
    }

    /// The backing directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn resolve(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }
}

struct FileOutput {
    writer: BufWriter<File>,
}

impl Write for FileOutput {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}

impl StorageOutput for FileOutput {
    fn close(&mut self) -> Result<()> {
        self.writer.flush()?;
        self.writer.get_ref().sync_all()?;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn create_output(&self, name: &str) -> Result<Box<dyn StorageOutput>> {
        let file = File::create(self.resolve(name))?;
        Ok(Box::new(FileOutput {
            writer: BufWriter::new(file),
        }))
    }

    fn open_input(&self, name: &str) -> Result<Box<dyn Read + Send>> {
        let file = File::open(self.resolve(name))?;
        Ok(Box::new(file))
    }

    fn list_files(&self) -> Result<Vec<String>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.path)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                files.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        files.sort();
        Ok(files)
    }

    fn file_exists(&self, name: &str) -> bool {
        self.resolve(name).is_file()
    }

    fn delete_file(&self, name: &str) -> Result<()> {
        fs::remove_file(self.resolve(name))?;
        Ok(())
    }

    fn rename(&self, from: &str, to: &str) -> Result<()> {
        fs::rename(self.resolve(from), self.resolve(to))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::storage::read_file;

    #[test]
    fn test_write_read_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::create(dir.path()).unwrap();

        let mut output = storage.create_output("data.bin").unwrap();
        output.write_all(b"hello storage").unwrap();
        output.close().unwrap();

        assert!(storage.file_exists("data.bin"));
        assert_eq!(read_file(&storage, "data.bin").unwrap(), b"hello storage");
    }

    #[test]
    fn test_rename_replaces_target() {
        let dir = tempfile::tempdir().unwrap();
        let storage: Arc<dyn Storage> = Arc::new(FileStorage::create(dir.path()).unwrap());

        for (name, content) in [("a", b"old".as_slice()), ("b", b"new".as_slice())] {
            let mut output = storage.create_output(name).unwrap();
            output.write_all(content).unwrap();
            output.close().unwrap();
        }

        storage.rename("b", "a").unwrap();
        assert_eq!(read_file(storage.as_ref(), "a").unwrap(), b"new");
        assert!(!storage.file_exists("b"));
    }

    #[test]
    fn test_open_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FileStorage::open(dir.path().join("missing")).is_err());
    }
}
