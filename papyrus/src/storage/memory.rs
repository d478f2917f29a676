//! In-memory storage for tests and ephemeral indexes.

use std::io::{Cursor, Read, Write};
use std::sync::Arc;

use ahash::AHashMap;
use parking_lot::RwLock;

use crate::error::{PapyrusError, Result};
use crate::storage::{Storage, StorageOutput};

type FileMap = Arc<RwLock<AHashMap<String, Arc<Vec<u8>>>>>;

/// Storage backend keeping every file in memory.
///
/// Cheap to clone; clones share the same file map, so a writer and any
/// number of readers can be pointed at the same storage instance.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    files: FileMap,
}

impl MemoryStorage {
    /// Create an empty in-memory storage.
    pub fn new() -> Self {
        MemoryStorage::default()
    }
}

struct MemoryOutput {
    name: String,
    buffer: Vec<u8>,
    files: FileMap,
    published: bool,
}

impl MemoryOutput {
    fn publish(&mut self) {
        if !self.published {
            let data = std::mem::take(&mut self.buffer);
            self.files.write().insert(self.name.clone(), Arc::new(data));
            self.published = true;
        }
    }
}

impl Write for MemoryOutput {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl StorageOutput for MemoryOutput {
    fn close(&mut self) -> Result<()> {
        self.publish();
        Ok(())
    }
}

impl Drop for MemoryOutput {
    fn drop(&mut self) {
        self.publish();
    }
}

impl Storage for MemoryStorage {
    fn create_output(&self, name: &str) -> Result<Box<dyn StorageOutput>> {
        Ok(Box::new(MemoryOutput {
            name: name.to_string(),
            buffer: Vec::new(),
            files: self.files.clone(),
            published: false,
        }))
    }

    fn open_input(&self, name: &str) -> Result<Box<dyn Read + Send>> {
        let data = self
            .files
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| PapyrusError::storage(format!("File not found: {name}")))?;
        Ok(Box::new(Cursor::new(data.as_ref().clone())))
    }

    fn list_files(&self) -> Result<Vec<String>> {
        let mut files: Vec<String> = self.files.read().keys().cloned().collect();
        files.sort();
        Ok(files)
    }

    fn file_exists(&self, name: &str) -> bool {
        self.files.read().contains_key(name)
    }

    fn delete_file(&self, name: &str) -> Result<()> {
        self.files
            .write()
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| PapyrusError::storage(format!("File not found: {name}")))
    }

    fn rename(&self, from: &str, to: &str) -> Result<()> {
        let mut files = self.files.write();
        let data = files
            .remove(from)
            .ok_or_else(|| PapyrusError::storage(format!("File not found: {from}")))?;
        files.insert(to.to_string(), data);
        Ok(())
    }
}
