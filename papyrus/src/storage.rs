//! Pluggable storage backends for persisted index data.
//!
//! A storage is a flat namespace of files. Segments are only ever written
//! once and the commit record is replaced through [`Storage::rename`], so
//! readers always observe a consistent snapshot.

pub mod file;
pub mod memory;
pub mod structured;

use std::fmt::Debug;
use std::io::Read;

use crate::error::Result;

/// Output handle for one storage file.
pub trait StorageOutput: std::io::Write + Send {
    /// Flush and persist the file.
    fn close(&mut self) -> Result<()>;
}

/// Storage backend abstraction.
pub trait Storage: Send + Sync + Debug {
    /// Create a file, truncating any existing content.
    fn create_output(&self, name: &str) -> Result<Box<dyn StorageOutput>>;

    /// Open a file for reading.
    fn open_input(&self, name: &str) -> Result<Box<dyn Read + Send>>;

    /// List all files in the storage.
    fn list_files(&self) -> Result<Vec<String>>;

    /// Whether a file exists.
    fn file_exists(&self, name: &str) -> bool;

    /// Delete a file.
    fn delete_file(&self, name: &str) -> Result<()>;

    /// Atomically replace `to` with `from`.
    fn rename(&self, from: &str, to: &str) -> Result<()>;
}

/// Read an entire storage file into memory.
pub fn read_file(storage: &dyn Storage, name: &str) -> Result<Vec<u8>> {
    let mut input = storage.open_input(name)?;
    let mut data = Vec::new();
    input.read_to_end(&mut data)?;
    Ok(data)
}
