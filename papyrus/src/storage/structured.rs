//! Structured binary IO for segment files.
//!
//! Little-endian primitives, variable-length integers and length-prefixed
//! strings, with a CRC32 trailer over the whole payload. Readers verify
//! the trailer before any field is decoded.

use std::io::{Cursor, Read};

use byteorder::{ByteOrder, LittleEndian, ReadBytesExt};
use crc32fast::Hasher;

use crate::error::{PapyrusError, Result};
use crate::storage::StorageOutput;

/// Writer for a structured, checksummed storage file.
pub struct StructWriter {
    out: Box<dyn StorageOutput>,
    hasher: Hasher,
    position: u64,
}

impl StructWriter {
    pub fn new(out: Box<dyn StorageOutput>) -> Self {
        StructWriter {
            out,
            hasher: Hasher::new(),
            position: 0,
        }
    }

    fn put(&mut self, bytes: &[u8]) -> Result<()> {
        std::io::Write::write_all(&mut self.out, bytes)?;
        self.hasher.update(bytes);
        self.position += bytes.len() as u64;
        Ok(())
    }

    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.put(&[value])
    }

    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        let mut buf = [0u8; 4];
        LittleEndian::write_u32(&mut buf, value);
        self.put(&buf)
    }

    pub fn write_u64(&mut self, value: u64) -> Result<()> {
        let mut buf = [0u8; 8];
        LittleEndian::write_u64(&mut buf, value);
        self.put(&buf)
    }

    /// Write a u64 with variable-length encoding, 7 bits per byte.
    pub fn write_varint(&mut self, value: u64) -> Result<()> {
        let mut val = value;
        loop {
            let mut byte = (val & 0x7F) as u8;
            val >>= 7;
            if val != 0 {
                byte |= 0x80;
            }
            self.put(&[byte])?;
            if val == 0 {
                return Ok(());
            }
        }
    }

    /// Write a length-prefixed UTF-8 string.
    pub fn write_string(&mut self, value: &str) -> Result<()> {
        self.write_varint(value.len() as u64)?;
        self.put(value.as_bytes())
    }

    /// Bytes written so far, excluding the checksum trailer.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Append the CRC32 trailer and persist the file.
    pub fn close(mut self) -> Result<()> {
        let crc = self.hasher.clone().finalize();
        let mut buf = [0u8; 4];
        LittleEndian::write_u32(&mut buf, crc);
        std::io::Write::write_all(&mut self.out, &buf)?;
        self.out.close()
    }
}

/// Reader over a full structured file image.
pub struct StructReader {
    cursor: Cursor<Vec<u8>>,
}

impl StructReader {
    /// Wrap a file image, verifying the CRC32 trailer first.
    pub fn open(data: Vec<u8>) -> Result<Self> {
        if data.len() < 4 {
            return Err(PapyrusError::index("File too short for checksum"));
        }
        let payload_len = data.len() - 4;
        let expected = LittleEndian::read_u32(&data[payload_len..]);
        let mut hasher = Hasher::new();
        hasher.update(&data[..payload_len]);
        if hasher.finalize() != expected {
            return Err(PapyrusError::index("Checksum mismatch"));
        }
        let mut payload = data;
        payload.truncate(payload_len);
        Ok(StructReader {
            cursor: Cursor::new(payload),
        })
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.cursor.read_u8()?)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(self.cursor.read_u32::<LittleEndian>()?)
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(self.cursor.read_u64::<LittleEndian>()?)
    }

    /// Read a u64 with variable-length encoding.
    pub fn read_varint(&mut self) -> Result<u64> {
        let mut result = 0u64;
        let mut shift = 0;
        loop {
            if shift >= 64 {
                return Err(PapyrusError::index("VarInt overflow"));
            }
            let byte = self
                .cursor
                .read_u8()
                .map_err(|_| PapyrusError::index("Incomplete VarInt"))?;
            result |= ((byte & 0x7F) as u64) << shift;
            if byte & 0x80 == 0 {
                return Ok(result);
            }
            shift += 7;
        }
    }

    /// Read a length-prefixed UTF-8 string.
    pub fn read_string(&mut self) -> Result<String> {
        let len = self.read_varint()? as usize;
        let mut buf = vec![0u8; len];
        self.cursor.read_exact(&mut buf)?;
        String::from_utf8(buf).map_err(|err| PapyrusError::index(format!("Invalid string: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryStorage;
    use crate::storage::{Storage, read_file};

    fn roundtrip(write: impl FnOnce(&mut StructWriter)) -> StructReader {
        let storage = MemoryStorage::new();
        let mut writer = StructWriter::new(storage.create_output("t").unwrap());
        write(&mut writer);
        writer.close().unwrap();
        StructReader::open(read_file(&storage, "t").unwrap()).unwrap()
    }

    #[test]
    fn test_primitives_roundtrip() {
        let mut reader = roundtrip(|w| {
            w.write_u8(7).unwrap();
            w.write_u32(0xDEAD_BEEF).unwrap();
            w.write_u64(u64::MAX).unwrap();
            w.write_string("segment").unwrap();
        });
        assert_eq!(reader.read_u8().unwrap(), 7);
        assert_eq!(reader.read_u32().unwrap(), 0xDEAD_BEEF);
        assert_eq!(reader.read_u64().unwrap(), u64::MAX);
        assert_eq!(reader.read_string().unwrap(), "segment");
    }

    #[test]
    fn test_varint_roundtrip() {
        let values = [0, 1, 127, 128, 255, 256, 16383, 16384, u64::MAX];
        let mut reader = roundtrip(|w| {
            for &value in &values {
                w.write_varint(value).unwrap();
            }
        });
        for &value in &values {
            assert_eq!(reader.read_varint().unwrap(), value);
        }
    }

    #[test]
    fn test_checksum_mismatch_detected() {
        let storage = MemoryStorage::new();
        let mut writer = StructWriter::new(storage.create_output("t").unwrap());
        writer.write_string("payload").unwrap();
        writer.close().unwrap();

        let mut data = read_file(&storage, "t").unwrap();
        data[0] ^= 0xFF;
        assert!(StructReader::open(data).is_err());
    }

    #[test]
    fn test_truncated_file_rejected() {
        assert!(StructReader::open(vec![0x01, 0x02]).is_err());
    }

    #[test]
    fn test_incomplete_varint() {
        // A continuation bit with nothing after it fails the read, not the
        // checksum (the trailer is valid).
        let storage = MemoryStorage::new();
        let mut writer = StructWriter::new(storage.create_output("t").unwrap());
        writer.write_u8(0x80).unwrap();
        writer.close().unwrap();

        let mut reader = StructReader::open(read_file(&storage, "t").unwrap()).unwrap();
        assert!(reader.read_varint().is_err());
    }
}
