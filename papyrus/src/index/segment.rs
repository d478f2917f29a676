//! Segment files and the commit record.
//!
//! A segment is an immutable set of files sharing one name:
//!
//! - `<segment>.post` — term dictionary and posting lists
//! - `<segment>.docs` — stored-field side table keyed by document id
//! - `<segment>.meta` — JSON [`SegmentInfo`], read back on writer recovery
//!
//! `segments.json` names the live segment set and is replaced atomically,
//! so a reader either sees the previous snapshot or the new one, never a
//! partially written state.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::document::StoredDocument;
use crate::error::{PapyrusError, Result};
use crate::index::COMMIT_FILE;
use crate::index::posting::{Posting, PostingList};
use crate::storage::structured::{StructReader, StructWriter};
use crate::storage::{self, Storage, StorageOutput};

const POSTINGS_MAGIC: u32 = 0x5053_5447; // "PSTG"
const STORED_MAGIC: u32 = 0x5053_5444; // "PSTD"
const FORMAT_VERSION: u32 = 1;

/// Metadata for one segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentInfo {
    /// Segment identifier (file name stem).
    pub segment_id: String,

    /// Number of documents in this segment.
    pub doc_count: u64,

    /// Minimum document id in this segment.
    pub min_doc_id: u64,

    /// Maximum document id in this segment.
    pub max_doc_id: u64,

    /// Generation number of this segment.
    pub generation: u64,
}

impl SegmentInfo {
    pub fn postings_file(&self) -> String {
        format!("{}.post", self.segment_id)
    }

    pub fn docs_file(&self) -> String {
        format!("{}.docs", self.segment_id)
    }

    pub fn meta_file(&self) -> String {
        format!("{}.meta", self.segment_id)
    }

    /// All files belonging to this segment.
    pub fn files(&self) -> [String; 3] {
        [self.postings_file(), self.docs_file(), self.meta_file()]
    }
}

/// Commit record naming the current valid segment set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommitPoint {
    /// Monotonic commit generation.
    pub generation: u64,

    /// Live segments, in creation (document id) order.
    pub segments: Vec<SegmentInfo>,
}

impl CommitPoint {
    /// Read the commit record, or `None` when the index has never been
    /// committed.
    pub fn read(storage: &dyn Storage) -> Result<Option<CommitPoint>> {
        if !storage.file_exists(COMMIT_FILE) {
            return Ok(None);
        }
        let input = storage.open_input(COMMIT_FILE)?;
        let commit = serde_json::from_reader(input)?;
        Ok(Some(commit))
    }

    /// Atomically publish this commit record.
    pub fn write(&self, storage: &dyn Storage) -> Result<()> {
        let tmp = format!("{COMMIT_FILE}.tmp");
        let mut output = storage.create_output(&tmp)?;
        let json = serde_json::to_string_pretty(self)?;
        std::io::Write::write_all(&mut output, json.as_bytes())?;
        output.close()?;
        storage.rename(&tmp, COMMIT_FILE)
    }
}

/// Write the posting lists of one segment, terms pre-sorted by the caller.
pub(crate) fn write_postings(
    storage: &dyn Storage,
    info: &SegmentInfo,
    terms: &[(&str, &PostingList)],
) -> Result<()> {
    let mut writer = StructWriter::new(storage.create_output(&info.postings_file())?);
    writer.write_u32(POSTINGS_MAGIC)?;
    writer.write_u32(FORMAT_VERSION)?;
    writer.write_varint(terms.len() as u64)?;

    for (term, list) in terms {
        writer.write_string(term)?;
        writer.write_varint(list.postings.len() as u64)?;

        let mut prev_doc = 0u64;
        for posting in &list.postings {
            writer.write_varint(posting.doc_id - prev_doc)?;
            prev_doc = posting.doc_id;
            writer.write_varint(posting.frequency as u64)?;
            writer.write_varint(posting.positions.len() as u64)?;
            for &pos in &posting.positions {
                writer.write_varint(pos as u64)?;
            }
        }
    }

    writer.close()
}

/// Read the posting lists of one segment. Document frequencies are
/// recomputed while loading.
pub(crate) fn read_postings(
    storage: &dyn Storage,
    info: &SegmentInfo,
) -> Result<AHashMap<String, PostingList>> {
    let data = storage::read_file(storage, &info.postings_file())?;
    let mut reader = StructReader::open(data)?;

    check_header(&mut reader, POSTINGS_MAGIC, &info.postings_file())?;

    let term_count = reader.read_varint()? as usize;
    let mut terms = AHashMap::with_capacity(term_count);

    for _ in 0..term_count {
        let term = reader.read_string()?;
        let posting_count = reader.read_varint()? as usize;
        let mut list = PostingList::new();

        let mut doc_id = 0u64;
        for _ in 0..posting_count {
            doc_id += reader.read_varint()?;
            let frequency = reader.read_varint()? as u32;
            let position_count = reader.read_varint()? as usize;

            let mut positions = Vec::with_capacity(position_count);
            for _ in 0..position_count {
                positions.push(reader.read_varint()? as u32);
            }

            list.push_posting(Posting {
                doc_id,
                frequency,
                positions,
            });
        }

        terms.insert(term, list);
    }

    Ok(terms)
}

/// Write the stored-field side table of one segment.
pub(crate) fn write_stored(
    storage: &dyn Storage,
    info: &SegmentInfo,
    docs: &[(u64, StoredDocument)],
) -> Result<()> {
    let mut writer = StructWriter::new(storage.create_output(&info.docs_file())?);
    writer.write_u32(STORED_MAGIC)?;
    writer.write_u32(FORMAT_VERSION)?;
    writer.write_varint(docs.len() as u64)?;

    for (doc_id, doc) in docs {
        writer.write_u64(*doc_id)?;
        writer.write_varint(doc.len() as u64)?;
        for (name, value) in doc.iter() {
            writer.write_string(name)?;
            writer.write_string(value)?;
        }
    }

    writer.close()
}

/// Read the stored-field side table of one segment, in document id order.
pub(crate) fn read_stored(
    storage: &dyn Storage,
    info: &SegmentInfo,
) -> Result<Vec<(u64, StoredDocument)>> {
    let data = storage::read_file(storage, &info.docs_file())?;
    let mut reader = StructReader::open(data)?;

    check_header(&mut reader, STORED_MAGIC, &info.docs_file())?;

    let doc_count = reader.read_varint()? as usize;
    let mut docs = Vec::with_capacity(doc_count);

    for _ in 0..doc_count {
        let doc_id = reader.read_u64()?;
        let field_count = reader.read_varint()? as usize;
        let mut doc = StoredDocument::new();
        for _ in 0..field_count {
            let name = reader.read_string()?;
            let value = reader.read_string()?;
            doc.push(name, value);
        }
        docs.push((doc_id, doc));
    }

    Ok(docs)
}

/// Write the JSON metadata file of one segment.
pub(crate) fn write_meta(storage: &dyn Storage, info: &SegmentInfo) -> Result<()> {
    let mut output = storage.create_output(&info.meta_file())?;
    let json = serde_json::to_string_pretty(info)?;
    std::io::Write::write_all(&mut output, json.as_bytes())?;
    output.close()
}

fn check_header(reader: &mut StructReader, magic: u32, file: &str) -> Result<()> {
    if reader.read_u32()? != magic {
        return Err(PapyrusError::index(format!("Bad magic in {file}")));
    }
    let version = reader.read_u32()?;
    if version != FORMAT_VERSION {
        return Err(PapyrusError::index(format!(
            "Unsupported format version {version} in {file}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryStorage;

    fn info() -> SegmentInfo {
        SegmentInfo {
            segment_id: "segment_000000".to_string(),
            doc_count: 2,
            min_doc_id: 0,
            max_doc_id: 1,
            generation: 0,
        }
    }

    #[test]
    fn test_postings_roundtrip() {
        let storage = MemoryStorage::new();

        let mut hello = PostingList::new();
        hello.add_occurrence(0, 0);
        hello.add_occurrence(0, 4);
        hello.add_occurrence(1, 2);
        let mut world = PostingList::new();
        world.add_occurrence(1, 0);

        let terms = [
            ("content:hello", &hello),
            ("content:world", &world),
        ];
        write_postings(&storage, &info(), &terms).unwrap();

        let loaded = read_postings(&storage, &info()).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.get("content:hello"), Some(&hello));
        assert_eq!(loaded.get("content:world"), Some(&world));
    }

    #[test]
    fn test_stored_roundtrip() {
        let storage = MemoryStorage::new();

        let mut doc = StoredDocument::new();
        doc.push("path", "/tmp/a.txt");
        doc.push("page", "0");
        let docs = vec![(0u64, doc.clone()), (1u64, doc)];

        write_stored(&storage, &info(), &docs).unwrap();
        let loaded = read_stored(&storage, &info()).unwrap();
        assert_eq!(loaded, docs);
    }

    #[test]
    fn test_commit_point_roundtrip() {
        let storage = MemoryStorage::new();

        assert!(CommitPoint::read(&storage).unwrap().is_none());

        let commit = CommitPoint {
            generation: 3,
            segments: vec![info()],
        };
        commit.write(&storage).unwrap();

        let loaded = CommitPoint::read(&storage).unwrap().unwrap();
        assert_eq!(loaded, commit);
        // The temp file never survives a publish.
        assert!(!storage.file_exists("segments.json.tmp"));
    }
}
