use std::fs;
use std::path::Path;
use std::sync::Arc;

use papyrus::storage::Storage;
use papyrus::storage::file::FileStorage;
use papyrus::{
    DirectoryIngestor, Extractor, IndexReader, IndexSearcher, IndexWriterConfig, Page,
    Result as PapyrusResult, StandardAnalyzer,
};

/// Stands in for a page-oriented format adapter (the real one parses the
/// container; the engine only sees pages).
#[derive(Debug)]
struct StubPagedExtractor {
    pages: Vec<Page>,
}

impl Extractor for StubPagedExtractor {
    fn supports(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
    }

    fn extract(&self, _path: &Path) -> PapyrusResult<Vec<Page>> {
        Ok(self.pages.clone())
    }
}

fn searcher_for(index_dir: &Path) -> IndexSearcher {
    let storage: Arc<dyn Storage> = Arc::new(FileStorage::open(index_dir).unwrap());
    let reader = IndexReader::open(storage).unwrap();
    IndexSearcher::new(reader, Arc::new(StandardAnalyzer::new().unwrap()))
}

#[test]
fn test_directory_scenario() {
    let data = tempfile::tempdir().unwrap();
    fs::write(data.path().join("a.txt"), "hello world").unwrap();
    fs::write(data.path().join("b.txt"), "hello there").unwrap();

    let index = tempfile::tempdir().unwrap();
    let storage: Arc<dyn Storage> = Arc::new(FileStorage::create(index.path()).unwrap());

    let stats = DirectoryIngestor::new().ingest(data.path(), storage).unwrap();
    assert_eq!(stats.files_scanned, 2);
    assert_eq!(stats.files_indexed, 2);
    assert_eq!(stats.pages_indexed, 2);
    assert_eq!(stats.files_failed, 0);

    let searcher = searcher_for(index.path());

    // "hello" matches both files, each on page 0.
    let hits = searcher.search("hello").unwrap();
    assert_eq!(hits.len(), 2);
    for hit in &hits {
        assert_eq!(hit.document.get("page"), Some("0"));
    }
    let paths: Vec<_> = hits
        .iter()
        .map(|h| h.document.get("path").unwrap().to_string())
        .collect();
    assert!(paths[0].ends_with("a.txt"));
    assert!(paths[1].ends_with("b.txt"));

    // "world" matches only a.txt.
    let hits = searcher.search("world").unwrap();
    assert_eq!(hits.len(), 1);
    assert!(hits[0].document.get("path").unwrap().ends_with("a.txt"));
}

#[test]
fn test_multi_page_source_tracks_page_numbers() {
    let data = tempfile::tempdir().unwrap();
    fs::write(data.path().join("report.pdf"), b"%PDF-stub").unwrap();

    let index = tempfile::tempdir().unwrap();
    let storage: Arc<dyn Storage> = Arc::new(FileStorage::create(index.path()).unwrap());

    let stub = StubPagedExtractor {
        pages: vec![Page::new(0, "apple"), Page::new(1, "banana")],
    };
    let stats = DirectoryIngestor::new()
        .with_extractor(Box::new(stub))
        .ingest(data.path(), storage)
        .unwrap();

    // Two pages of one file become two documents sharing a path.
    assert_eq!(stats.files_indexed, 1);
    assert_eq!(stats.pages_indexed, 2);

    let searcher = searcher_for(index.path());

    let hits = searcher.search("banana").unwrap();
    assert_eq!(hits.len(), 1);
    assert!(hits[0].document.get("path").unwrap().ends_with("report.pdf"));
    assert_eq!(hits[0].document.get("page"), Some("1"));

    let hits = searcher.search("apple").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].document.get("page"), Some("0"));
}

#[test]
fn test_empty_directory_builds_empty_index() {
    let data = tempfile::tempdir().unwrap();
    let index = tempfile::tempdir().unwrap();
    let storage: Arc<dyn Storage> = Arc::new(FileStorage::create(index.path()).unwrap());

    let stats = DirectoryIngestor::new().ingest(data.path(), storage).unwrap();
    assert_eq!(stats.pages_indexed, 0);

    // The index exists and searches cleanly to zero hits.
    let searcher = searcher_for(index.path());
    assert!(searcher.search("anything").unwrap().is_empty());
}

#[test]
fn test_unsupported_and_empty_files_are_skipped() {
    let data = tempfile::tempdir().unwrap();
    fs::write(data.path().join("a.txt"), "indexed content").unwrap();
    fs::write(data.path().join("empty.txt"), "").unwrap();
    fs::write(data.path().join("image.bin"), &[0u8, 1, 2, 3]).unwrap();

    let index = tempfile::tempdir().unwrap();
    let storage: Arc<dyn Storage> = Arc::new(FileStorage::create(index.path()).unwrap());

    let stats = DirectoryIngestor::new().ingest(data.path(), storage).unwrap();
    assert_eq!(stats.files_scanned, 3);
    assert_eq!(stats.files_indexed, 1);
    assert_eq!(stats.pages_indexed, 1);
    assert_eq!(stats.files_failed, 0);
}

#[test]
fn test_traversal_recurses_into_subdirectories() {
    let data = tempfile::tempdir().unwrap();
    fs::create_dir_all(data.path().join("nested/deeper")).unwrap();
    fs::write(data.path().join("top.txt"), "surface").unwrap();
    fs::write(data.path().join("nested/deeper/c.txt"), "buried treasure").unwrap();

    let index = tempfile::tempdir().unwrap();
    let storage: Arc<dyn Storage> = Arc::new(FileStorage::create(index.path()).unwrap());

    DirectoryIngestor::new().ingest(data.path(), storage).unwrap();

    let searcher = searcher_for(index.path());
    let hits = searcher.search("treasure").unwrap();
    assert_eq!(hits.len(), 1);
    assert!(hits[0].document.get("path").unwrap().ends_with("c.txt"));
}

#[test]
fn test_rebuild_replaces_previous_index() {
    let data = tempfile::tempdir().unwrap();
    fs::write(data.path().join("a.txt"), "original words").unwrap();

    let index = tempfile::tempdir().unwrap();
    let storage: Arc<dyn Storage> = Arc::new(FileStorage::create(index.path()).unwrap());
    DirectoryIngestor::new().ingest(data.path(), storage.clone()).unwrap();

    fs::write(data.path().join("a.txt"), "replacement words").unwrap();
    DirectoryIngestor::new().ingest(data.path(), storage).unwrap();

    let searcher = searcher_for(index.path());
    assert!(searcher.search("original").unwrap().is_empty());
    assert_eq!(searcher.search("replacement").unwrap().len(), 1);
}

#[test]
fn test_ingest_produces_single_optimized_segment() {
    let data = tempfile::tempdir().unwrap();
    for i in 0..5 {
        fs::write(data.path().join(format!("f{i}.txt")), format!("word{i} common")).unwrap();
    }

    let index = tempfile::tempdir().unwrap();
    let storage: Arc<dyn Storage> = Arc::new(FileStorage::create(index.path()).unwrap());

    // Tiny buffer to force several flushes before the optimize pass.
    let config = IndexWriterConfig {
        max_buffered_docs: 2,
        ..Default::default()
    };
    DirectoryIngestor::new()
        .with_writer_config(config)
        .ingest(data.path(), storage)
        .unwrap();

    let searcher = searcher_for(index.path());
    assert_eq!(searcher.reader().segment_count(), 1);
    assert_eq!(searcher.search("common").unwrap().len(), 5);
}
