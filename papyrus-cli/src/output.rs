use papyrus::Hit;
use papyrus::ingest::{PAGE_FIELD, PATH_FIELD};

/// Print ranked hits as numbered result lines.
///
/// The page suffix is omitted for single-page documents (page "0").
pub fn print_hits(hits: &[Hit]) {
    for (i, hit) in hits.iter().enumerate() {
        match hit.document.get(PATH_FIELD) {
            Some(path) => {
                let page = hit.document.get(PAGE_FIELD).unwrap_or("0");
                if page.is_empty() || page == "0" {
                    println!("{}. File: {path}", i + 1);
                } else {
                    println!("{}. File: {path} (page {page})", i + 1);
                }
            }
            None => println!("{}. [No path information available]", i + 1),
        }
    }
}
