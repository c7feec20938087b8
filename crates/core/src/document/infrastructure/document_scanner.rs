use std::io;
use std::path::{Path, PathBuf};

use crate::shared::constants::DOCUMENT_EXTENSION;

/// Lists the transcript documents directly inside `dir`, sorted by file name
/// so batch runs process them in a deterministic order. Not recursive.
pub fn discover_documents(dir: &Path) -> Result<Vec<PathBuf>, io::Error> {
    let mut documents = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_document(&path) {
            documents.push(path);
        }
    }
    documents.sort();
    Ok(documents)
}

fn is_document(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(DOCUMENT_EXTENSION))
        .unwrap_or(false)
}
