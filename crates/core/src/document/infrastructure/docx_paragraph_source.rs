use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;

use crate::document::domain::paragraph_source::ParagraphSource;

const DOCUMENT_PART: &str = "word/document.xml";

#[derive(Error, Debug)]
pub enum DocxError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} is not a valid document archive: {source}")]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },
    #[error("{path} has no {DOCUMENT_PART} part")]
    MissingDocumentPart { path: PathBuf },
    #[error("failed to read {DOCUMENT_PART} from {path}: {source}")]
    Part {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed document XML in {path}: {source}")]
    Xml {
        path: PathBuf,
        #[source]
        source: quick_xml::Error,
    },
}

/// Reads paragraphs out of a `.docx` file.
///
/// A `.docx` is a ZIP archive whose main text lives in `word/document.xml`;
/// each `w:p` element becomes one paragraph string, concatenating its `w:t`
/// runs, with `w:tab` and `w:br` mapped to tab and newline.
pub struct DocxParagraphSource;

impl DocxParagraphSource {
    pub fn new() -> Self {
        Self
    }

    pub fn read(&self, path: &Path) -> Result<Vec<String>, DocxError> {
        let xml = read_document_part(path)?;
        parse_document_xml(&xml).map_err(|source| DocxError::Xml {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl Default for DocxParagraphSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ParagraphSource for DocxParagraphSource {
    fn paragraphs(&self, path: &Path) -> Result<Vec<String>, Box<dyn std::error::Error>> {
        Ok(self.read(path)?)
    }
}

fn read_document_part(path: &Path) -> Result<String, DocxError> {
    let file = File::open(path).map_err(|e| DocxError::Open {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| DocxError::Archive {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut entry = match archive.by_name(DOCUMENT_PART) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => {
            return Err(DocxError::MissingDocumentPart {
                path: path.to_path_buf(),
            })
        }
        Err(e) => {
            return Err(DocxError::Archive {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };
    let mut buffer = Vec::new();
    entry.read_to_end(&mut buffer).map_err(|e| DocxError::Part {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(String::from_utf8_lossy(&buffer).to_string())
}

fn parse_document_xml(xml: &str) -> Result<Vec<String>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_paragraph = false;
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => match e.local_name().as_ref() {
                b"p" => {
                    in_paragraph = true;
                    current.clear();
                }
                b"t" => in_text = true,
                b"tab" if in_paragraph => current.push('\t'),
                b"br" if in_paragraph => current.push('\n'),
                _ => {}
            },
            Event::Empty(ref e) => match e.local_name().as_ref() {
                // An empty `w:p` is still a paragraph; it can be the
                // end-of-transcript marker.
                b"p" => paragraphs.push(String::new()),
                b"tab" if in_paragraph => current.push('\t'),
                b"br" if in_paragraph => current.push('\n'),
                _ => {}
            },
            Event::End(ref e) => match e.local_name().as_ref() {
                b"p" => {
                    if in_paragraph {
                        paragraphs.push(std::mem::take(&mut current));
                        in_paragraph = false;
                    }
                }
                b"t" => in_text = false,
                _ => {}
            },
            Event::Text(t) => {
                if in_text {
                    current.push_str(&t.unescape()?);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_docx(path: &Path, body: &str) {
        let file = fs::File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file(DOCUMENT_PART, options).unwrap();
        let xml = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
             <w:body>{body}</w:body></w:document>"
        );
        zip.write_all(xml.as_bytes()).unwrap();
        zip.finish().unwrap();
    }

    fn para(text: &str) -> String {
        format!("<w:p><w:r><w:t>{text}</w:t></w:r></w:p>")
    }

    #[test]
    fn test_paragraphs_in_document_order() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("in.docx");
        write_docx(
            &path,
            &format!("{}{}{}", para("Mom: hello"), para("Dad: hi"), para("bye")),
        );

        let paragraphs = DocxParagraphSource::new().read(&path).unwrap();
        assert_eq!(paragraphs, vec!["Mom: hello", "Dad: hi", "bye"]);
    }

    #[test]
    fn test_empty_paragraphs_are_preserved() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("in.docx");
        write_docx(
            &path,
            &format!("{}<w:p/>{}", para("before"), para("after")),
        );

        let paragraphs = DocxParagraphSource::new().read(&path).unwrap();
        assert_eq!(paragraphs, vec!["before", "", "after"]);
    }

    #[test]
    fn test_runs_are_concatenated_and_entities_unescaped() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("in.docx");
        write_docx(
            &path,
            "<w:p><w:r><w:t>Tom &amp; Ann</w:t></w:r><w:r><w:t>: yes</w:t></w:r></w:p>",
        );

        let paragraphs = DocxParagraphSource::new().read(&path).unwrap();
        assert_eq!(paragraphs, vec!["Tom & Ann: yes"]);
    }

    #[test]
    fn test_tab_and_br_are_mapped() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("in.docx");
        write_docx(
            &path,
            "<w:p><w:r><w:t>a</w:t><w:tab/><w:t>b</w:t><w:br/><w:t>c</w:t></w:r></w:p>",
        );

        let paragraphs = DocxParagraphSource::new().read(&path).unwrap();
        assert_eq!(paragraphs, vec!["a\tb\nc"]);
    }

    #[test]
    fn test_non_archive_input_is_typed_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("not.docx");
        fs::write(&path, "plain text, not a zip").unwrap();

        let err = DocxParagraphSource::new().read(&path).unwrap_err();
        assert!(matches!(err, DocxError::Archive { .. }));
    }

    #[test]
    fn test_missing_document_part_is_typed_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("hollow.docx");
        let file = fs::File::create(&path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        zip.start_file("word/other.xml", zip::write::SimpleFileOptions::default())
            .unwrap();
        zip.write_all(b"<x/>").unwrap();
        zip.finish().unwrap();

        let err = DocxParagraphSource::new().read(&path).unwrap_err();
        assert!(matches!(err, DocxError::MissingDocumentPart { .. }));
    }

    #[test]
    fn test_missing_file_is_typed_error() {
        let err = DocxParagraphSource::new()
            .read(Path::new("/nonexistent/in.docx"))
            .unwrap_err();
        assert!(matches!(err, DocxError::Open { .. }));
    }
}
