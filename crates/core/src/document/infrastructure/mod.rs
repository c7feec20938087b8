pub mod docx_paragraph_source;
pub mod document_scanner;
