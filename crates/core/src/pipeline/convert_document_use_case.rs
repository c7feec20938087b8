use std::path::Path;

use crate::document::domain::paragraph_source::ParagraphSource;
use crate::table::domain::table_sink::TableSink;
use crate::transcript::domain::ignore_list::IgnoreList;
use crate::transcript::domain::turn_parser::TurnParser;

/// Single-document pipeline: read paragraphs → segment into rows → write.
pub struct ConvertDocumentUseCase {
    source: Box<dyn ParagraphSource>,
    sink: Box<dyn TableSink>,
    ignore_list: IgnoreList,
}

impl ConvertDocumentUseCase {
    pub fn new(
        source: Box<dyn ParagraphSource>,
        sink: Box<dyn TableSink>,
        ignore_list: IgnoreList,
    ) -> Self {
        Self {
            source,
            sink,
            ignore_list,
        }
    }

    /// Converts one document and returns the number of rows written.
    ///
    /// A document with no parseable content still produces an artifact (the
    /// sheet boilerplate with zero transcript rows).
    pub fn execute(
        &self,
        input_path: &Path,
        output_path: &Path,
    ) -> Result<usize, Box<dyn std::error::Error>> {
        let paragraphs = self.source.paragraphs(input_path)?;

        let mut parser = TurnParser::new(self.ignore_list.clone());
        let mut rows = Vec::new();
        for paragraph in &paragraphs {
            rows.extend(parser.consume(paragraph));
            if parser.is_halted() {
                break;
            }
        }

        log::debug!(
            "{}: {} paragraphs -> {} rows",
            input_path.display(),
            paragraphs.len(),
            rows.len()
        );
        self.sink.write(output_path, &rows)?;
        Ok(rows.len())
    }
}
