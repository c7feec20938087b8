use std::fs::File;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer as XmlWriter;
use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::table::domain::sheet_schema as schema;
use crate::table::domain::table_sink::TableSink;
use crate::transcript::domain::transcript_row::TranscriptRow;

const SPREADSHEET_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";

/// Cell style indices into the `cellXfs` table of `STYLES`.
const STYLE_LABEL: u32 = 1;
const STYLE_CENTERED_LABEL: u32 = 2;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Sheet1" sheetId="1" r:id="rId1"/></sheets></workbook>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

/// Font 1 is the bold Arial used for every label; style 2 additionally
/// centers, for the merged "Code" banner.
const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><fonts count="2"><font><sz val="11"/><name val="Calibri"/></font><font><b/><sz val="11"/><name val="Arial"/></font></fonts><fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills><borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders><cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs><cellXfs count="3"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/><xf numFmtId="0" fontId="1" fillId="0" borderId="0" xfId="0" applyFont="1"/><xf numFmtId="0" fontId="1" fillId="0" borderId="0" xfId="0" applyFont="1" applyAlignment="1"><alignment horizontal="center"/></xf></cellXfs></styleSheet>"#;

#[derive(Error, Debug)]
pub enum XlsxError {
    #[error("failed to create {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to assemble workbook archive {path}: {source}")]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to render sheet XML: {0}")]
    Sheet(#[from] quick_xml::Error),
}

/// Writes one document's rows as a `.xlsx` workbook.
///
/// The workbook is assembled part by part into its ZIP container: content
/// types, relationships, workbook, styles, and a single worksheet carrying
/// the fixed coding layout plus the transcript rows as inline strings
/// (numeric cells for talk turn and segment).
pub struct XlsxTableWriter;

impl XlsxTableWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write_workbook(&self, path: &Path, rows: &[TranscriptRow]) -> Result<(), XlsxError> {
        let sheet = build_sheet_xml(rows)?;

        let file = File::create(path).map_err(|e| XlsxError::Create {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut zip = ZipWriter::new(file);
        let options = SimpleFileOptions::default();

        let parts: [(&str, &[u8]); 6] = [
            ("[Content_Types].xml", CONTENT_TYPES.as_bytes()),
            ("_rels/.rels", ROOT_RELS.as_bytes()),
            ("xl/workbook.xml", WORKBOOK.as_bytes()),
            ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS.as_bytes()),
            ("xl/styles.xml", STYLES.as_bytes()),
            ("xl/worksheets/sheet1.xml", sheet.as_slice()),
        ];
        for (name, contents) in parts {
            zip.start_file(name, options).map_err(|e| XlsxError::Archive {
                path: path.to_path_buf(),
                source: e,
            })?;
            zip.write_all(contents).map_err(|e| XlsxError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;
        }
        zip.finish().map_err(|e| XlsxError::Archive {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(())
    }
}

impl Default for XlsxTableWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl TableSink for XlsxTableWriter {
    fn write(&self, path: &Path, rows: &[TranscriptRow]) -> Result<(), Box<dyn std::error::Error>> {
        Ok(self.write_workbook(path, rows)?)
    }
}

type SheetWriter = XmlWriter<Cursor<Vec<u8>>>;

fn build_sheet_xml(rows: &[TranscriptRow]) -> Result<Vec<u8>, quick_xml::Error> {
    let mut w = XmlWriter::new(Cursor::new(Vec::new()));
    w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;

    let mut worksheet = BytesStart::new("worksheet");
    worksheet.push_attribute(("xmlns", SPREADSHEET_NS));
    w.write_event(Event::Start(worksheet))?;

    write_columns(&mut w)?;

    w.write_event(Event::Start(BytesStart::new("sheetData")))?;

    start_row(&mut w, schema::FAMILY_ID_ROW)?;
    write_inline_cell(
        &mut w,
        0,
        schema::FAMILY_ID_ROW,
        Some(STYLE_LABEL),
        schema::FAMILY_ID_LABEL,
    )?;
    end_row(&mut w)?;

    start_row(&mut w, schema::FILE_NAME_ROW)?;
    write_inline_cell(
        &mut w,
        0,
        schema::FILE_NAME_ROW,
        Some(STYLE_LABEL),
        schema::FILE_NAME_LABEL,
    )?;
    end_row(&mut w)?;

    start_row(&mut w, schema::CODE_ROW)?;
    write_inline_cell(
        &mut w,
        schema::CODE_FIRST_COLUMN,
        schema::CODE_ROW,
        Some(STYLE_CENTERED_LABEL),
        schema::CODE_LABEL,
    )?;
    end_row(&mut w)?;

    start_row(&mut w, schema::HEADER_ROW)?;
    for (column, label) in schema::HEADER_LABELS.iter().enumerate() {
        write_inline_cell(&mut w, column, schema::HEADER_ROW, Some(STYLE_LABEL), label)?;
    }
    end_row(&mut w)?;

    for (index, row) in rows.iter().enumerate() {
        let sheet_row = schema::FIRST_DATA_ROW + index;
        start_row(&mut w, sheet_row)?;
        if let Some(time) = &row.time {
            write_inline_cell(&mut w, schema::TIME, sheet_row, None, time)?;
        }
        write_number_cell(&mut w, schema::TALK_TURN, sheet_row, row.talk_turn)?;
        write_number_cell(&mut w, schema::SEGMENT, sheet_row, row.segment)?;
        write_inline_cell(&mut w, schema::SPEAKER, sheet_row, None, &row.speaker)?;
        write_inline_cell(&mut w, schema::TEXT, sheet_row, None, &row.text)?;
        end_row(&mut w)?;
    }

    w.write_event(Event::End(BytesEnd::new("sheetData")))?;

    let code_span = format!(
        "{}:{}",
        cell_ref(schema::CODE_FIRST_COLUMN, schema::CODE_ROW),
        cell_ref(schema::CODE_LAST_COLUMN, schema::CODE_ROW)
    );
    let mut merge_cells = BytesStart::new("mergeCells");
    merge_cells.push_attribute(("count", "1"));
    w.write_event(Event::Start(merge_cells))?;
    let mut merge_cell = BytesStart::new("mergeCell");
    merge_cell.push_attribute(("ref", code_span.as_str()));
    w.write_event(Event::Empty(merge_cell))?;
    w.write_event(Event::End(BytesEnd::new("mergeCells")))?;

    w.write_event(Event::End(BytesEnd::new("worksheet")))?;
    Ok(w.into_inner().into_inner())
}

fn write_columns(w: &mut SheetWriter) -> Result<(), quick_xml::Error> {
    w.write_event(Event::Start(BytesStart::new("cols")))?;
    for (index, units) in schema::COLUMN_WIDTHS.iter().enumerate() {
        let number = (index + 1).to_string();
        // Widths are stored in 1/256-character units; the sheet wants characters.
        let width = format!("{:.2}", f64::from(*units) / 256.0);
        let mut col = BytesStart::new("col");
        col.push_attribute(("min", number.as_str()));
        col.push_attribute(("max", number.as_str()));
        col.push_attribute(("width", width.as_str()));
        col.push_attribute(("customWidth", "1"));
        w.write_event(Event::Empty(col))?;
    }
    w.write_event(Event::End(BytesEnd::new("cols")))?;
    Ok(())
}

fn start_row(w: &mut SheetWriter, row: usize) -> Result<(), quick_xml::Error> {
    let number = (row + 1).to_string();
    let mut el = BytesStart::new("row");
    el.push_attribute(("r", number.as_str()));
    w.write_event(Event::Start(el))
}

fn end_row(w: &mut SheetWriter) -> Result<(), quick_xml::Error> {
    w.write_event(Event::End(BytesEnd::new("row")))
}

fn write_inline_cell(
    w: &mut SheetWriter,
    column: usize,
    row: usize,
    style: Option<u32>,
    text: &str,
) -> Result<(), quick_xml::Error> {
    let reference = cell_ref(column, row);
    let mut c = BytesStart::new("c");
    c.push_attribute(("r", reference.as_str()));
    if let Some(style) = style {
        let style = style.to_string();
        c.push_attribute(("s", style.as_str()));
    }
    c.push_attribute(("t", "inlineStr"));
    w.write_event(Event::Start(c))?;
    w.write_event(Event::Start(BytesStart::new("is")))?;
    w.write_event(Event::Start(BytesStart::new("t")))?;
    w.write_event(Event::Text(BytesText::new(text)))?;
    w.write_event(Event::End(BytesEnd::new("t")))?;
    w.write_event(Event::End(BytesEnd::new("is")))?;
    w.write_event(Event::End(BytesEnd::new("c")))?;
    Ok(())
}

fn write_number_cell(
    w: &mut SheetWriter,
    column: usize,
    row: usize,
    value: u32,
) -> Result<(), quick_xml::Error> {
    let reference = cell_ref(column, row);
    let mut c = BytesStart::new("c");
    c.push_attribute(("r", reference.as_str()));
    w.write_event(Event::Start(c))?;
    w.write_event(Event::Start(BytesStart::new("v")))?;
    w.write_event(Event::Text(BytesText::new(&value.to_string())))?;
    w.write_event(Event::End(BytesEnd::new("v")))?;
    w.write_event(Event::End(BytesEnd::new("c")))?;
    Ok(())
}

/// `A1`-style reference for a 0-based column/row pair.
fn cell_ref(column: usize, row: usize) -> String {
    let mut letters = String::new();
    let mut c = column;
    loop {
        letters.insert(0, (b'A' + (c % 26) as u8) as char);
        if c < 26 {
            break;
        }
        c = c / 26 - 1;
    }
    format!("{letters}{}", row + 1)
}
