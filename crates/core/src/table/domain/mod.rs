pub mod sheet_schema;
pub mod table_sink;
