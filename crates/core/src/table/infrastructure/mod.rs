pub mod xlsx_table_writer;
