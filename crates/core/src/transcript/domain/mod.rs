pub mod ignore_list;
pub mod transcript_row;
pub mod turn_parser;
