pub mod paragraph_source;
