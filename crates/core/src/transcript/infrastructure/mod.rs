pub mod text_ignore_store;
