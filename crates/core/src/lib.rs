pub mod document;
pub mod pipeline;
pub mod shared;
pub mod table;
pub mod transcript;
