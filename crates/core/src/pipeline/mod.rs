pub mod convert_document_use_case;
pub mod convert_folder_use_case;
pub mod folder_executor;
pub mod infrastructure;
