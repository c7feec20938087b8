/// Extension of the transcript documents a batch run picks up.
pub const DOCUMENT_EXTENSION: &str = "docx";

/// Extension of the generated coding tables.
pub const TABLE_EXTENSION: &str = "xlsx";

/// Suffix appended to the input folder's name when no output folder is given.
pub const RESULT_FOLDER_SUFFIX: &str = " Result";
