use std::path::Path;

use crate::transcript::domain::transcript_row::TranscriptRow;

/// Persists one document's rows as a coding table.
pub trait TableSink: Send {
    /// Writes all rows, in emission order, to one artifact at `path`.
    fn write(&self, path: &Path, rows: &[TranscriptRow]) -> Result<(), Box<dyn std::error::Error>>;
}
