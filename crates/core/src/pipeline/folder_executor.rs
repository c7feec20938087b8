use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::transcript::domain::ignore_list::IgnoreList;

/// One document conversion: where to read and where to write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversionJob {
    pub input: PathBuf,
    pub output: PathBuf,
}

/// Configuration for a batch run.
pub struct FolderConfig {
    /// Called after each finished document with `(done, total)`; return
    /// `false` to cancel the rest of the batch.
    pub on_progress: Option<Box<dyn Fn(usize, usize) -> bool + Send>>,
    pub cancelled: Arc<AtomicBool>,
}

impl Default for FolderConfig {
    fn default() -> Self {
        Self {
            on_progress: None,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }
}

/// Outcome of a batch run. Per-document failures land here instead of
/// aborting the remaining documents.
#[derive(Debug, Default)]
pub struct FolderSummary {
    pub converted: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

/// Abstracts how a batch of conversion jobs is executed.
///
/// This is a port (application-layer interface). Infrastructure provides
/// concrete implementations (e.g. a worker pool).
pub trait FolderExecutor: Send {
    /// Runs every job against the shared read-only ignore-list snapshot.
    fn execute(
        &self,
        jobs: Vec<ConversionJob>,
        ignore_list: &IgnoreList,
        config: FolderConfig,
    ) -> Result<FolderSummary, Box<dyn std::error::Error>>;
}
