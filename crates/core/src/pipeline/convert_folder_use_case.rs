use std::fs;
use std::path::Path;

use crate::document::infrastructure::document_scanner::discover_documents;
use crate::pipeline::folder_executor::{ConversionJob, FolderConfig, FolderExecutor, FolderSummary};
use crate::shared::constants::TABLE_EXTENSION;
use crate::transcript::domain::ignore_list::IgnoreList;

/// Batch pipeline: discover documents, derive output names, delegate the
/// jobs to an executor.
pub struct ConvertFolderUseCase {
    executor: Box<dyn FolderExecutor>,
}

impl ConvertFolderUseCase {
    pub fn new(executor: Box<dyn FolderExecutor>) -> Self {
        Self { executor }
    }

    /// Converts every document in `input_dir` into `output_dir`, creating
    /// the output directory when missing. Each output keeps its document's
    /// file stem with the table extension.
    pub fn execute(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        ignore_list: &IgnoreList,
        config: FolderConfig,
    ) -> Result<FolderSummary, Box<dyn std::error::Error>> {
        let documents = discover_documents(input_dir)?;
        fs::create_dir_all(output_dir)?;

        let jobs: Vec<ConversionJob> = documents
            .into_iter()
            .filter_map(|input| {
                let renamed = input.with_extension(TABLE_EXTENSION);
                let name = renamed.file_name()?.to_owned();
                Some(ConversionJob {
                    output: output_dir.join(name),
                    input,
                })
            })
            .collect();

        log::info!(
            "converting {} documents from {} to {}",
            jobs.len(),
            input_dir.display(),
            output_dir.display()
        );
        self.executor.execute(jobs, ignore_list, config)
    }
}
