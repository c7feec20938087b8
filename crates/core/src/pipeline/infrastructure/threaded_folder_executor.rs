use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crate::document::infrastructure::docx_paragraph_source::DocxParagraphSource;
use crate::pipeline::convert_document_use_case::ConvertDocumentUseCase;
use crate::pipeline::folder_executor::{
    ConversionJob, FolderConfig, FolderExecutor, FolderSummary,
};
use crate::table::infrastructure::xlsx_table_writer::XlsxTableWriter;
use crate::transcript::domain::ignore_list::IgnoreList;

/// Executes conversion jobs on a worker pool.
///
/// Documents are independent (each worker runs its own parser over its own
/// document), so they can convert concurrently; only the ignore-list
/// snapshot is shared, read-only. Per-document failures are collected into
/// the summary, never aborting the rest of the batch.
pub struct ThreadedFolderExecutor {
    workers: usize,
}

impl ThreadedFolderExecutor {
    pub fn new() -> Self {
        Self {
            workers: thread::available_parallelism().map_or(1, |n| n.get()),
        }
    }

    pub fn with_workers(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }
}

impl Default for ThreadedFolderExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl FolderExecutor for ThreadedFolderExecutor {
    fn execute(
        &self,
        jobs: Vec<ConversionJob>,
        ignore_list: &IgnoreList,
        config: FolderConfig,
    ) -> Result<FolderSummary, Box<dyn std::error::Error>> {
        let total = jobs.len();
        if total == 0 {
            return Ok(FolderSummary::default());
        }
        let workers = self.workers.min(total);

        let (job_tx, job_rx) = crossbeam_channel::unbounded::<ConversionJob>();
        let (result_tx, result_rx) =
            crossbeam_channel::unbounded::<(PathBuf, Result<usize, String>)>();

        for job in jobs {
            // Receiver outlives all sends; an unbounded send cannot fail here.
            let _ = job_tx.send(job);
        }
        drop(job_tx);

        let mut handles = Vec::with_capacity(workers);
        for _ in 0..workers {
            handles.push(spawn_worker(
                job_rx.clone(),
                result_tx.clone(),
                ignore_list.clone(),
                config.cancelled.clone(),
            ));
        }
        drop(result_tx);

        let mut summary = FolderSummary::default();
        let mut done = 0usize;
        for (input, outcome) in result_rx {
            done += 1;
            match outcome {
                Ok(rows) => {
                    log::info!("{}: wrote {rows} rows", input.display());
                    summary.converted.push(input);
                }
                Err(reason) => {
                    log::error!("{}: {reason}", input.display());
                    summary.failed.push((input, reason));
                }
            }
            if let Some(ref callback) = config.on_progress {
                if !callback(done, total) {
                    config.cancelled.store(true, Ordering::Relaxed);
                }
            }
        }

        let mut panicked = false;
        for handle in handles {
            panicked |= handle.join().is_err();
        }
        if panicked {
            return Err("conversion worker panicked".into());
        }

        // Workers finish in arbitrary order.
        summary.converted.sort();
        summary.failed.sort();
        Ok(summary)
    }
}

fn spawn_worker(
    job_rx: crossbeam_channel::Receiver<ConversionJob>,
    result_tx: crossbeam_channel::Sender<(PathBuf, Result<usize, String>)>,
    ignore_list: IgnoreList,
    cancelled: Arc<AtomicBool>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        for job in job_rx {
            if cancelled.load(Ordering::Relaxed) {
                break;
            }
            let use_case = ConvertDocumentUseCase::new(
                Box::new(DocxParagraphSource::new()),
                Box::new(XlsxTableWriter::new()),
                ignore_list.clone(),
            );
            let outcome = use_case
                .execute(&job.input, &job.output)
                .map_err(|e| e.to_string());
            if result_tx.send((job.input, outcome)).is_err() {
                break;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;
    use std::path::Path;
    use std::sync::Mutex;
    use tempfile::TempDir;

    fn write_docx(path: &Path, paragraphs: &[&str]) {
        let file = fs::File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        zip.start_file(
            "word/document.xml",
            zip::write::SimpleFileOptions::default(),
        )
        .unwrap();
        let body: String = paragraphs
            .iter()
            .map(|p| format!("<w:p><w:r><w:t>{p}</w:t></w:r></w:p>"))
            .collect();
        let xml = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
             <w:body>{body}</w:body></w:document>"
        );
        zip.write_all(xml.as_bytes()).unwrap();
        zip.finish().unwrap();
    }

    fn job(tmp: &TempDir, name: &str) -> ConversionJob {
        ConversionJob {
            input: tmp.path().join(format!("{name}.docx")),
            output: tmp.path().join(format!("{name}.xlsx")),
        }
    }

    #[test]
    fn test_converts_a_folder_end_to_end() {
        let tmp = TempDir::new().unwrap();
        write_docx(&tmp.path().join("a.docx"), &["Mom: hello [14:02]"]);
        write_docx(&tmp.path().join("b.docx"), &["Dad: hi there"]);
        let jobs = vec![job(&tmp, "a"), job(&tmp, "b")];

        let summary = ThreadedFolderExecutor::with_workers(2)
            .execute(jobs, &IgnoreList::new(), FolderConfig::default())
            .unwrap();

        assert_eq!(summary.converted.len(), 2);
        assert!(summary.failed.is_empty());
        assert!(tmp.path().join("a.xlsx").exists());
        assert!(tmp.path().join("b.xlsx").exists());
    }

    #[test]
    fn test_bad_document_fails_alone() {
        let tmp = TempDir::new().unwrap();
        write_docx(&tmp.path().join("good.docx"), &["Mom: hello"]);
        fs::write(tmp.path().join("bad.docx"), b"not a zip archive").unwrap();
        let jobs = vec![job(&tmp, "bad"), job(&tmp, "good")];

        let summary = ThreadedFolderExecutor::with_workers(2)
            .execute(jobs, &IgnoreList::new(), FolderConfig::default())
            .unwrap();

        assert_eq!(summary.converted, vec![tmp.path().join("good.docx")]);
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].0, tmp.path().join("bad.docx"));
        assert!(tmp.path().join("good.xlsx").exists());
        assert!(!tmp.path().join("bad.xlsx").exists());
    }

    #[test]
    fn test_empty_job_list_yields_empty_summary() {
        let summary = ThreadedFolderExecutor::new()
            .execute(Vec::new(), &IgnoreList::new(), FolderConfig::default())
            .unwrap();
        assert!(summary.converted.is_empty());
        assert!(summary.failed.is_empty());
    }

    #[test]
    fn test_pre_cancelled_run_converts_nothing() {
        let tmp = TempDir::new().unwrap();
        write_docx(&tmp.path().join("a.docx"), &["Mom: hello"]);
        let jobs = vec![job(&tmp, "a")];

        let config = FolderConfig::default();
        config.cancelled.store(true, Ordering::Relaxed);

        let summary = ThreadedFolderExecutor::with_workers(1)
            .execute(jobs, &IgnoreList::new(), config)
            .unwrap();

        assert!(summary.converted.is_empty());
        assert!(!tmp.path().join("a.xlsx").exists());
    }

    #[test]
    fn test_progress_reports_every_document() {
        let tmp = TempDir::new().unwrap();
        write_docx(&tmp.path().join("a.docx"), &["Mom: one"]);
        write_docx(&tmp.path().join("b.docx"), &["Dad: two"]);
        let jobs = vec![job(&tmp, "a"), job(&tmp, "b")];

        let calls = Arc::new(Mutex::new(Vec::new()));
        let seen = calls.clone();
        let config = FolderConfig {
            on_progress: Some(Box::new(move |done, total| {
                seen.lock().unwrap().push((done, total));
                true
            })),
            cancelled: Arc::new(AtomicBool::new(false)),
        };

        ThreadedFolderExecutor::with_workers(2)
            .execute(jobs, &IgnoreList::new(), config)
            .unwrap();

        assert_eq!(*calls.lock().unwrap(), vec![(1, 2), (2, 2)]);
    }

    #[test]
    fn test_shared_ignore_list_applies_to_every_document() {
        let tmp = TempDir::new().unwrap();
        write_docx(&tmp.path().join("a.docx"), &["Mom: so [laughs] anyway"]);
        let jobs = vec![job(&tmp, "a")];

        ThreadedFolderExecutor::with_workers(1)
            .execute(
                jobs,
                &IgnoreList::from_entries(["laughs"]),
                FolderConfig::default(),
            )
            .unwrap();

        // Spot-check the produced sheet: the annotation must be gone.
        let file = fs::File::open(tmp.path().join("a.xlsx")).unwrap();
        let mut archive = zip::ZipArchive::new(file).unwrap();
        let mut sheet = String::new();
        std::io::Read::read_to_string(
            &mut archive.by_name("xl/worksheets/sheet1.xml").unwrap(),
            &mut sheet,
        )
        .unwrap();
        assert!(sheet.contains("so  anyway"));
        assert!(!sheet.contains("laughs"));
    }
}
