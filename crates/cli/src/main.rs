use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use turnscribe_core::pipeline::convert_folder_use_case::ConvertFolderUseCase;
use turnscribe_core::pipeline::folder_executor::{FolderConfig, FolderSummary};
use turnscribe_core::pipeline::infrastructure::threaded_folder_executor::ThreadedFolderExecutor;
use turnscribe_core::shared::constants::RESULT_FOLDER_SUFFIX;
use turnscribe_core::transcript::infrastructure::text_ignore_store::TextIgnoreStore;

/// Transcript-to-coding-table conversion for interview documents.
#[derive(Parser)]
#[command(name = "turnscribe")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert every .docx transcript in a folder into .xlsx coding tables.
    Convert {
        /// Folder containing the transcript documents.
        input: PathBuf,

        /// Destination folder (default: a sibling "<input> Result" folder).
        output: Option<PathBuf>,

        /// Ignore-word file (default: the per-user config location).
        #[arg(long)]
        ignore_words: Option<PathBuf>,

        /// Number of documents to convert in parallel (default: CPU count).
        #[arg(long)]
        jobs: Option<usize>,
    },

    /// Manage the ignore-word list.
    Words {
        #[command(subcommand)]
        action: WordsAction,

        /// Ignore-word file (default: the per-user config location).
        #[arg(long)]
        ignore_words: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum WordsAction {
    /// Print the ignored words, one per line.
    List,
    /// Append a word or phrase.
    Add { word: String },
    /// Remove the first exact match of a word.
    Remove { word: String },
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    match Cli::parse().command {
        Command::Convert {
            input,
            output,
            ignore_words,
            jobs,
        } => run_convert(input, output, ignore_words, jobs),
        Command::Words {
            action,
            ignore_words,
        } => run_words(action, ignore_words),
    }
}

fn run_convert(
    input: PathBuf,
    output: Option<PathBuf>,
    ignore_words: Option<PathBuf>,
    jobs: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    if !input.is_dir() {
        return Err(format!("Input folder not found: {}", input.display()).into());
    }
    if jobs == Some(0) {
        return Err("--jobs must be at least 1".into());
    }
    let output = output.unwrap_or_else(|| default_output_dir(&input));

    let ignore_list = open_store(ignore_words)?.load_or_default();

    let executor = match jobs {
        Some(n) => ThreadedFolderExecutor::with_workers(n),
        None => ThreadedFolderExecutor::new(),
    };
    let progress: Box<dyn Fn(usize, usize) -> bool + Send> = Box::new(|done, total| {
        eprint!("\rConverting document {done}/{total}");
        true
    });
    let config = FolderConfig {
        on_progress: Some(progress),
        ..FolderConfig::default()
    };

    let use_case = ConvertFolderUseCase::new(Box::new(executor));
    let summary = use_case.execute(&input, &output, &ignore_list, config)?;
    eprintln!();

    report(&summary, &output)
}

fn report(summary: &FolderSummary, output: &Path) -> Result<(), Box<dyn std::error::Error>> {
    for (path, reason) in &summary.failed {
        eprintln!("Failed: {}: {reason}", path.display());
    }
    let total = summary.converted.len() + summary.failed.len();
    if total == 0 {
        println!("No transcript documents found.");
        return Ok(());
    }
    if summary.converted.is_empty() {
        return Err("no documents were converted".into());
    }
    println!(
        "Converted {}/{} documents into {}",
        summary.converted.len(),
        total,
        output.display()
    );
    Ok(())
}

fn run_words(
    action: WordsAction,
    ignore_words: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(ignore_words)?;
    match action {
        WordsAction::List => {
            for word in store.load_or_default().entries() {
                println!("{word}");
            }
        }
        WordsAction::Add { word } => {
            let word = word.trim().to_string();
            if word.is_empty() {
                return Err("cannot add an empty word".into());
            }
            let mut list = store.load_or_default();
            list.add(word);
            store.save(&list)?;
            log::info!("ignore list written to {}", store.path().display());
        }
        WordsAction::Remove { word } => {
            let mut list = store.load_or_default();
            if !list.remove(&word) {
                return Err(format!("'{word}' is not in the ignore list").into());
            }
            store.save(&list)?;
        }
    }
    Ok(())
}

fn open_store(path: Option<PathBuf>) -> Result<TextIgnoreStore, Box<dyn std::error::Error>> {
    Ok(match path {
        Some(path) => TextIgnoreStore::new(path),
        None => TextIgnoreStore::at_default_path()?,
    })
}

/// Mirrors the desktop tool's convention: results land next to the input
/// folder in "<name> Result" unless an explicit destination is given.
fn default_output_dir(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "transcripts".to_string());
    input.with_file_name(format!("{name}{RESULT_FOLDER_SUFFIX}"))
}
