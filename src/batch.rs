//! Batch conversion of every spreadsheet in a directory
//!
//! Each file is converted on its own blocking task. Failures are captured per
//! file in the [`BatchReport`]; only directory-level setup errors fail the
//! batch itself.

use crate::config::ImpexConfig;
use crate::converter::{ConvertOutcome, FileConverter};
use crate::error::{ImpexError, ImpexResult, NOT_DIRECTORY};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::{Id, JoinSet};
use tracing::{error, info, warn};

/// Outcome for one source file
#[derive(Debug)]
pub struct FileReport {
    pub source: PathBuf,
    pub result: ImpexResult<ConvertOutcome>,
}

impl FileReport {
    pub fn file_name(&self) -> String {
        self.source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source.display().to_string())
    }
}

#[derive(Debug)]
pub struct BatchReport {
    pub target_dir: PathBuf,
    /// One report per candidate file, sorted by source path
    pub files: Vec<FileReport>,
}

impl BatchReport {
    pub fn converted(&self) -> usize {
        self.count(|r| matches!(r, Ok(ConvertOutcome::Written { .. })))
    }

    /// Files without qualifying key rows
    pub fn skipped(&self) -> usize {
        self.count(|r| matches!(r, Ok(ConvertOutcome::NoKeys)))
    }

    pub fn failed(&self) -> usize {
        self.count(Result::is_err)
    }

    pub fn failures(&self) -> impl Iterator<Item = (&FileReport, &ImpexError)> {
        self.files
            .iter()
            .filter_map(|f| f.result.as_ref().err().map(|e| (f, e)))
    }

    fn count(&self, pred: impl Fn(&ImpexResult<ConvertOutcome>) -> bool) -> usize {
        self.files.iter().filter(|f| pred(&f.result)).count()
    }
}

/// Converts every eligible spreadsheet directly inside a directory
pub struct BatchConverter {
    source_dir: PathBuf,
    config: ImpexConfig,
}

impl BatchConverter {
    /// Fails with [`ImpexError::InvalidPath`] unless `source_dir` is a directory
    pub fn new<P: AsRef<Path>>(source_dir: P, config: ImpexConfig) -> ImpexResult<Self> {
        let source_dir = source_dir.as_ref().to_path_buf();
        if !source_dir.is_dir() {
            return Err(ImpexError::InvalidPath {
                path: source_dir,
                reason: NOT_DIRECTORY,
            });
        }
        config.validate()?;
        Ok(Self { source_dir, config })
    }

    pub fn target_dir(&self) -> PathBuf {
        self.source_dir.join(&self.config.target_dir_name)
    }

    /// Direct children that are regular spreadsheet files, by name
    pub fn candidates(&self) -> ImpexResult<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.source_dir)? {
            let path = entry?.path();
            if path.is_file() && self.config.is_spreadsheet(&path) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Create the target directory, then convert all candidates concurrently
    /// and wait for every task.
    pub async fn run(&self) -> ImpexResult<BatchReport> {
        let target_dir = self.target_dir();
        fs::create_dir(&target_dir).map_err(|e| match e.kind() {
            ErrorKind::AlreadyExists => ImpexError::SetupConflict(target_dir.clone()),
            _ => ImpexError::Io(e),
        })?;

        let candidates = self.candidates()?;
        let workers = self.config.workers();
        info!(
            dir = %self.source_dir.display(),
            files = candidates.len(),
            workers,
            "starting batch conversion"
        );

        let semaphore = Arc::new(Semaphore::new(workers));
        let mut tasks = JoinSet::new();
        let mut sources = HashMap::new();
        for source in candidates {
            let semaphore = Arc::clone(&semaphore);
            let target_dir = target_dir.clone();
            let options = self.config.convert_options();
            let limit = self.config.task_timeout();
            let task_source = source.clone();
            let handle = tasks.spawn(async move {
                let source = task_source;
                let result = async {
                    let _permit = semaphore.acquire_owned().await.map_err(|e| ImpexError::Task {
                        file: source.clone(),
                        message: e.to_string(),
                    })?;
                    let converter = FileConverter::new(&source)?.with_options(options);
                    convert_with_timeout(converter, target_dir, limit).await
                }
                .await;
                FileReport { source, result }
            });
            sources.insert(handle.id(), source);
        }

        let files = join_reports(tasks, sources).await;
        let report = BatchReport { target_dir, files };
        info!(
            converted = report.converted(),
            skipped = report.skipped(),
            failed = report.failed(),
            "batch conversion finished"
        );
        Ok(report)
    }

    /// [`run`](Self::run) on a dedicated multi-thread runtime
    pub fn run_blocking(&self) -> ImpexResult<BatchReport> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        runtime.block_on(self.run())
    }
}

/// Drain `tasks` into one report per spawned file, sorted by source path.
///
/// A task that fails to join is reported as [`ImpexError::Task`] against the
/// source recorded for its id.
async fn join_reports(
    mut tasks: JoinSet<FileReport>,
    mut sources: HashMap<Id, PathBuf>,
) -> Vec<FileReport> {
    let mut files = Vec::new();
    while let Some(joined) = tasks.join_next_with_id().await {
        let report = match joined {
            Ok((id, report)) => {
                sources.remove(&id);
                report
            }
            Err(e) => {
                let source = sources.remove(&e.id()).unwrap_or_default();
                FileReport {
                    result: Err(ImpexError::Task {
                        file: source.clone(),
                        message: e.to_string(),
                    }),
                    source,
                }
            }
        };
        if let Err(e) = &report.result {
            error!(file = %report.file_name(), error = %e, "conversion failed");
        }
        files.push(report);
    }
    files.sort_by(|a, b| a.source.cmp(&b.source));
    files
}

/// Run one conversion on the blocking pool, bounded by `limit`.
///
/// On timeout the conversion is asked to stop at its next row and still
/// awaited, so it never outlives the batch. The flag is only read between
/// sheet rows: a timeout that fires while the workbook is still being parsed
/// takes effect once parsing finishes, so `limit` does not cap wall time.
async fn convert_with_timeout(
    converter: FileConverter,
    target_dir: PathBuf,
    limit: Duration,
) -> ImpexResult<ConvertOutcome> {
    let source = converter.source().to_path_buf();
    let cancel = Arc::new(AtomicBool::new(false));
    let converter = converter.with_cancel_flag(Arc::clone(&cancel));
    let mut handle = tokio::task::spawn_blocking(move || converter.convert_into(&target_dir));

    let task_failed = |e: tokio::task::JoinError| ImpexError::Task {
        file: source.clone(),
        message: e.to_string(),
    };

    match tokio::time::timeout(limit, &mut handle).await {
        Ok(joined) => joined.map_err(task_failed)?,
        Err(_) => {
            warn!(file = %source.display(), seconds = limit.as_secs(), "conversion timed out, cancelling");
            cancel.store(true, Ordering::Relaxed);
            match handle.await.map_err(task_failed)? {
                Err(ImpexError::Cancelled) => Err(ImpexError::Timeout {
                    file: source.clone(),
                    seconds: limit.as_secs(),
                }),
                finished => finished,
            }
        }
    }
}
