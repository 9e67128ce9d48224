use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::compression::CompressionError;
use crate::feedback::{Feedback, FeedbackSink, Silent};
use crate::fetch::{FetchOutcome, JobFetcher};
use crate::index::IndexError;
use crate::job::SyncJob;
use crate::provider::{ManifestError, PackageListManifest, ProviderDefinition, ResolveError};
use crate::snapshot::{RepositorySnapshot, SnapshotError};

/// Errors that can occur during sync operations.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("network error: {0}")]
    Network(String),

    #[error("failed to decode {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: CompressionError,
    },

    #[error("failed to parse index {url}: {source}")]
    Index {
        url: String,
        #[source]
        source: IndexError,
    },

    #[error("I/O error: {0}")]
    Io(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("sync task failed: {0}")]
    Task(String),
}

impl From<SnapshotError> for SyncError {
    fn from(err: SnapshotError) -> Self {
        Self::Storage(err.to_string())
    }
}

/// Summary of a sync run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Files written, grouped by provider in sync order.
    pub written: Vec<PathBuf>,
    /// Jobs that had nothing to sync.
    pub skipped: u64,
}

impl SyncReport {
    fn absorb(&mut self, other: SyncReport) {
        self.written.extend(other.written);
        self.skipped += other.skipped;
    }
}

enum JobResult {
    Written(PathBuf),
    Skipped,
}

/// Drives a sync run: resolves providers, fans out one task per job and
/// persists the results below `root`.
///
/// Providers are processed one after another in manifest order. All jobs of
/// a provider run concurrently and are always drained, even once one of them
/// failed; the first failure then aborts the run before the next provider.
pub struct Synchronizer {
    root: PathBuf,
    fetcher: Arc<dyn JobFetcher>,
    feedback: Arc<dyn FeedbackSink>,
}

impl Synchronizer {
    pub fn new(root: impl Into<PathBuf>, fetcher: Arc<dyn JobFetcher>) -> Self {
        Self {
            root: root.into(),
            fetcher,
            feedback: Arc::new(Silent),
        }
    }

    pub fn with_feedback(mut self, feedback: Arc<dyn FeedbackSink>) -> Self {
        self.feedback = feedback;
        self
    }

    /// Sync the providers named in `requested` (all of them when empty).
    ///
    /// An unknown provider name fails before any job is dispatched.
    pub async fn run<S: AsRef<str>>(
        &self,
        manifest: &PackageListManifest,
        requested: &[S],
    ) -> Result<SyncReport, SyncError> {
        let providers = manifest.resolve(requested)?;
        let mut report = SyncReport::default();

        for provider in providers {
            let synced = self.sync_provider(Arc::new(provider.clone())).await?;
            report.absorb(synced);
        }

        Ok(report)
    }

    async fn sync_provider(
        &self,
        provider: Arc<ProviderDefinition>,
    ) -> Result<SyncReport, SyncError> {
        let jobs = ProviderDefinition::jobs(&provider);

        // Room for every job's result, so no task ever waits on the channel.
        let (tx, mut rx) = mpsc::channel(provider.job_count().max(1));

        let handles: Vec<_> = jobs
            .into_iter()
            .map(|job| {
                let tx = tx.clone();
                let root = self.root.clone();
                let fetcher = Arc::clone(&self.fetcher);
                let feedback = Arc::clone(&self.feedback);

                tokio::spawn(async move {
                    let result = run_job(&job, &root, fetcher.as_ref(), feedback.as_ref()).await;
                    let _ = tx.send(result).await;
                })
            })
            .collect();
        drop(tx);

        let mut panicked = None;
        for joined in futures::future::join_all(handles).await {
            if let Err(e) = joined {
                panicked.get_or_insert(SyncError::Task(e.to_string()));
            }
        }

        let mut report = SyncReport::default();
        let mut first_error = None;

        while let Some(result) = rx.recv().await {
            match result {
                Ok(JobResult::Written(path)) => report.written.push(path),
                Ok(JobResult::Skipped) => report.skipped += 1,
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }

        if let Some(e) = first_error.or(panicked) {
            return Err(e);
        }

        report.written.sort();
        Ok(report)
    }
}

async fn run_job(
    job: &SyncJob,
    root: &Path,
    fetcher: &dyn JobFetcher,
    feedback: &dyn FeedbackSink,
) -> Result<JobResult, SyncError> {
    if job.provider().custom {
        feedback.emit(Feedback::info(format!("Syncing repository {job}")));
    }

    match fetcher.fetch(job, &job.directory(root)).await? {
        FetchOutcome::Index(entries) if entries.is_empty() => Ok(JobResult::Skipped),
        FetchOutcome::Index(entries) => {
            feedback.emit(Feedback::info(format!("Syncing repository {job}")));

            let path = job.snapshot_path(root);
            let snapshot = RepositorySnapshot::new(entries);
            let target = path.clone();

            tokio::task::spawn_blocking(move || snapshot.write_to(&target))
                .await
                .map_err(|e| SyncError::Task(e.to_string()))??;

            Ok(JobResult::Written(path))
        }
        FetchOutcome::Downloaded(path) => Ok(JobResult::Written(path)),
        FetchOutcome::NotFound => Ok(JobResult::Skipped),
    }
}
