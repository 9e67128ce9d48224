use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::job::SyncJob;
use crate::snapshot::PackageEntry;
use crate::sync::SyncError;

/// What a single job produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// An APT index was found and parsed. May be empty.
    Index(Vec<PackageEntry>),
    /// A custom provider's file was stored at the given path.
    Downloaded(PathBuf),
    /// The remote has nothing for this job in any supported format.
    NotFound,
}

/// Retrieves the remote content for one [`SyncJob`].
///
/// Implementations pick the strategy from the job's provider: APT-style
/// providers return [`FetchOutcome::Index`] and leave persistence to the
/// caller, custom providers store their payload under `directory` and
/// return [`FetchOutcome::Downloaded`].
#[async_trait::async_trait]
pub trait JobFetcher: Send + Sync {
    async fn fetch(&self, job: &SyncJob, directory: &Path) -> Result<FetchOutcome, SyncError>;
}

#[async_trait::async_trait]
impl<T: JobFetcher + ?Sized> JobFetcher for Arc<T> {
    async fn fetch(&self, job: &SyncJob, directory: &Path) -> Result<FetchOutcome, SyncError> {
        (**self).fetch(job, directory).await
    }
}
