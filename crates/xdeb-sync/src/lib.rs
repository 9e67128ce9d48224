pub mod compression;
pub mod feedback;
pub mod fetch;
pub mod index;
pub mod job;
pub mod provider;
pub mod snapshot;
pub mod sync;

pub use compression::{CompressionError, RemoteFormat};
pub use feedback::{Feedback, FeedbackSink, Silent};
pub use fetch::{FetchOutcome, JobFetcher};
pub use index::{IndexError, parse as parse_index};
pub use job::SyncJob;
pub use provider::{ManifestError, PackageListManifest, ProviderDefinition, ResolveError};
pub use snapshot::{PackageEntry, RepositorySnapshot, SnapshotError};
pub use sync::{SyncError, SyncReport, Synchronizer};

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
