use std::fs;
use std::path::Path;

use xdeb_sync::compression;
use xdeb_sync::{Feedback, FeedbackSink, PackageListManifest, SyncError};

use crate::download::fetch_file;

/// `<base>/<tag>/<arch>`
pub fn manifest_url(base: &str, tag: &str, arch: &str) -> String {
    format!("{}/{tag}/{arch}", base.trim_end_matches('/'))
}

/// Download the providers manifest into `cache_dir` and parse it.
///
/// The manifest is cached with the local codec, named after the final URL,
/// then read back from disk.
pub async fn load_manifest(
    client: &reqwest::Client,
    cache_dir: &Path,
    url: &str,
    feedback: &dyn FeedbackSink,
) -> Result<PackageListManifest, SyncError> {
    feedback.emit(Feedback::info(format!("Syncing lists: {url}")));

    let path = fetch_file(client, cache_dir, url, true, true).await?;

    let bytes = fs::read(&path)
        .map_err(|e| SyncError::Io(format!("could not read {}: {e}", path.display())))?;

    let yaml = compression::decompress(bytes.as_slice()).map_err(|source| SyncError::Decode {
        url: path.display().to_string(),
        source,
    })?;

    Ok(PackageListManifest::from_yaml(&yaml)?)
}
