use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use xdeb_sync::{Feedback, FeedbackSink, PackageListManifest, Synchronizer};
use xdeb_sync_http::HttpFetcher;

/// Sink printing every feedback item to stderr.
pub fn stderr_sink() -> Arc<dyn FeedbackSink> {
    Arc::new(|feedback: Feedback| eprintln!("{feedback}"))
}

/// Sync the requested providers (all when empty) below `root`.
pub async fn run(
    client: &reqwest::Client,
    manifest: &PackageListManifest,
    root: &Path,
    providers: &[String],
    feedback: Arc<dyn FeedbackSink>,
) -> Result<()> {
    let synchronizer = Synchronizer::new(root, Arc::new(HttpFetcher::new(client.clone())))
        .with_feedback(feedback);

    let report = synchronizer.run(manifest, providers).await?;

    println!(
        "Synced {} repositories ({} skipped) into {}.",
        report.written.len(),
        report.skipped,
        root.display()
    );

    Ok(())
}
