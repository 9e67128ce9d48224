use std::path::Path;

use xdeb_sync::compression;
use xdeb_sync::{FetchOutcome, JobFetcher, SyncError, SyncJob};

use crate::apt::{IndexResponse, fetch_index};
use crate::download::fetch_file;

/// Fetches sync jobs over HTTP.
///
/// APT-style providers are looked up with format fallback, decompressed and
/// parsed. Custom providers are downloaded verbatim into the job directory
/// and stored with the local codec.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn fetch_apt(&self, job: &SyncJob) -> Result<FetchOutcome, SyncError> {
        let (body, format, url) = match fetch_index(&self.client, &job.index_url()).await? {
            IndexResponse::Found { body, format, url } => (body, format, url),
            IndexResponse::NotFound => return Ok(FetchOutcome::NotFound),
        };

        let raw = compression::decompress_remote(body.as_slice(), format).map_err(|source| {
            SyncError::Decode {
                url: url.clone(),
                source,
            }
        })?;

        let text = String::from_utf8(raw)
            .map_err(|e| SyncError::Network(format!("index at {url} is not valid UTF-8: {e}")))?;

        let entries = xdeb_sync::parse_index(job.base_url(), &text)
            .map_err(|source| SyncError::Index { url, source })?;

        Ok(FetchOutcome::Index(entries))
    }
}

#[async_trait::async_trait]
impl JobFetcher for HttpFetcher {
    async fn fetch(&self, job: &SyncJob, directory: &Path) -> Result<FetchOutcome, SyncError> {
        if job.provider().custom {
            let path = fetch_file(&self.client, directory, &job.custom_url(), false, true).await?;
            return Ok(FetchOutcome::Downloaded(path));
        }

        self.fetch_apt(job).await
    }
}
