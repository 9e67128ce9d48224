use xdeb_sync::{RemoteFormat, SyncError};

/// Index variants tried in order until one answers with a success status.
pub const CANDIDATES: [RemoteFormat; 3] =
    [RemoteFormat::Plain, RemoteFormat::Xz, RemoteFormat::Gzip];

/// Result of looking up an APT index in every supported format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexResponse {
    Found {
        body: Vec<u8>,
        /// Format of the resource actually served, after redirects.
        format: RemoteFormat,
        /// Final URL of the response.
        url: String,
    },
    /// None of the candidates exist. Not an error.
    NotFound,
}

/// Fetch the index at `index_url`, falling back to its `.xz` then `.gz`
/// variant whenever the server answers with a non-success status.
///
/// The format is taken from the path of the final response, since mirrors
/// may redirect a request to a resource with a different suffix. Transport
/// errors abort immediately.
pub async fn fetch_index(
    client: &reqwest::Client,
    index_url: &str,
) -> Result<IndexResponse, SyncError> {
    for candidate in CANDIDATES {
        let url = format!("{index_url}{}", candidate.suffix());

        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| SyncError::Network(format!("could not fetch {url}: {e}")))?;

        if !response.status().is_success() {
            continue;
        }

        let resolved = response.url().clone();
        let format = RemoteFormat::from_path(resolved.path()).map_err(|source| {
            SyncError::Decode {
                url: resolved.to_string(),
                source,
            }
        })?;

        let body = response
            .bytes()
            .await
            .map_err(|e| SyncError::Network(format!("failed to read body of {resolved}: {e}")))?;

        return Ok(IndexResponse::Found {
            body: body.to_vec(),
            format,
            url: resolved.to_string(),
        });
    }

    Ok(IndexResponse::NotFound)
}
