use std::fs;
use std::path::{Path, PathBuf};

use reqwest::Url;
use xdeb_sync::compression::{self, COMPRESSED_EXTENSION};
use xdeb_sync::SyncError;

/// Download `url` into `directory` with a single GET.
///
/// The file is named after the last path segment of the requested URL, or
/// of the final URL after redirects when `follow_redirects` is set. With
/// `compress`, the body is stored with the local codec and `.zst` is
/// appended to the name. Any non-success status is an error.
pub async fn fetch_file(
    client: &reqwest::Client,
    directory: &Path,
    url: &str,
    follow_redirects: bool,
    compress: bool,
) -> Result<PathBuf, SyncError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| SyncError::Network(format!("could not download {url}: {e}")))?;

    if !response.status().is_success() {
        return Err(SyncError::Network(format!(
            "could not download {url}: HTTP {}",
            response.status()
        )));
    }

    let name_url = if follow_redirects {
        response.url().clone()
    } else {
        Url::parse(url).map_err(|e| SyncError::Network(format!("invalid URL {url}: {e}")))?
    };
    let file_name = file_name_of(&name_url)
        .ok_or_else(|| SyncError::Network(format!("cannot derive a file name from {name_url}")))?;

    let body = response
        .bytes()
        .await
        .map_err(|e| SyncError::Network(format!("failed to read body of {url}: {e}")))?;

    let directory = directory.to_path_buf();
    let url = url.to_owned();

    tokio::task::spawn_blocking(move || store(&directory, &url, file_name, &body, compress))
        .await
        .map_err(|e| SyncError::Task(e.to_string()))?
}

fn store(
    directory: &Path,
    url: &str,
    file_name: String,
    body: &[u8],
    compress: bool,
) -> Result<PathBuf, SyncError> {
    let (bytes, file_name) = if compress {
        let packed = compression::compress(body)
            .map_err(|e| SyncError::Io(format!("failed to compress {url}: {e}")))?;
        (packed, format!("{file_name}.{COMPRESSED_EXTENSION}"))
    } else {
        (body.to_vec(), file_name)
    };

    fs::create_dir_all(directory)
        .map_err(|e| SyncError::Io(format!("could not create {}: {e}", directory.display())))?;

    let path = directory.join(file_name);
    fs::write(&path, bytes)
        .map_err(|e| SyncError::Io(format!("could not write {}: {e}", path.display())))?;

    Ok(path)
}

fn file_name_of(url: &Url) -> Option<String> {
    url.path_segments()?
        .filter(|segment| !segment.is_empty())
        .next_back()
        .map(|segment| segment.to_owned())
}
