use std::time::Duration;

use xdeb_sync::SyncError;

/// User agent sent with every request.
pub const USER_AGENT: &str = "xdeb-sync";

/// Transport settings shared by every request of a sync run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientOptions {
    /// Upper bound for a whole request, body included.
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Build the HTTP client used for the manifest and every sync job.
///
/// Redirects are followed (reqwest's default policy), which the index
/// fetcher relies on to detect the format of the resolved resource.
pub fn build_client(options: ClientOptions) -> Result<reqwest::Client, SyncError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(options.timeout)
        .connect_timeout(options.connect_timeout)
        .build()
        .map_err(|e| SyncError::Network(format!("failed to build HTTP client: {e}")))
}
