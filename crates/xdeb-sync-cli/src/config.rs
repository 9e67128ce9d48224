use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use xdeb_sync::{Feedback, FeedbackSink};
use xdeb_sync_http::ClientOptions;

/// Base location of the versioned providers manifests.
pub const DEFAULT_REPOSITORIES_URL: &str =
    "https://raw.githubusercontent.com/xdeb-org/xdeb-install-repositories";

/// Manifest tag matching this release.
pub const DEFAULT_REPOSITORIES_TAG: &str = concat!("v", env!("CARGO_PKG_VERSION"));

/// Top-level application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default = "default_repositories_url")]
    pub repositories_url: String,
    #[serde(default = "default_repositories_tag")]
    pub repositories_tag: String,
    /// Architecture whose manifest is synced.
    #[serde(default = "default_architecture")]
    pub architecture: String,
    /// Root of the synced tree. Defaults to the user cache directory.
    #[serde(default)]
    pub root: Option<PathBuf>,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            repositories_url: default_repositories_url(),
            repositories_tag: default_repositories_tag(),
            architecture: default_architecture(),
            root: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl AppConfig {
    pub fn manifest_url(&self) -> String {
        xdeb_sync_http::manifest_url(
            &self.repositories_url,
            &self.repositories_tag,
            &self.architecture,
        )
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            timeout: Duration::from_secs(self.timeout_secs),
            ..ClientOptions::default()
        }
    }

    /// Directory holding the manifest cache and every synced provider.
    pub fn root_dir(&self) -> Option<PathBuf> {
        self.root
            .clone()
            .or_else(|| dirs::cache_dir().map(|d| d.join("xdeb-sync").join("repositories")))
    }
}

fn default_repositories_url() -> String {
    DEFAULT_REPOSITORIES_URL.into()
}

fn default_repositories_tag() -> String {
    DEFAULT_REPOSITORIES_TAG.into()
}

fn default_architecture() -> String {
    std::env::consts::ARCH.into()
}

fn default_timeout_secs() -> u64 {
    60
}

/// Config file path: `~/.config/xdeb-sync/config.toml`
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("xdeb-sync").join("config.toml"))
}

/// Load config from file, falling back to defaults if missing.
pub fn load_config(feedback: &dyn FeedbackSink) -> AppConfig {
    match config_path() {
        Some(path) => load_config_from(&path, feedback),
        None => AppConfig::default(),
    }
}

fn load_config_from(path: &Path, feedback: &dyn FeedbackSink) -> AppConfig {
    let Ok(contents) = std::fs::read_to_string(path) else {
        return AppConfig::default();
    };

    toml::from_str::<AppConfig>(&contents).unwrap_or_else(|_| {
        feedback.emit(Feedback::warning(format!(
            "failed to parse config at {}, using defaults",
            path.display()
        )));
        AppConfig::default()
    })
}
