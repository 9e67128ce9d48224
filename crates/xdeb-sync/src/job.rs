use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::compression::COMPRESSED_EXTENSION;
use crate::provider::ProviderDefinition;

/// Extension of serialized snapshots before compression.
pub const SNAPSHOT_EXTENSION: &str = "yaml";

/// One unit of fetch work: a single (provider, distribution, component).
#[derive(Debug, Clone)]
pub struct SyncJob {
    provider: Arc<ProviderDefinition>,
    distribution: String,
    component: String,
}

impl SyncJob {
    pub fn new(
        provider: Arc<ProviderDefinition>,
        distribution: impl Into<String>,
        component: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            distribution: distribution.into(),
            component: component.into(),
        }
    }

    pub fn provider(&self) -> &ProviderDefinition {
        &self.provider
    }

    pub fn distribution(&self) -> &str {
        &self.distribution
    }

    pub fn component(&self) -> &str {
        &self.component
    }

    /// `<root>/<provider>/<distribution>`
    pub fn directory(&self, root: &Path) -> PathBuf {
        root.join(&self.provider.name).join(&self.distribution)
    }

    /// `<root>/<provider>/<distribution>/<component>.yaml.zst`
    pub fn snapshot_path(&self, root: &Path) -> PathBuf {
        self.directory(root).join(format!(
            "{}.{SNAPSHOT_EXTENSION}.{COMPRESSED_EXTENSION}",
            self.component
        ))
    }

    /// Base URL with any trailing slash removed.
    pub fn base_url(&self) -> &str {
        self.provider.url.trim_end_matches('/')
    }

    /// Location of the uncompressed APT index for this job.
    pub fn index_url(&self) -> String {
        format!(
            "{}/dists/{}/{}/binary-{}/Packages",
            self.base_url(),
            self.distribution,
            self.component,
            self.provider.architecture,
        )
    }

    /// Location of a custom provider's file for this job.
    pub fn custom_url(&self) -> String {
        format!("{}/{}/{}", self.base_url(), self.distribution, self.component)
    }
}

impl fmt::Display for SyncJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}: {}",
            self.provider.name, self.distribution, self.component
        )
    }
}
