use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::job::SyncJob;

/// A named remote package source, as listed in the providers manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDefinition {
    pub name: String,
    /// Custom providers are downloaded verbatim instead of being parsed as
    /// APT indices.
    #[serde(default)]
    pub custom: bool,
    pub url: String,
    /// Binary architecture of the APT index. Unused for custom providers.
    #[serde(default)]
    pub architecture: String,
    #[serde(default)]
    pub components: Vec<String>,
    #[serde(rename = "dists", default)]
    pub distributions: Vec<String>,
}

impl ProviderDefinition {
    /// Number of independent fetch jobs this provider expands to.
    pub fn job_count(&self) -> usize {
        self.distributions.len() * self.components.len()
    }

    /// Expand into one job per (distribution, component), distribution-major.
    pub fn jobs(provider: &Arc<Self>) -> Vec<SyncJob> {
        provider
            .distributions
            .iter()
            .flat_map(|distribution| {
                provider.components.iter().map(move |component| {
                    SyncJob::new(Arc::clone(provider), distribution.clone(), component.clone())
                })
            })
            .collect()
    }
}

/// The list of providers fetched at the start of every sync run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageListManifest {
    #[serde(default)]
    pub providers: Vec<ProviderDefinition>,
}

impl PackageListManifest {
    pub fn new(providers: Vec<ProviderDefinition>) -> Self {
        Self { providers }
    }

    /// Parse the YAML form of a manifest.
    pub fn from_yaml(yaml: &[u8]) -> Result<Self, ManifestError> {
        serde_yaml_ng::from_slice(yaml).map_err(|e| ManifestError::Parse(e.to_string()))
    }

    /// Provider names in manifest order.
    pub fn names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name.clone()).collect()
    }

    /// Reject manifests in which two providers share a name.
    pub fn validate(&self) -> Result<(), ResolveError> {
        let mut seen = HashSet::new();

        for provider in &self.providers {
            if !seen.insert(provider.name.as_str()) {
                return Err(ResolveError::DuplicateProvider(provider.name.clone()));
            }
        }

        Ok(())
    }

    /// Select the providers named in `requested`, preserving manifest order.
    ///
    /// An empty request selects every provider. The first requested name
    /// that does not exist in the manifest is an error listing the valid
    /// names.
    pub fn resolve<S: AsRef<str>>(
        &self,
        requested: &[S],
    ) -> Result<Vec<&ProviderDefinition>, ResolveError> {
        self.validate()?;

        if requested.is_empty() {
            return Ok(self.providers.iter().collect());
        }

        let requested: Vec<&str> = requested.iter().map(|name| name.as_ref()).collect();
        let available: HashSet<&str> = self.providers.iter().map(|p| p.name.as_str()).collect();

        if let Some(unknown) = requested.iter().find(|name| !available.contains(*name)) {
            return Err(ResolveError::UnknownProvider {
                name: (*unknown).to_owned(),
                available: self.names(),
            });
        }

        let wanted: HashSet<&str> = requested.into_iter().collect();

        Ok(self
            .providers
            .iter()
            .filter(|provider| wanted.contains(provider.name.as_str()))
            .collect())
    }
}

/// Configuration errors raised before any network activity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("provider {name} not supported; omit or use any of [{}]", available.join(", "))]
    UnknownProvider {
        name: String,
        available: Vec<String>,
    },

    #[error("provider {0} is defined more than once in the manifest")]
    DuplicateProvider(String),
}

/// Errors that can occur while reading a manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("failed to parse providers manifest: {0}")]
    Parse(String),
}
