use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use crate::{FetchOutcome, Feedback, FeedbackSink, JobFetcher, PackageEntry, SyncError, SyncJob};

enum Script {
    Index(Vec<PackageEntry>),
    Fail(String),
}

/// Fetcher with canned results per (provider, distribution, component).
///
/// Unscripted jobs return [`FetchOutcome::NotFound`]. Every call is recorded
/// so tests can assert which jobs were dispatched.
#[derive(Default)]
pub struct ScriptedFetcher {
    scripts: HashMap<(String, String, String), Script>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(
        mut self,
        provider: &str,
        distribution: &str,
        component: &str,
        entries: Vec<PackageEntry>,
    ) -> Self {
        self.scripts.insert(key(provider, distribution, component), Script::Index(entries));
        self
    }

    pub fn fail(mut self, provider: &str, distribution: &str, component: &str, message: &str) -> Self {
        self.scripts.insert(
            key(provider, distribution, component),
            Script::Fail(message.to_owned()),
        );
        self
    }

    /// Jobs fetched so far, formatted as `provider/distribution: component`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

fn key(provider: &str, distribution: &str, component: &str) -> (String, String, String) {
    (
        provider.to_owned(),
        distribution.to_owned(),
        component.to_owned(),
    )
}

#[async_trait::async_trait]
impl JobFetcher for ScriptedFetcher {
    async fn fetch(&self, job: &SyncJob, _directory: &Path) -> Result<FetchOutcome, SyncError> {
        self.calls.lock().unwrap().push(job.to_string());

        match self
            .scripts
            .get(&key(&job.provider().name, job.distribution(), job.component()))
        {
            Some(Script::Index(entries)) => Ok(FetchOutcome::Index(entries.clone())),
            Some(Script::Fail(message)) => Err(SyncError::Network(message.clone())),
            None => Ok(FetchOutcome::NotFound),
        }
    }
}

/// Sink that keeps every message for later inspection.
#[derive(Default)]
pub struct CollectingSink {
    items: Mutex<Vec<Feedback>>,
}

impl CollectingSink {
    pub fn take(&self) -> Vec<Feedback> {
        std::mem::take(&mut *self.items.lock().unwrap())
    }
}

impl FeedbackSink for CollectingSink {
    fn emit(&self, feedback: Feedback) {
        self.items.lock().unwrap().push(feedback);
    }
}
