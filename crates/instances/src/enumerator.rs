//! One full enumeration run: scan, fetch, merge, replace.

use std::sync::Arc;

use tracing::{error, info};

use crate::config::LauncherConfig;
use crate::error::Result;
use crate::manifest::{HttpManifestSource, ManifestFetcher, ManifestSource};
use crate::models::Instance;
use crate::persist::{CommitQueue, JsonPersistence, Persistence};
use crate::reconcile::{Reconciler, Reconciliation};
use crate::scanner::LocalScanner;
use crate::store::InstanceStore;

/// Progress value reported by work whose length is unknown
pub const INDETERMINATE_PROGRESS: f64 = -1.0;

/// Work that can report how far along it is
pub trait ProgressObservable {
    /// Fraction complete in `0.0..=1.0`, or [`INDETERMINATE_PROGRESS`]
    fn progress(&self) -> f64;
}

/// Counts from a finished enumeration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnumerationSummary {
    pub local: usize,
    pub remote: usize,
    pub updates: usize,
}

/// Rebuilds an [`InstanceStore`] from disk and the remote package list.
///
/// The store is always replaced when a run finishes. If the package list cannot be
/// fetched or understood, the store receives the local instances only and the error
/// is returned. Dropping the future before it finishes leaves the store as it was.
pub struct Enumerator {
    store: Arc<InstanceStore>,
    scanner: LocalScanner,
    fetcher: ManifestFetcher,
    reconciler: Reconciler,
    commits: CommitQueue,
}

impl Enumerator {
    pub fn new(
        store: Arc<InstanceStore>,
        scanner: LocalScanner,
        fetcher: ManifestFetcher,
        commits: CommitQueue,
    ) -> Self {
        let reconciler = Reconciler::new(
            fetcher.packages_url().clone(),
            scanner.instances_dir().to_path_buf(),
        );
        Self {
            store,
            scanner,
            fetcher,
            reconciler,
            commits,
        }
    }

    /// Wire up the file-backed and HTTP collaborators described by `config`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn from_config(store: Arc<InstanceStore>, config: &LauncherConfig) -> Result<Self> {
        config.validate()?;

        let persistence: Arc<dyn Persistence> = Arc::new(JsonPersistence);
        let source: Arc<dyn ManifestSource> = Arc::new(HttpManifestSource::from_config(config)?);

        Ok(Self::new(
            store,
            LocalScanner::new(&config.instances_dir, persistence.clone()),
            ManifestFetcher::new(source, config.packages_url.clone()),
            CommitQueue::spawn(persistence),
        ))
    }

    pub fn store(&self) -> &Arc<InstanceStore> {
        &self.store
    }

    /// Queue used for update records; flush it before shutting down.
    pub fn commits(&self) -> &CommitQueue {
        &self.commits
    }

    pub async fn call(&self) -> Result<EnumerationSummary> {
        info!("Enumerating instance list...");

        let local = self.scanner.scan().await;

        match self.merge_remote(&local).await {
            Ok(reconciliation) => {
                for instance in &reconciliation.updated {
                    self.commits.commit_and_forget(instance.clone());
                }

                let summary = EnumerationSummary {
                    local: reconciliation.local.len(),
                    remote: reconciliation.remote.len(),
                    updates: reconciliation.updated.len(),
                };
                self.publish(reconciliation.instances());
                Ok(summary)
            }
            Err(e) => {
                error!("Failed to merge the package list: {}", e);
                self.publish(local);
                Err(e)
            }
        }
    }

    async fn merge_remote(&self, local: &[Instance]) -> Result<Reconciliation> {
        let packages = self.fetcher.fetch().await?;
        self.reconciler.reconcile(local, &packages)
    }

    fn publish(&self, instances: Vec<Instance>) {
        let count = self.store.replace(instances);
        info!("{} instance(s) enumerated.", count);
    }
}

impl ProgressObservable for Enumerator {
    fn progress(&self) -> f64 {
        INDETERMINATE_PROGRESS
    }
}
