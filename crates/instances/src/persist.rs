//! Reading and writing per-instance `instance.json` records.
//!
//! Loading never fails: a missing, unreadable or corrupt record yields a default
//! [`Instance`]. Writes that happen during enumeration go through a
//! [`CommitQueue`], which performs them on a background task and only logs failures.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::error::{InstanceError, Result};
use crate::models::Instance;

/// Name of the metadata file stored in every instance directory
pub const INSTANCE_FILE: &str = "instance.json";

pub fn instance_file(dir: &Path) -> PathBuf {
    dir.join(INSTANCE_FILE)
}

/// Storage for instance records
#[async_trait]
pub trait Persistence: Send + Sync {
    /// Load the record kept in `dir`, or a default record if there is none
    async fn load(&self, dir: &Path) -> Instance;

    /// Write the record into its own `dir`
    async fn commit(&self, instance: &Instance) -> Result<()>;
}

/// JSON files on the local file system
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPersistence;

#[async_trait]
impl Persistence for JsonPersistence {
    async fn load(&self, dir: &Path) -> Instance {
        let path = instance_file(dir);

        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No instance record at {}", path.display());
                return Instance::default();
            }
            Err(e) => {
                warn!("Failed to read instance record {}: {}", path.display(), e);
                return Instance::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(instance) => instance,
            Err(e) => {
                warn!("Ignoring corrupt instance record {}: {}", path.display(), e);
                Instance::default()
            }
        }
    }

    async fn commit(&self, instance: &Instance) -> Result<()> {
        if instance.dir.as_os_str().is_empty() {
            return Err(InstanceError::ConfigError(format!(
                "instance '{}' has no directory to be saved in",
                instance.name
            )));
        }

        fs::create_dir_all(&instance.dir)
            .await
            .map_err(|e| InstanceError::IoOperation {
                operation: "create instance directory".to_string(),
                path: instance.dir.clone(),
                source: e,
            })?;

        let content = serde_json::to_string_pretty(instance)?;
        let path = instance_file(&instance.dir);
        let staging = path.with_extension("json.tmp");

        // Write to a sibling file first so readers never see a half-written record
        fs::write(&staging, content)
            .await
            .map_err(|e| InstanceError::IoOperation {
                operation: "write instance record".to_string(),
                path: staging.clone(),
                source: e,
            })?;
        fs::rename(&staging, &path)
            .await
            .map_err(|e| InstanceError::IoOperation {
                operation: "replace instance record".to_string(),
                path: path.clone(),
                source: e,
            })?;

        debug!("Saved instance record {}", path.display());
        Ok(())
    }
}

enum Command {
    Commit(Instance),
    Flush(oneshot::Sender<()>),
}

/// Background writer for instance records.
///
/// Commits are applied in the order they were queued. Cloning the queue shares the
/// same writer task; the task exits once every handle has been dropped.
#[derive(Clone)]
pub struct CommitQueue {
    sender: mpsc::UnboundedSender<Command>,
}

impl CommitQueue {
    /// Start the writer task. Must be called from within a Tokio runtime.
    pub fn spawn(persistence: Arc<dyn Persistence>) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        tokio::spawn(run_writer(persistence, receiver));
        Self { sender }
    }

    /// Queue a write of `instance`. Failures are logged by the writer task.
    pub fn commit_and_forget(&self, instance: Instance) {
        let name = instance.name.clone();
        if self.sender.send(Command::Commit(instance)).is_err() {
            warn!("Instance writer has stopped, dropping update for '{}'", name);
        }
    }

    /// Wait until every commit queued so far has been attempted.
    pub async fn flush(&self) {
        let (ack, done) = oneshot::channel();
        if self.sender.send(Command::Flush(ack)).is_ok() {
            let _ = done.await;
        }
    }
}

async fn run_writer(
    persistence: Arc<dyn Persistence>,
    mut receiver: mpsc::UnboundedReceiver<Command>,
) {
    while let Some(command) = receiver.recv().await {
        match command {
            Command::Commit(instance) => {
                if let Err(e) = persistence.commit(&instance).await {
                    warn!("Failed to save instance '{}': {}", instance.name, e);
                }
            }
            Command::Flush(ack) => {
                let _ = ack.send(());
            }
        }
    }
    debug!("Instance writer stopped");
}
