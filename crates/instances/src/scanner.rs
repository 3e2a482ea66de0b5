use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::fs;
use tracing::{debug, info, warn};

use crate::models::Instance;
use crate::persist::Persistence;

/// Finds the instances installed under a base directory.
pub struct LocalScanner {
    instances_dir: PathBuf,
    persistence: Arc<dyn Persistence>,
}

impl LocalScanner {
    pub fn new(instances_dir: impl Into<PathBuf>, persistence: Arc<dyn Persistence>) -> Self {
        Self {
            instances_dir: instances_dir.into(),
            persistence,
        }
    }

    pub fn instances_dir(&self) -> &Path {
        &self.instances_dir
    }

    /// Load one instance per subdirectory of the instances directory.
    ///
    /// An instances directory that does not exist or cannot be opened yields no
    /// instances. Results are ordered by directory name.
    pub async fn scan(&self) -> Vec<Instance> {
        let dirs = match self.list_dirs().await {
            Ok(dirs) => dirs,
            Err(e) => {
                debug!(
                    "Cannot list instances directory {}: {}",
                    self.instances_dir.display(),
                    e
                );
                return Vec::new();
            }
        };

        let mut local = Vec::with_capacity(dirs.len());
        for (name, dir) in dirs {
            let mut instance = self.persistence.load(&dir).await;
            instance.name = name;
            instance.dir = dir;
            instance.selected = true;
            instance.local = true;

            info!(
                "{} local instance found at {}",
                instance.name,
                instance.dir.display()
            );
            local.push(instance);
        }
        local
    }

    async fn list_dirs(&self) -> std::io::Result<Vec<(String, PathBuf)>> {
        let mut entries = fs::read_dir(&self.instances_dir).await?;
        let mut dirs = Vec::new();

        loop {
            let step = match entries.next_entry().await {
                Ok(Some(entry)) => {
                    // Follows symlinks, so a linked instance directory still counts
                    let is_dir = fs::metadata(entry.path())
                        .await
                        .map(|m| m.is_dir())
                        .unwrap_or(false);
                    let name = entry.file_name().to_string_lossy().into_owned();
                    Ok(Some((name, entry.path(), is_dir)))
                }
                other => other.map(|_| None),
            };
            if !accept_entry(&mut dirs, step, &self.instances_dir) {
                break;
            }
        }

        dirs.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(dirs)
    }
}

type ListingStep = std::io::Result<Option<(String, PathBuf, bool)>>;

/// Record one step of a directory listing. Returns false once the listing has
/// ended, including when it fails partway; entries seen before are kept.
fn accept_entry(dirs: &mut Vec<(String, PathBuf)>, step: ListingStep, base: &Path) -> bool {
    match step {
        Ok(Some((name, path, true))) => {
            dirs.push((name, path));
            true
        }
        Ok(Some(_)) => true,
        Ok(None) => false,
        Err(e) => {
            warn!(
                "Stopped listing instances directory {} early: {}",
                base.display(),
                e
            );
            false
        }
    }
}
