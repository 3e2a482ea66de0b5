//! Merging installed instances with the remote package list.

use std::path::PathBuf;

use tracing::info;
use url::Url;

use crate::error::Result;
use crate::manifest::resolve_location;
use crate::models::{Instance, ManifestInfo, PackageList};

/// Outcome of merging the local and remote views.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconciliation {
    /// Local instances, with manifest details applied where a package matched
    pub local: Vec<Instance>,
    /// Packages offered remotely that are not installed
    pub remote: Vec<Instance>,
    /// Snapshots of records whose update was detected, in detection order
    pub updated: Vec<Instance>,
}

impl Reconciliation {
    /// The merged list: local instances first, then remote ones.
    pub fn instances(&self) -> Vec<Instance> {
        self.local.iter().chain(self.remote.iter()).cloned().collect()
    }
}

pub struct Reconciler {
    packages_url: Url,
    instances_dir: PathBuf,
}

impl Reconciler {
    pub fn new(packages_url: Url, instances_dir: impl Into<PathBuf>) -> Self {
        Self {
            packages_url,
            instances_dir: instances_dir.into(),
        }
    }

    /// Merge `local` with `packages`, leaving `local` itself untouched.
    ///
    /// Every local instance whose name matches a package (ignoring case) takes the
    /// package's title, priority and manifest URL. If its version is unknown or
    /// differs from the package version, it adopts that version and is marked as
    /// pending an update. Duplicate local names are each updated. Packages with no
    /// local match become remote instances.
    pub fn reconcile(&self, local: &[Instance], packages: &PackageList) -> Result<Reconciliation> {
        let mut merged = local.to_vec();
        let mut remote = Vec::new();
        let mut updated = Vec::new();

        for manifest in &packages.packages {
            let manifest_url = resolve_location(&self.packages_url, manifest)?;
            let mut found_local = false;

            for instance in merged.iter_mut().filter(|i| i.matches_name(&manifest.name)) {
                found_local = true;
                if apply_manifest(instance, manifest, &manifest_url) {
                    updated.push(instance.clone());
                }
            }

            if !found_local {
                let instance = self.remote_instance(manifest, manifest_url);
                info!(
                    "Available remote instance: '{}' at version {}",
                    instance.name, manifest.version
                );
                remote.push(instance);
            }
        }

        Ok(Reconciliation {
            local: merged,
            remote,
            updated,
        })
    }

    fn remote_instance(&self, manifest: &ManifestInfo, manifest_url: Url) -> Instance {
        Instance {
            dir: self.instances_dir.join(&manifest.name),
            title: manifest.title.clone(),
            name: manifest.name.clone(),
            version: Some(manifest.version.clone()),
            priority: manifest.priority,
            selected: false,
            manifest_url: Some(manifest_url),
            update_pending: true,
            local: false,
            ..Default::default()
        }
    }
}

/// Returns true when the instance needs an update to the manifest's version.
fn apply_manifest(instance: &mut Instance, manifest: &ManifestInfo, manifest_url: &Url) -> bool {
    instance.title = manifest.title.clone();
    instance.priority = manifest.priority;
    instance.manifest_url = Some(manifest_url.clone());

    if instance.version.as_deref() == Some(manifest.version.as_str()) {
        return false;
    }

    instance.update_pending = true;
    instance.version = Some(manifest.version.clone());
    info!(
        "{} requires an update to {}",
        instance.name, manifest.version
    );
    true
}
