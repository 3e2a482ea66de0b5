//! Fetching and validating the remote package list.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;
use url::Url;

use crate::config::LauncherConfig;
use crate::error::{InstanceError, Result};
use crate::models::{ManifestInfo, PackageList};

/// Highest package list format this launcher understands
pub const PARSER_VERSION: u32 = 1;

/// Transport for the package list
#[async_trait]
pub trait ManifestSource: Send + Sync {
    async fn fetch_package_list(&self, url: &Url) -> Result<PackageList>;
}

/// Fetches the package list with a plain HTTP GET.
pub struct HttpManifestSource {
    client: reqwest::Client,
}

impl HttpManifestSource {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                InstanceError::ConfigError(format!("Failed to build HTTP client: {}", e))
            })?;
        Ok(Self { client })
    }

    pub fn from_config(config: &LauncherConfig) -> Result<Self> {
        Self::new(config.request_timeout(), &config.user_agent)
    }
}

#[async_trait]
impl ManifestSource for HttpManifestSource {
    async fn fetch_package_list(&self, url: &Url) -> Result<PackageList> {
        debug!("Fetching package list from {}", url);

        let download_error = |reason: String| InstanceError::ManifestDownload {
            url: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| download_error(e.to_string()))?;

        if response.status() != reqwest::StatusCode::OK {
            return Err(download_error(format!(
                "unexpected status {}",
                response.status()
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| download_error(format!("failed to read response: {}", e)))?;

        serde_json::from_slice(&body).map_err(|e| InstanceError::InvalidManifest {
            url: url.to_string(),
            source: e,
        })
    }
}

/// Retrieves the package list and checks it can be understood.
#[derive(Clone)]
pub struct ManifestFetcher {
    source: Arc<dyn ManifestSource>,
    packages_url: Url,
}

impl ManifestFetcher {
    pub fn new(source: Arc<dyn ManifestSource>, packages_url: Url) -> Self {
        Self {
            source,
            packages_url,
        }
    }

    pub fn packages_url(&self) -> &Url {
        &self.packages_url
    }

    pub async fn fetch(&self) -> Result<PackageList> {
        let packages = self.source.fetch_package_list(&self.packages_url).await?;
        check_parser_version(&packages)?;
        debug!(
            "Package list from {} offers {} package(s)",
            self.packages_url,
            packages.packages.len()
        );
        Ok(packages)
    }
}

pub fn check_parser_version(packages: &PackageList) -> Result<()> {
    if packages.minimum_version > PARSER_VERSION {
        return Err(InstanceError::UnsupportedVersion {
            required: packages.minimum_version,
            supported: PARSER_VERSION,
        });
    }
    Ok(())
}

/// Resolve a package's manifest location against the package list URL.
///
/// Relative locations resolve like links in a document: `foo.json` next to
/// `https://host/packs/packages.json` becomes `https://host/packs/foo.json`.
pub fn resolve_location(packages_url: &Url, manifest: &ManifestInfo) -> Result<Url> {
    packages_url
        .join(&manifest.location)
        .map_err(|e| InstanceError::InvalidLocation {
            package: manifest.name.clone(),
            location: manifest.location.clone(),
            source: e,
        })
}
