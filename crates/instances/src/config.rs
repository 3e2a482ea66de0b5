use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{InstanceError, Result};

pub const DEFAULT_PACKAGES_URL: &str = "https://packs.example.com/packages.json";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Settings needed to enumerate instances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LauncherConfig {
    /// Directory holding one subdirectory per installed instance
    pub instances_dir: PathBuf,
    /// URL of the remote package list
    pub packages_url: Url,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    format!("packdeck/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for LauncherConfig {
    fn default() -> Self {
        let instances_dir =
            Self::default_instances_dir().unwrap_or_else(|_| PathBuf::from("instances"));
        let packages_url =
            Url::parse(DEFAULT_PACKAGES_URL).expect("default packages URL is valid");

        Self {
            instances_dir,
            packages_url,
            request_timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl LauncherConfig {
    pub fn new(instances_dir: impl Into<PathBuf>, packages_url: Url) -> Self {
        Self {
            instances_dir: instances_dir.into(),
            packages_url,
            ..Default::default()
        }
    }

    /// Get the default instances directory for the current OS
    ///
    /// Returns an error if the system directories cannot be determined
    pub fn default_instances_dir() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("com", "packdeck", "packdeck").ok_or_else(|| {
            InstanceError::ConfigError(
                "Could not determine system directories for current user/OS".to_string(),
            )
        })?;

        Ok(project_dirs.data_local_dir().join("instances"))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Set the request timeout, rounded up to whole seconds
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        let partial_second = u64::from(timeout.subsec_nanos() > 0);
        self.request_timeout_secs = timeout.as_secs().saturating_add(partial_second);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.instances_dir.as_os_str().is_empty() {
            return Err(InstanceError::ConfigError(
                "instances_dir must not be empty".to_string(),
            ));
        }
        if !matches!(self.packages_url.scheme(), "http" | "https") {
            return Err(InstanceError::ConfigError(format!(
                "unsupported packages_url scheme '{}'",
                self.packages_url.scheme()
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(InstanceError::ConfigError(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
