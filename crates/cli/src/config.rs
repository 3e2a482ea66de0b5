use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use eyre::Result;
use packdeck_instances::LauncherConfig;
use packdeck_instances::config::{DEFAULT_PACKAGES_URL, DEFAULT_REQUEST_TIMEOUT_SECS};
use serde::{Deserialize, Serialize};
use tokio::fs;
use url::Url;

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub instances: InstancesConfig,
    #[serde(default)]
    pub packages: PackagesConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct InstancesConfig {
    pub dir: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PackagesConfig {
    pub url: String,
    pub timeout_secs: u64,
    pub user_agent: Option<String>,
}

impl Default for InstancesConfig {
    fn default() -> Self {
        Self {
            dir: LauncherConfig::default()
                .instances_dir
                .to_string_lossy()
                .to_string(),
        }
    }
}

impl Default for PackagesConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_PACKAGES_URL.to_string(),
            timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            user_agent: None,
        }
    }
}

impl Config {
    pub fn get_config_path() -> PathBuf {
        get_default_config_dir().join("config.json")
    }

    /// Load the configuration, writing the defaults on first use
    pub async fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            let default_config = Self::default();
            default_config.save_to(config_path).await?;
            return Ok(default_config);
        }

        let content = fs::read_to_string(config_path).await?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub async fn save_to(&self, config_path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, content).await?;
        Ok(())
    }

    pub async fn reset(config_path: &Path) -> Result<Self> {
        let config = Self::default();
        config.save_to(config_path).await?;
        Ok(config)
    }

    /// Build the enumeration settings, applying any command-line overrides
    pub fn launcher_config(
        &self,
        instances_dir: Option<PathBuf>,
        packages_url: Option<Url>,
    ) -> Result<LauncherConfig> {
        let packages_url = match packages_url {
            Some(url) => url,
            None => Url::parse(&self.packages.url)
                .map_err(|e| eyre::eyre!("Invalid packages.url '{}': {}", self.packages.url, e))?,
        };
        let instances_dir = instances_dir.unwrap_or_else(|| PathBuf::from(&self.instances.dir));

        let mut config = LauncherConfig::new(instances_dir, packages_url);
        config.request_timeout_secs = self.packages.timeout_secs;
        if let Some(user_agent) = &self.packages.user_agent {
            config.user_agent = user_agent.clone();
        }

        config.validate()?;
        Ok(config)
    }

    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["instances", "dir"] => {
                if value.is_empty() {
                    return Err(eyre::eyre!("instances.dir must not be empty"));
                }
                self.instances.dir = value.to_string();
            }
            ["packages", "url"] => {
                Url::parse(value).map_err(|e| eyre::eyre!("Invalid URL '{}': {}", value, e))?;
                self.packages.url = value.to_string();
            }
            ["packages", "timeout_secs"] => {
                let timeout = value
                    .parse::<u64>()
                    .map_err(|_| eyre::eyre!("Invalid number of seconds: {}", value))?;
                if timeout == 0 {
                    return Err(eyre::eyre!("packages.timeout_secs must be greater than zero"));
                }
                self.packages.timeout_secs = timeout;
            }
            ["packages", "user_agent"] => {
                self.packages.user_agent = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                };
            }
            _ => {
                return Err(eyre::eyre!("Unknown configuration key: {}", key));
            }
        }

        Ok(())
    }

    pub fn get_value(&self, key: &str) -> Result<String> {
        let parts: Vec<&str> = key.split('.').collect();

        let value = match parts.as_slice() {
            ["instances", "dir"] => self.instances.dir.clone(),
            ["packages", "url"] => self.packages.url.clone(),
            ["packages", "timeout_secs"] => self.packages.timeout_secs.to_string(),
            ["packages", "user_agent"] => self.packages.user_agent.clone().unwrap_or_default(),
            _ => {
                return Err(eyre::eyre!("Unknown configuration key: {}", key));
            }
        };

        Ok(value)
    }

    pub fn show_all(&self) -> String {
        format!(
            "Configuration:\n\
             Instances:\n\
             └─ dir: {}\n\
             Packages:\n\
             ├─ url: {}\n\
             ├─ timeout_secs: {}\n\
             └─ user_agent: {}",
            self.instances.dir,
            self.packages.url,
            self.packages.timeout_secs,
            self.packages
                .user_agent
                .as_deref()
                .unwrap_or("(default)"),
        )
    }
}

/// Get the default configuration directory
fn get_default_config_dir() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("com", "packdeck", "packdeck") {
        proj_dirs.config_dir().to_path_buf()
    } else {
        // Fallback to current directory if we can't determine project dirs
        PathBuf::from(".packdeck").join("config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_first_load_writes_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.json");

        let config = Config::load_from(&path).await.unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_set_value_round_trips_through_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");

        let mut config = Config::load_from(&path).await.unwrap();
        config
            .set_value("packages.url", "https://mirror.example.org/packages.json")
            .unwrap();
        config.set_value("instances.dir", "/srv/instances").unwrap();
        config.save_to(&path).await.unwrap();

        let reloaded = Config::load_from(&path).await.unwrap();
        assert_eq!(
            reloaded.get_value("packages.url").unwrap(),
            "https://mirror.example.org/packages.json"
        );
        assert_eq!(reloaded.get_value("instances.dir").unwrap(), "/srv/instances");
    }

    #[test]
    fn test_set_value_rejects_bad_input() {
        let mut config = Config::default();
        assert!(config.set_value("packages.url", "not a url").is_err());
        assert!(config.set_value("packages.timeout_secs", "soon").is_err());
        assert!(config.set_value("packages.timeout_secs", "0").is_err());
        assert!(config.set_value("storage.path", "/tmp").is_err());
        assert!(config.get_value("storage.path").is_err());
    }

    #[test]
    fn test_overrides_win_over_file_values() {
        let mut config = Config::default();
        config.set_value("packages.timeout_secs", "5").unwrap();
        config.set_value("packages.user_agent", "custom/1.0").unwrap();

        let url = Url::parse("http://localhost:8080/packages.json").unwrap();
        let launcher = config
            .launcher_config(Some(PathBuf::from("/tmp/instances")), Some(url.clone()))
            .unwrap();

        assert_eq!(launcher.instances_dir, PathBuf::from("/tmp/instances"));
        assert_eq!(launcher.packages_url, url);
        assert_eq!(launcher.request_timeout_secs, 5);
        assert_eq!(launcher.user_agent, "custom/1.0");
    }

    #[test]
    fn test_show_all_lists_every_key() {
        let shown = Config::default().show_all();
        assert!(shown.contains("dir:"));
        assert!(shown.contains("url:"));
        assert!(shown.contains("timeout_secs:"));
        assert!(shown.contains("user_agent: (default)"));
    }
}
