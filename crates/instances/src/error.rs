use thiserror::Error;

#[derive(Error, Debug)]
pub enum InstanceError {
    #[error("The list of modpacks could not be downloaded from '{url}': {reason}")]
    ManifestDownload { url: String, reason: String },

    #[error("Invalid package list at '{url}': {source}")]
    InvalidManifest {
        url: String,
        source: serde_json::Error,
    },

    #[error("Invalid manifest location '{location}' for package '{package}': {source}")]
    InvalidLocation {
        package: String,
        location: String,
        source: url::ParseError,
    },

    #[error("Package list requires parser version {required}, but only {supported} is supported")]
    UnsupportedVersion { required: u32, supported: u32 },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("IO operation '{operation}' failed on path '{path}': {source}")]
    IoOperation {
        operation: String,
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type Result<T> = std::result::Result<T, InstanceError>;

impl InstanceError {
    /// Whether the error came from fetching or validating the remote package list
    pub fn is_manifest_error(&self) -> bool {
        matches!(
            self,
            InstanceError::ManifestDownload { .. }
                | InstanceError::InvalidManifest { .. }
                | InstanceError::InvalidLocation { .. }
                | InstanceError::UnsupportedVersion { .. }
        )
    }

    /// A single message suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            InstanceError::ManifestDownload { .. }
            | InstanceError::InvalidManifest { .. }
            | InstanceError::InvalidLocation { .. } => {
                "The list of modpacks could not be downloaded.".to_string()
            }
            InstanceError::UnsupportedVersion { .. } => {
                "This launcher is out of date and needs to be updated before it can list modpacks."
                    .to_string()
            }
            InstanceError::ConfigError(message) => format!("Invalid configuration: {}", message),
            other => other.to_string(),
        }
    }
}
