//! Instance list management for the packdeck modpack launcher
//!
//! Installed modpacks live in one directory each under the instances directory.
//! The launcher also publishes a package list of modpacks that can be installed.
//! This crate merges the two into a single list, marks installed modpacks whose
//! version differs from the published one, and records that in their `instance.json`.
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use packdeck_instances::{Enumerator, InstanceStore, LauncherConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = LauncherConfig::default();
//! let store = Arc::new(InstanceStore::new());
//! let enumerator = Enumerator::from_config(store.clone(), &config)?;
//!
//! if let Err(e) = enumerator.call().await {
//!     eprintln!("{}", e.user_message());
//! }
//! enumerator.commits().flush().await;
//!
//! store.sort();
//! for instance in store.snapshot() {
//!     println!("{} ({})", instance.display_title(), instance.state());
//! }
//! # Ok(())
//! # }
//! ```
pub mod config;
pub mod enumerator;
pub mod error;
pub mod manifest;
pub mod models;
pub mod persist;
pub mod reconcile;
pub mod scanner;
pub mod store;

pub use config::LauncherConfig;
pub use enumerator::{
    EnumerationSummary, Enumerator, INDETERMINATE_PROGRESS, ProgressObservable,
};
pub use error::{InstanceError, Result};
pub use manifest::{
    HttpManifestSource, ManifestFetcher, ManifestSource, PARSER_VERSION, resolve_location,
};
pub use models::{Instance, InstanceState, ManifestInfo, PackageList};
pub use persist::{CommitQueue, INSTANCE_FILE, JsonPersistence, Persistence};
pub use reconcile::{Reconciler, Reconciliation};
pub use scanner::LocalScanner;
pub use store::InstanceStore;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_info() {
        assert!(!VERSION.is_empty());
        assert_eq!(NAME, "packdeck_instances");
    }
}
