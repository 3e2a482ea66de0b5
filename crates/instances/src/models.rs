use std::cmp::Ordering;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// One installable modpack, either present on disk or offered by the package list.
///
/// Only the persisted fields are serialized to `instance.json`; `dir`, `selected`
/// and `local` are recomputed on every enumeration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub installed: bool,
    #[serde(default)]
    pub update_pending: bool,
    #[serde(default)]
    pub manifest_url: Option<Url>,
    #[serde(default)]
    pub last_accessed: Option<DateTime<Utc>>,

    #[serde(skip)]
    pub dir: PathBuf,
    #[serde(skip)]
    pub selected: bool,
    #[serde(skip)]
    pub local: bool,
}

impl Instance {
    /// Title shown to the user, falling back to the name when the package list
    /// never supplied one.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }

    /// Whether this instance refers to the same package as `name`.
    pub fn matches_name(&self, name: &str) -> bool {
        names_match(&self.name, name)
    }

    /// Display ordering: higher priority first, then title, then name.
    pub fn display_cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| {
                self.display_title()
                    .to_lowercase()
                    .cmp(&other.display_title().to_lowercase())
            })
            .then_with(|| self.name.cmp(&other.name))
    }

    /// Short state label used by listings.
    pub fn state(&self) -> InstanceState {
        match (self.local, self.update_pending) {
            (false, _) => InstanceState::Available,
            (true, true) => InstanceState::UpdatePending,
            (true, false) => InstanceState::UpToDate,
        }
    }
}

pub(crate) fn names_match(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b) || a.to_lowercase() == b.to_lowercase()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceState {
    Available,
    UpdatePending,
    UpToDate,
}

impl std::fmt::Display for InstanceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstanceState::Available => write!(f, "available"),
            InstanceState::UpdatePending => write!(f, "update pending"),
            InstanceState::UpToDate => write!(f, "up to date"),
        }
    }
}

/// Entry of the remote package list describing one modpack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestInfo {
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    pub version: String,
    #[serde(default)]
    pub priority: i32,
    /// Location of the package's own manifest, relative to the package list URL
    pub location: String,
}

/// The remote package list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageList {
    #[serde(default)]
    pub minimum_version: u32,
    #[serde(default)]
    pub packages: Vec<ManifestInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance(name: &str, title: Option<&str>, priority: i32) -> Instance {
        Instance {
            name: name.to_string(),
            title: title.map(str::to_string),
            priority,
            ..Default::default()
        }
    }

    #[test]
    fn test_display_order_prefers_priority_then_title() {
        let mut instances = vec![
            instance("zeta", Some("Zeta Pack"), 1),
            instance("alpha", Some("alpha pack"), 1),
            instance("vanilla", None, 10),
        ];
        instances.sort_by(Instance::display_cmp);

        let names: Vec<_> = instances.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["vanilla", "alpha", "zeta"]);
    }

    #[test]
    fn test_name_matching_ignores_case() {
        let foo = instance("foo", None, 0);
        assert!(foo.matches_name("Foo"));
        assert!(foo.matches_name("FOO"));
        assert!(!foo.matches_name("foobar"));
    }

    #[test]
    fn test_runtime_fields_are_not_persisted() {
        let mut record = instance("foo", Some("Foo"), 3);
        record.dir = PathBuf::from("/tmp/instances/foo");
        record.selected = true;
        record.local = true;
        record.version = Some("1.0".to_string());

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["name"], "foo");
        assert_eq!(json["version"], "1.0");
        assert!(json.get("dir").is_none());
        assert!(json.get("selected").is_none());
        assert!(json.get("local").is_none());

        let restored: Instance = serde_json::from_value(json).unwrap();
        assert_eq!(restored.version.as_deref(), Some("1.0"));
        assert!(!restored.selected);
        assert!(restored.dir.as_os_str().is_empty());
    }

    #[test]
    fn test_package_list_parses_camel_case() {
        let json = r#"{
            "minimumVersion": 1,
            "packages": [
                {"name": "foo", "title": "Foo", "version": "1.1", "priority": 5, "location": "foo.json"}
            ]
        }"#;
        let list: PackageList = serde_json::from_str(json).unwrap();
        assert_eq!(list.minimum_version, 1);
        assert_eq!(list.packages.len(), 1);
        assert_eq!(list.packages[0].priority, 5);
        assert_eq!(list.packages[0].location, "foo.json");
    }

    #[test]
    fn test_state_labels() {
        let mut record = instance("foo", None, 0);
        assert_eq!(record.state(), InstanceState::Available);
        record.local = true;
        assert_eq!(record.state(), InstanceState::UpToDate);
        record.update_pending = true;
        assert_eq!(record.state().to_string(), "update pending");
    }
}
