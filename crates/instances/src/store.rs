use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::models::Instance;

/// The canonical list of instances shown by the launcher.
///
/// Every operation takes the same lock, and readers only ever receive copies.
/// The contents are replaced wholesale by enumeration, never patched.
#[derive(Debug, Default)]
pub struct InstanceStore {
    instances: Mutex<Vec<Instance>>,
}

impl InstanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Instance>> {
        // A panic while holding the lock cannot leave the list half-replaced
        self.instances.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, index: usize) -> Option<Instance> {
        self.lock().get(index).cloned()
    }

    pub fn size(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// All selected instances, in list order
    pub fn selected(&self) -> Vec<Instance> {
        self.lock().iter().filter(|i| i.selected).cloned().collect()
    }

    pub fn snapshot(&self) -> Vec<Instance> {
        self.lock().clone()
    }

    /// Sort into display order
    pub fn sort(&self) {
        self.lock().sort_by(Instance::display_cmp);
    }

    /// Swap in a fully built list in one step.
    pub(crate) fn replace(&self, instances: Vec<Instance>) -> usize {
        let mut guard = self.lock();
        *guard = instances;
        guard.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn instance(name: &str, priority: i32, selected: bool) -> Instance {
        Instance {
            name: name.to_string(),
            priority,
            selected,
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_store() {
        let store = InstanceStore::new();
        assert_eq!(store.size(), 0);
        assert!(store.is_empty());
        assert!(store.get(0).is_none());
        assert!(store.selected().is_empty());
    }

    #[test]
    fn test_selected_keeps_encounter_order() {
        let store = InstanceStore::new();
        store.replace(vec![
            instance("c", 0, true),
            instance("b", 0, false),
            instance("a", 0, true),
        ]);

        let selected: Vec<_> = store.selected().into_iter().map(|i| i.name).collect();
        assert_eq!(selected, vec!["c", "a"]);
    }

    #[test]
    fn test_sort_uses_display_order() {
        let store = InstanceStore::new();
        store.replace(vec![
            instance("low", 1, true),
            instance("high", 10, false),
            instance("mid", 5, true),
        ]);

        store.sort();

        assert_eq!(store.get(0).unwrap().name, "high");
        assert_eq!(store.get(1).unwrap().name, "mid");
        assert_eq!(store.get(2).unwrap().name, "low");
    }

    #[test]
    fn test_replace_discards_previous_contents() {
        let store = InstanceStore::new();
        store.replace(vec![instance("old", 0, true), instance("older", 0, true)]);
        let size = store.replace(vec![instance("new", 0, true)]);

        assert_eq!(size, 1);
        let names: Vec<_> = store.snapshot().into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["new"]);
    }

    #[test]
    fn test_readers_never_see_an_empty_list_during_replace() {
        let store = Arc::new(InstanceStore::new());
        store.replace(vec![instance("a", 0, true), instance("b", 0, true)]);

        let writer = {
            let store = store.clone();
            std::thread::spawn(move || {
                for round in 0..500 {
                    let name = format!("round-{}", round);
                    store.replace(vec![instance(&name, 0, true), instance("b", 0, true)]);
                }
            })
        };

        for _ in 0..500 {
            assert_eq!(store.size(), 2);
        }
        writer.join().unwrap();
    }
}
