// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Registry of loaded models, keyed by model name.
//!
//! Holds at most one entry per name at any time. An entry is inserted in the
//! `Loading` state before the asynchronous load begins, which is the gate
//! preventing a re-entrant duplicate load; it flips to `Loaded` on success
//! and is rolled back on failure. Mutation only happens through the
//! load/unload operations, never by external code.

use std::collections::HashMap;

use crate::loader::LoadedModel;

/// Per-name lifecycle state.
#[derive(Debug)]
pub enum ModelEntry {
    /// Load requested, scene insertion not yet complete.
    Loading,
    /// Present in the scene.
    Loaded(LoadedModel),
}

/// Outcome of an unload request.
#[derive(Debug)]
pub enum UnloadOutcome {
    /// The entry was removed; its scene resources are the caller's to destroy.
    Removed(LoadedModel),
    /// A load for this name is still in flight; the registry is unchanged.
    InFlight,
    /// No entry for this name; the registry is unchanged.
    Absent,
}

/// Mapping from model name to lifecycle entry.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    entries: HashMap<String, ModelEntry>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names of all entries (loading or loaded), sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.keys().cloned().collect();
        names.sort();
        names
    }

    /// Whether the name has an entry in either state.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Loaded model for the name, if the load has completed.
    pub fn loaded(&self, name: &str) -> Option<&LoadedModel> {
        match self.entries.get(name) {
            Some(ModelEntry::Loaded(model)) => Some(model),
            _ => None,
        }
    }

    /// Reserve the name for a load. Returns false (registry unchanged) when
    /// an entry already exists in either state.
    pub fn begin_load(&mut self, name: &str) -> bool {
        if self.entries.contains_key(name) {
            return false;
        }
        self.entries.insert(name.to_string(), ModelEntry::Loading);
        true
    }

    /// Flip a `Loading` reservation to `Loaded`.
    pub fn complete_load(&mut self, name: &str, model: LoadedModel) {
        self.entries.insert(name.to_string(), ModelEntry::Loaded(model));
    }

    /// Roll back a `Loading` reservation so the name may be retried.
    pub fn abort_load(&mut self, name: &str) {
        if matches!(self.entries.get(name), Some(ModelEntry::Loading)) {
            self.entries.remove(name);
        }
    }

    /// Request removal of an entry.
    pub fn remove(&mut self, name: &str) -> UnloadOutcome {
        match self.entries.remove_entry(name) {
            None => UnloadOutcome::Absent,
            Some((key, ModelEntry::Loading)) => {
                // In-flight loads keep their reservation.
                self.entries.insert(key, ModelEntry::Loading);
                UnloadOutcome::InFlight
            }
            Some((_, ModelEntry::Loaded(model))) => UnloadOutcome::Removed(model),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::{DecodedModel, IfcSchema};
    use crate::engine::{Bounds, SceneModelId};

    fn loaded(name: &str) -> LoadedModel {
        LoadedModel {
            scene_id: SceneModelId(1),
            model: DecodedModel {
                name: name.into(),
                schema: IfcSchema::Ifc4,
                entity_count: 1,
                bounds: Bounds::new(),
            },
        }
    }

    #[test]
    fn begin_load_gates_duplicates() {
        let mut registry = ModelRegistry::new();
        assert!(registry.begin_load("house"));
        // Second request while the first is still in flight.
        assert!(!registry.begin_load("house"));
        assert_eq!(registry.len(), 1);

        registry.complete_load("house", loaded("house"));
        // Still gated once loaded.
        assert!(!registry.begin_load("house"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn abort_load_rolls_back_to_absent() {
        let mut registry = ModelRegistry::new();
        assert!(registry.begin_load("house"));
        registry.abort_load("house");
        assert!(registry.is_empty());
        // Retry after rollback succeeds.
        assert!(registry.begin_load("house"));
    }

    #[test]
    fn abort_load_leaves_loaded_entries_alone() {
        let mut registry = ModelRegistry::new();
        registry.begin_load("house");
        registry.complete_load("house", loaded("house"));
        registry.abort_load("house");
        assert!(registry.loaded("house").is_some());
    }

    #[test]
    fn remove_distinguishes_states() {
        let mut registry = ModelRegistry::new();
        assert!(matches!(registry.remove("house"), UnloadOutcome::Absent));

        registry.begin_load("house");
        assert!(matches!(registry.remove("house"), UnloadOutcome::InFlight));
        assert!(registry.contains("house"));

        registry.complete_load("house", loaded("house"));
        assert!(matches!(registry.remove("house"), UnloadOutcome::Removed(_)));
        assert!(registry.is_empty());

        assert!(matches!(registry.remove("house"), UnloadOutcome::Absent));
    }

    #[test]
    fn names_are_sorted() {
        let mut registry = ModelRegistry::new();
        registry.begin_load("office");
        registry.begin_load("house");
        assert_eq!(registry.names(), vec!["house", "office"]);
    }
}
