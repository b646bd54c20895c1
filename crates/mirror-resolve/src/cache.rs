use std::collections::HashMap;
use std::sync::Arc;

use mirror_signature::Signature;
use parking_lot::RwLock;

use crate::bindings::{normalize, HierarchyResolution};

type Key = (String, Vec<Signature>);

/// Memoized hierarchy resolutions keyed by start type and start arguments.
///
/// Entries are only valid for one model snapshot; call
/// [`ResolutionCache::invalidate`] when the model changes.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    entries: RwLock<HashMap<Key, Arc<HierarchyResolution>>>,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, start: &str, args: &[Signature]) -> Option<Arc<HierarchyResolution>> {
        self.entries
            .read()
            .get(&(normalize(start), args.to_vec()))
            .cloned()
    }

    pub fn insert(
        &self,
        start: &str,
        args: &[Signature],
        resolution: HierarchyResolution,
    ) -> Arc<HierarchyResolution> {
        let mut entries = self.entries.write();
        entries
            .entry((normalize(start), args.to_vec()))
            .or_insert_with(|| Arc::new(resolution))
            .clone()
    }

    pub fn invalidate(&self) {
        self.entries.write().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
