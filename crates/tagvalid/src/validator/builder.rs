use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use crate::record::RecordDescriptor;

use super::evaluator::RecordEval;
use super::registry::Registry;
use super::resolve::resolve_rules;

/// Build-through cache of record evaluators keyed by record full name.
pub(crate) struct Builder {
    /// Serializes cache writes.
    build_lock: Mutex<()>,
    /// Evaluator cache.
    cache: RwLock<HashMap<String, Arc<RecordEval>>>,
}

impl Builder {
    fn read_cache(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Arc<RecordEval>>> {
        self.cache
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write_cache(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, Arc<RecordEval>>> {
        self.cache
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn lock_build(&self) -> std::sync::MutexGuard<'_, ()> {
        self.build_lock
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    pub fn new() -> Self {
        Self {
            build_lock: Mutex::new(()),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Load a cached evaluator or build a new one.
    pub fn load_or_build(&self, desc: &RecordDescriptor, registry: &Registry) -> Arc<RecordEval> {
        let key = desc.full_name();

        // Fast path
        if let Some(eval) = self.read_cache().get(key) {
            return Arc::clone(eval);
        }

        // Slow path
        let _guard = self.lock_build();
        if let Some(eval) = self.read_cache().get(key) {
            return Arc::clone(eval);
        }

        let eval = Arc::new(build(desc, registry));
        self.write_cache()
            .insert(key.to_string(), Arc::clone(&eval));
        eval
    }

    /// Preload an evaluator into the cache.
    pub fn preload(&self, desc: &RecordDescriptor, registry: &Registry) {
        let _ = self.load_or_build(desc, registry);
    }

    /// The cached evaluator for `full_name`, without building one.
    pub fn get(&self, full_name: &str) -> Option<Arc<RecordEval>> {
        self.read_cache().get(full_name).map(Arc::clone)
    }

    pub fn contains(&self, full_name: &str) -> bool {
        self.read_cache().contains_key(full_name)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.read_cache().len()
    }
}

fn build(desc: &RecordDescriptor, registry: &Registry) -> RecordEval {
    let eval = RecordEval::new(desc.full_name(), resolve_rules(desc, registry));
    tracing::debug!(
        record = eval.full_name(),
        rules = eval.rules().count(),
        "built record evaluator"
    );
    eval
}
