//! View cache
//!
//! Rendered views keyed by route path and viewer. Writes that change what a
//! path shows invalidate it; the next read recomputes.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use serde_json::Value;

/// Path of the root listing view
pub const ROOT_VIEW_PATH: &str = "/";

/// Cache of rendered views
pub trait ViewCache: Send + Sync {
    /// Current invalidation generation
    fn generation(&self) -> u64;

    fn get(&self, path: &str, key: &str) -> Option<Value>;

    /// Store a view computed while `observed_generation` was current.
    /// Dropped if an invalidation happened in between.
    fn put(&self, path: &str, key: &str, view: Value, observed_generation: u64);

    /// Mark `path` and everything beneath it stale
    fn invalidate(&self, path: &str);
}

#[derive(Debug, Default)]
struct CacheState {
    views: HashMap<(String, String), Value>,
    generation: u64,
}

/// Process-local [`ViewCache`]
#[derive(Debug, Default)]
pub struct InMemoryViewCache {
    state: RwLock<CacheState>,
}

impl InMemoryViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .views
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Whether `path` is `root` or lies beneath it
fn covers(root: &str, path: &str) -> bool {
    let root = root.trim_end_matches('/');
    if root.is_empty() {
        return true;
    }
    path == root
        || path
            .strip_prefix(root)
            .is_some_and(|rest| rest.starts_with('/'))
}

impl ViewCache for InMemoryViewCache {
    fn generation(&self) -> u64 {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .generation
    }

    fn get(&self, path: &str, key: &str) -> Option<Value> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .views
            .get(&(path.to_string(), key.to_string()))
            .cloned()
    }

    fn put(&self, path: &str, key: &str, view: Value, observed_generation: u64) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if state.generation != observed_generation {
            tracing::debug!(path, key, "Discarding view computed before invalidation");
            return;
        }
        state.views.insert((path.to_string(), key.to_string()), view);
    }

    fn invalidate(&self, path: &str) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.generation += 1;
        let before = state.views.len();
        state.views.retain(|(cached, _), _| !covers(path, cached));
        tracing::debug!(
            path,
            dropped = before - state.views.len(),
            generation = state.generation,
            "View cache invalidated"
        );
    }
}
