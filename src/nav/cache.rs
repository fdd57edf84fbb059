//! # View Cache
//!
//! Per-layer store of detached-but-retained view instances. Three policies:
//!
//! - `DestroyImmediately`: `put` disposes and destroys on the spot.
//! - `Lru`: retained up to the layer capacity; oldest-by-access evicted.
//! - `Persistent`: exempt from capacity eviction, removed only by `clear`.
//!
//! The cache never touches navigation state; its only side effects are
//! `on_disposed` and node destruction on the instances it drops.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use log::debug;

use crate::scene::SceneGraph;
use crate::view::{CachePolicy, ViewConfig, ViewInstance};

pub struct ViewCache {
    entries: HashMap<String, ViewInstance>,
    /// Access order for LRU-policy entries only. Front = oldest.
    lru_order: VecDeque<String>,
    capacity: usize,
    scene: Arc<dyn SceneGraph>,
}

impl ViewCache {
    pub fn new(capacity: usize, scene: Arc<dyn SceneGraph>) -> Self {
        Self {
            entries: HashMap::new(),
            lru_order: VecDeque::new(),
            capacity,
            scene,
        }
    }

    /// Store a detached instance per its config's policy.
    ///
    /// `DestroyImmediately` instances are disposed right here. `Lru` inserts
    /// count toward capacity and may evict the least-recently-used entry;
    /// `Persistent` inserts never do.
    pub fn put(&mut self, instance: ViewInstance) {
        let key = instance.key().to_string();
        match instance.config.cache_policy {
            CachePolicy::DestroyImmediately => {
                debug!("cache: destroying '{key}' (DestroyImmediately)");
                self.dispose(instance);
            }
            CachePolicy::Lru => {
                // Re-put of a cached key refreshes its position.
                if self.entries.insert(key.clone(), instance).is_some() {
                    self.lru_order.retain(|k| k != &key);
                }
                self.lru_order.push_back(key);
                while self.lru_order.len() > self.capacity {
                    // Front of the order is the least recently used.
                    let evicted_key = match self.lru_order.pop_front() {
                        Some(k) => k,
                        None => break,
                    };
                    if let Some(evicted) = self.entries.remove(&evicted_key) {
                        debug!("cache: evicting '{evicted_key}' (LRU capacity {})", self.capacity);
                        self.dispose(evicted);
                    }
                }
            }
            CachePolicy::Persistent => {
                self.entries.insert(key, instance);
            }
        }
    }

    /// Remove and return the cached instance for `config`, if any.
    pub fn take(&mut self, config: &Arc<ViewConfig>) -> Option<ViewInstance> {
        let instance = self.entries.remove(&config.key)?;
        self.lru_order.retain(|k| k != &config.key);
        debug!("cache: hit for '{}'", config.key);
        Some(instance)
    }

    /// Dispose and destroy every cached instance, regardless of policy.
    pub fn clear(&mut self) {
        let count = self.entries.len();
        for (_, instance) in self.entries.drain().collect::<Vec<_>>() {
            self.dispose(instance);
        }
        self.lru_order.clear();
        if count > 0 {
            debug!("cache: cleared {count} entries");
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Cached keys, unordered. For diagnostics.
    pub fn snapshot(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.keys().cloned().collect();
        keys.sort();
        keys
    }

    fn dispose(&self, mut instance: ViewInstance) {
        instance.controller.on_disposed();
        self.scene.destroy(instance.node);
    }
}
