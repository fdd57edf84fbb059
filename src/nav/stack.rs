//! # Stack Navigator
//!
//! Generic push/pop/truncate/close-by-identity stack used by the Page and
//! Popup layers. Owns one `ViewCache` and drives the injected factory and
//! animator hooks.
//!
//! ## Locking
//!
//! Stack state sits behind a mutex locked only between suspension points.
//! While an instance is being animated it is moved out of the stack entirely
//! ("in transit"), so no lock is ever held across an await. Callers must not
//! issue overlapping `open`/`close` calls on the same stack — the core does
//! not serialize them (only `back()` on the controller carries a guard).

use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, warn};
use parking_lot::Mutex;

use super::cache::ViewCache;
use crate::scene::{NodeId, SceneGraph};
use crate::view::{ViewAnimator, ViewConfig, ViewFactory, ViewInstance, ViewKind, ViewParams};

struct StackState {
    stack: Vec<ViewInstance>,
    cache: ViewCache,
    root: Option<NodeId>,
}

pub struct StackNavigator {
    layer: ViewKind,
    state: Mutex<StackState>,
    scene: Arc<dyn SceneGraph>,
    factory: Arc<dyn ViewFactory>,
    animator: Arc<dyn ViewAnimator>,
    transition_timeout: Option<Duration>,
}

impl StackNavigator {
    pub fn new(
        layer: ViewKind,
        cache_capacity: usize,
        scene: Arc<dyn SceneGraph>,
        factory: Arc<dyn ViewFactory>,
        animator: Arc<dyn ViewAnimator>,
        transition_timeout: Option<Duration>,
    ) -> Self {
        Self {
            layer,
            state: Mutex::new(StackState {
                stack: Vec::new(),
                cache: ViewCache::new(cache_capacity, scene.clone()),
                root: None,
            }),
            scene,
            factory,
            animator,
            transition_timeout,
        }
    }

    /// Set the layer root all instances attach under. Called by
    /// `NavigationController::ensure_root`.
    pub fn set_root(&self, node: Option<NodeId>) {
        self.state.lock().root = node;
    }

    /// Open `config` on top of this stack.
    ///
    /// If the config is already in the stack this is a re-entrant
    /// navigation: everything above it is truncated without animation and
    /// the target only regains focus. Otherwise the current top plays its
    /// exit sequence, an instance is acquired (cache hit or fresh
    /// instantiation), and the new view plays its enter sequence before
    /// being pushed.
    pub async fn open(&self, config: Arc<ViewConfig>, params: ViewParams) {
        if self.truncate_to(&config) {
            return;
        }

        // Outgoing top stays in the stack but is no longer the visually
        // active view once the transition completes.
        let exiting = {
            let mut st = self.state.lock();
            st.stack.last_mut().filter(|top| top.active).map(|top| {
                top.controller.on_will_disappear();
                (top.node, top.config.exit_effect.clone())
            })
        };
        if let Some((node, effect)) = exiting {
            if let Some(effect) = effect {
                self.play_exit(&effect, node).await;
            }
            if let Some(top) = self.state.lock().stack.last_mut() {
                top.controller.on_did_disappear();
                top.active = false;
            }
        }

        let Some(root) = self.state.lock().root else {
            warn!("{}: open '{}' before ensure_root, ignoring", self.layer, config.key);
            return;
        };

        let mut instance = match self.acquire(&config, root).await {
            Some(instance) => instance,
            None => return,
        };

        instance.controller.on_will_appear(&params);
        if let Some(effect) = &config.enter_effect {
            self.play_enter(effect, instance.node, &params).await;
        }
        instance.controller.on_did_appear();
        instance.active = true;

        debug!("{}: opened '{}' ({})", self.layer, config.key, instance.id);
        self.state.lock().stack.push(instance);
    }

    /// Close the top view. No-op on an empty stack.
    pub async fn close(&self) {
        let Some(mut instance) = self.state.lock().stack.pop() else {
            debug!("{}: close on empty stack, ignoring", self.layer);
            return;
        };

        if instance.active {
            instance.controller.on_will_disappear();
            if let Some(effect) = instance.config.exit_effect.clone() {
                self.play_exit(&effect, instance.node).await;
            }
            instance.controller.on_did_disappear();
            instance.active = false;
        }
        self.scene.detach(instance.node);
        debug!("{}: closed '{}'", self.layer, instance.key());

        let mut st = self.state.lock();
        st.cache.put(instance);
        if let Some(top) = st.stack.last_mut() {
            top.controller.on_focus();
            top.active = true;
        }
    }

    /// Close a specific entry by identity, wherever it sits in the stack.
    /// The new top regains focus only when the removed entry was the top.
    pub async fn close_by(&self, config: &Arc<ViewConfig>) {
        let (instance, was_top) = {
            let mut st = self.state.lock();
            match st.stack.iter().position(|v| v.key() == config.key) {
                Some(index) => {
                    let was_top = index + 1 == st.stack.len();
                    (st.stack.remove(index), was_top)
                }
                None => {
                    warn!("{}: close_by '{}' not in stack, ignoring", self.layer, config.key);
                    return;
                }
            }
        };

        let mut instance = instance;
        if instance.active {
            instance.controller.on_will_disappear();
            if let Some(effect) = instance.config.exit_effect.clone() {
                self.play_exit(&effect, instance.node).await;
            }
            instance.controller.on_did_disappear();
            instance.active = false;
        }
        self.scene.detach(instance.node);
        debug!("{}: closed '{}' by identity", self.layer, instance.key());

        let mut st = self.state.lock();
        st.cache.put(instance);
        if was_top && let Some(top) = st.stack.last_mut() {
            top.controller.on_focus();
            top.active = true;
        }
    }

    /// Pop every entry top to bottom. Bulk teardown: disappear hooks fire,
    /// exit animations do not.
    pub fn clear(&self) {
        let mut st = self.state.lock();
        let StackState { stack, cache, .. } = &mut *st;
        while let Some(mut instance) = stack.pop() {
            if instance.active {
                instance.controller.on_will_disappear();
                instance.controller.on_did_disappear();
                instance.active = false;
            }
            self.scene.detach(instance.node);
            cache.put(instance);
        }
    }

    /// Flush the cache, destroying every retained instance.
    pub fn clear_cache(&self) {
        self.state.lock().cache.clear();
    }

    /// Give the current top an `on_focus` call.
    pub fn focus_top(&self) {
        if let Some(top) = self.state.lock().stack.last_mut() {
            top.controller.on_focus();
            top.active = true;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().stack.is_empty()
    }

    pub fn len(&self) -> usize {
        self.state.lock().stack.len()
    }

    /// Node and config of the current top, for mask coordination.
    pub fn top_entry(&self) -> Option<(NodeId, Arc<ViewConfig>)> {
        let st = self.state.lock();
        st.stack.last().map(|top| (top.node, top.config.clone()))
    }

    /// Keys bottom→top.
    pub fn stack_keys(&self) -> Vec<String> {
        self.state.lock().stack.iter().map(|v| v.key().to_string()).collect()
    }

    pub fn cache_snapshot(&self) -> Vec<String> {
        self.state.lock().cache.snapshot()
    }

    /// Re-entrant navigation: if `config` is already in the stack, truncate
    /// everything above it (disappear hooks fire synchronously, nodes are
    /// detached and cached per policy, no animation) and refocus the target.
    /// Returns true when handled.
    fn truncate_to(&self, config: &Arc<ViewConfig>) -> bool {
        let mut st = self.state.lock();
        let Some(index) = st.stack.iter().position(|v| v.key() == config.key) else {
            return false;
        };

        let removed_count = st.stack.len() - index - 1;
        let StackState { stack, cache, .. } = &mut *st;
        // Top-down, same order a sequence of closes would run. Buried
        // entries already received their disappear pair when they were
        // covered; only the active top gets one here.
        for mut instance in stack.split_off(index + 1).into_iter().rev() {
            if instance.active {
                instance.controller.on_will_disappear();
                instance.controller.on_did_disappear();
                instance.active = false;
            }
            self.scene.detach(instance.node);
            cache.put(instance);
        }
        if let Some(top) = stack.last_mut() {
            top.controller.on_focus();
            top.active = true;
        }
        debug!(
            "{}: re-entrant open of '{}', truncated {} above it",
            self.layer, config.key, removed_count
        );
        true
    }

    /// Cache hit re-attaches the retained node; miss instantiates through
    /// the factory and fires `on_created`.
    async fn acquire(&self, config: &Arc<ViewConfig>, root: NodeId) -> Option<ViewInstance> {
        if let Some(instance) = self.state.lock().cache.take(config) {
            self.scene.add_child(root, instance.node);
            return Some(instance);
        }

        let created = self.factory.create_instance(config, root);
        let created = match self.transition_timeout {
            Some(timeout) => match tokio::time::timeout(timeout, created).await {
                Ok(result) => result,
                Err(_) => {
                    error!(
                        "{}: instantiation of '{}' timed out after {:?}",
                        self.layer, config.key, timeout
                    );
                    return None;
                }
            },
            None => created.await,
        };

        match created {
            Some(mut instance) => {
                instance.controller.on_created();
                if instance.key() != config.key {
                    warn!(
                        "{}: factory returned instance keyed '{}' for '{}'",
                        self.layer,
                        instance.key(),
                        config.key
                    );
                }
                Some(instance)
            }
            None => {
                error!("{}: template load failed for '{}'", self.layer, config.key);
                None
            }
        }
    }

    async fn play_enter(&self, effect: &str, node: NodeId, params: &ViewParams) {
        let fut = self.animator.play_enter(effect, node, params);
        match self.transition_timeout {
            Some(timeout) => {
                if tokio::time::timeout(timeout, fut).await.is_err() {
                    error!("{}: enter effect '{effect}' timed out after {timeout:?}", self.layer);
                }
            }
            None => fut.await,
        }
    }

    async fn play_exit(&self, effect: &str, node: NodeId) {
        let fut = self.animator.play_exit(effect, node);
        match self.transition_timeout {
            Some(timeout) => {
                if tokio::time::timeout(timeout, fut).await.is_err() {
                    error!("{}: exit effect '{effect}' timed out after {timeout:?}", self.layer);
                }
            }
            None => fut.await,
        }
    }
}
