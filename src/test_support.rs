//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::scene::{NodeId, Rgba, SceneGraph};
use crate::view::{
    CachePolicy, ViewAnimator, ViewConfig, ViewController, ViewFactory, ViewInstance, ViewKind,
    ViewParams,
};

// ============================================================================
// Event Log
// ============================================================================

/// Shared log of lifecycle events as `"key:hook"` strings, in call order.
pub type EventLog = Arc<Mutex<Vec<String>>>;

pub fn test_log() -> EventLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn push_event(log: &EventLog, key: &str, hook: &str) {
    log.lock().push(format!("{key}:{hook}"));
}

/// All hooks recorded for `key`, in order, without the key prefix.
pub fn events_for(log: &EventLog, key: &str) -> Vec<String> {
    let prefix = format!("{key}:");
    log.lock()
        .iter()
        .filter_map(|e| e.strip_prefix(&prefix).map(str::to_string))
        .collect()
}

/// Raw event strings, in order.
pub fn all_events(log: &EventLog) -> Vec<String> {
    log.lock().clone()
}

// ============================================================================
// Recording Scene Graph
// ============================================================================

struct NodeRecord {
    name: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    visible: bool,
    mask_color: Option<Rgba>,
}

struct SceneState {
    nodes: HashMap<u64, NodeRecord>,
    next_id: u64,
    destroyed: usize,
}

/// In-memory scene graph that records structure, visibility and mask
/// drawing, so tests can assert on topology without a renderer.
pub struct RecordingScene {
    state: Mutex<SceneState>,
}

impl RecordingScene {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(SceneState {
                nodes: HashMap::new(),
                next_id: 1,
                destroyed: 0,
            }),
        })
    }

    pub fn is_alive(&self, node: NodeId) -> bool {
        self.state.lock().nodes.contains_key(&node.raw())
    }

    pub fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        self.state.lock().nodes.get(&node.raw()).and_then(|n| n.parent)
    }

    pub fn children_of(&self, node: NodeId) -> Vec<NodeId> {
        self.state
            .lock()
            .nodes
            .get(&node.raw())
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    pub fn is_visible(&self, node: NodeId) -> bool {
        self.state.lock().nodes.get(&node.raw()).is_some_and(|n| n.visible)
    }

    pub fn mask_color_of(&self, node: NodeId) -> Option<Rgba> {
        self.state.lock().nodes.get(&node.raw()).and_then(|n| n.mask_color)
    }

    pub fn name_of(&self, node: NodeId) -> String {
        self.state
            .lock()
            .nodes
            .get(&node.raw())
            .map(|n| n.name.clone())
            .unwrap_or_default()
    }

    pub fn destroyed_count(&self) -> usize {
        self.state.lock().destroyed
    }

    fn unlink(state: &mut SceneState, node: NodeId) {
        if let Some(parent) = state.nodes.get(&node.raw()).and_then(|n| n.parent)
            && let Some(record) = state.nodes.get_mut(&parent.raw())
        {
            record.children.retain(|c| *c != node);
        }
        if let Some(record) = state.nodes.get_mut(&node.raw()) {
            record.parent = None;
        }
    }
}

impl SceneGraph for RecordingScene {
    fn create_node(&self, name: &str) -> NodeId {
        let mut state = self.state.lock();
        let id = state.next_id;
        state.next_id += 1;
        state.nodes.insert(
            id,
            NodeRecord {
                name: name.to_string(),
                parent: None,
                children: Vec::new(),
                visible: true,
                mask_color: None,
            },
        );
        NodeId::from_raw(id)
    }

    fn add_child(&self, parent: NodeId, child: NodeId) {
        let mut state = self.state.lock();
        RecordingScene::unlink(&mut state, child);
        if let Some(record) = state.nodes.get_mut(&parent.raw()) {
            record.children.push(child);
        }
        if let Some(record) = state.nodes.get_mut(&child.raw()) {
            record.parent = Some(parent);
        }
    }

    fn detach(&self, node: NodeId) {
        RecordingScene::unlink(&mut self.state.lock(), node);
    }

    fn destroy(&self, node: NodeId) {
        let mut state = self.state.lock();
        RecordingScene::unlink(&mut state, node);
        // Whole subtree goes away.
        let mut pending = vec![node];
        while let Some(current) = pending.pop() {
            if let Some(record) = state.nodes.remove(&current.raw()) {
                state.destroyed += 1;
                pending.extend(record.children);
            }
        }
    }

    fn sibling_index(&self, node: NodeId) -> usize {
        let state = self.state.lock();
        state
            .nodes
            .get(&node.raw())
            .and_then(|n| n.parent)
            .and_then(|p| state.nodes.get(&p.raw()))
            .and_then(|p| p.children.iter().position(|c| *c == node))
            .unwrap_or(0)
    }

    fn set_sibling_index(&self, node: NodeId, index: usize) {
        let mut state = self.state.lock();
        let Some(parent) = state.nodes.get(&node.raw()).and_then(|n| n.parent) else {
            return;
        };
        if let Some(record) = state.nodes.get_mut(&parent.raw()) {
            record.children.retain(|c| *c != node);
            let index = index.min(record.children.len());
            record.children.insert(index, node);
        }
    }

    fn set_visible(&self, node: NodeId, visible: bool) {
        if let Some(record) = self.state.lock().nodes.get_mut(&node.raw()) {
            record.visible = visible;
        }
    }

    fn draw_mask_rect(&self, node: NodeId, color: Rgba) {
        if let Some(record) = self.state.lock().nodes.get_mut(&node.raw()) {
            record.mask_color = Some(color);
        }
    }

    fn clear_drawing(&self, node: NodeId) {
        if let Some(record) = self.state.lock().nodes.get_mut(&node.raw()) {
            record.mask_color = None;
        }
    }
}

// ============================================================================
// Probe Controller
// ============================================================================

/// Controller that appends every lifecycle call to the shared event log.
pub struct Probe {
    key: String,
    log: EventLog,
}

impl Probe {
    pub fn new(key: impl Into<String>, log: &EventLog) -> Self {
        Self {
            key: key.into(),
            log: log.clone(),
        }
    }
}

impl Default for Probe {
    fn default() -> Self {
        Self {
            key: "unbound".to_string(),
            log: test_log(),
        }
    }
}

impl ViewController for Probe {
    fn on_created(&mut self) {
        push_event(&self.log, &self.key, "created");
    }
    fn on_will_appear(&mut self, _params: &ViewParams) {
        push_event(&self.log, &self.key, "will_appear");
    }
    fn on_did_appear(&mut self) {
        push_event(&self.log, &self.key, "did_appear");
    }
    fn on_will_disappear(&mut self) {
        push_event(&self.log, &self.key, "will_disappear");
    }
    fn on_did_disappear(&mut self) {
        push_event(&self.log, &self.key, "did_disappear");
    }
    fn on_focus(&mut self) {
        push_event(&self.log, &self.key, "focus");
    }
    fn on_disposed(&mut self) {
        push_event(&self.log, &self.key, "disposed");
    }
}

// ============================================================================
// Config / Instance Helpers
// ============================================================================

/// A Page config with the given cache policy and no animation effects.
pub fn probe_config(key: &str, policy: CachePolicy) -> Arc<ViewConfig> {
    Arc::new(
        ViewConfig::new::<Probe>(key, ViewKind::Page, format!("tpl/{key}")).cache_policy(policy),
    )
}

/// A Page config that plays enter/exit effects.
pub fn animated_config(key: &str, policy: CachePolicy) -> Arc<ViewConfig> {
    Arc::new(
        ViewConfig::new::<Probe>(key, ViewKind::Page, format!("tpl/{key}"))
            .cache_policy(policy)
            .enter_effect("fade_in")
            .exit_effect("fade_out"),
    )
}

pub fn popup_config(key: &str, modal: bool, close_on_mask_click: bool) -> Arc<ViewConfig> {
    Arc::new(
        ViewConfig::new::<Probe>(key, ViewKind::Popup, format!("tpl/{key}"))
            .cache_policy(CachePolicy::Lru)
            .exit_effect("pop_out")
            .modal(modal)
            .close_on_mask_click(close_on_mask_click),
    )
}

pub fn screen_config(key: &str) -> Arc<ViewConfig> {
    Arc::new(ViewConfig::new::<Probe>(key, ViewKind::Screen, format!("tpl/{key}")))
}

/// A detached instance with a probe controller, for cache tests.
pub fn probe_instance(
    scene: &Arc<RecordingScene>,
    config: &Arc<ViewConfig>,
    log: &EventLog,
) -> ViewInstance {
    let node = scene.create_node(&config.key);
    ViewInstance::new(node, Box::new(Probe::new(&config.key, log)), config.clone())
}

// ============================================================================
// Test Factory
// ============================================================================

/// Factory double: builds probe instances, counts instantiations per key,
/// and can be told to fail or hang for specific keys.
pub struct TestFactory {
    scene: Arc<RecordingScene>,
    log: EventLog,
    creates: Mutex<HashMap<String, usize>>,
    fail_keys: Mutex<HashSet<String>>,
    hang_keys: Mutex<HashSet<String>>,
}

impl TestFactory {
    pub fn new(scene: &Arc<RecordingScene>, log: &EventLog) -> Arc<Self> {
        Arc::new(Self {
            scene: scene.clone(),
            log: log.clone(),
            creates: Mutex::new(HashMap::new()),
            fail_keys: Mutex::new(HashSet::new()),
            hang_keys: Mutex::new(HashSet::new()),
        })
    }

    /// Make instantiation of `key` fail (template load failure).
    pub fn fail_for(&self, key: &str) {
        self.fail_keys.lock().insert(key.to_string());
    }

    /// Make instantiation of `key` never resolve (stalled asset load).
    pub fn hang_for(&self, key: &str) {
        self.hang_keys.lock().insert(key.to_string());
    }

    /// How many times `create_instance` ran for `key`.
    pub fn create_count(&self, key: &str) -> usize {
        self.creates.lock().get(key).copied().unwrap_or(0)
    }
}

#[async_trait]
impl ViewFactory for TestFactory {
    async fn create_instance(
        &self,
        config: &Arc<ViewConfig>,
        parent: NodeId,
    ) -> Option<ViewInstance> {
        *self.creates.lock().entry(config.key.clone()).or_insert(0) += 1;
        if self.fail_keys.lock().contains(&config.key) {
            return None;
        }
        if self.hang_keys.lock().contains(&config.key) {
            std::future::pending::<()>().await;
        }
        let node = self.scene.create_node(&config.key);
        self.scene.add_child(parent, node);
        Some(ViewInstance::new(
            node,
            Box::new(Probe::new(&config.key, &self.log)),
            config.clone(),
        ))
    }
}

// ============================================================================
// Test Animator
// ============================================================================

/// Animator double: records plays and yields once, so overlapping
/// navigation futures genuinely interleave across event-loop turns.
pub struct TestAnimator {
    log: EventLog,
    hang_effects: Mutex<HashSet<String>>,
}

impl TestAnimator {
    pub fn new(log: &EventLog) -> Arc<Self> {
        Arc::new(Self {
            log: log.clone(),
            hang_effects: Mutex::new(HashSet::new()),
        })
    }

    /// Make the given effect id never resolve (stalled animation).
    pub fn hang_for(&self, effect: &str) {
        self.hang_effects.lock().insert(effect.to_string());
    }
}

#[async_trait]
impl ViewAnimator for TestAnimator {
    async fn play_enter(&self, effect: &str, _node: NodeId, _params: &ViewParams) {
        self.log.lock().push(format!("anim:enter:{effect}"));
        if self.hang_effects.lock().contains(effect) {
            std::future::pending::<()>().await;
        }
        tokio::task::yield_now().await;
    }

    async fn play_exit(&self, effect: &str, _node: NodeId) {
        self.log.lock().push(format!("anim:exit:{effect}"));
        if self.hang_effects.lock().contains(effect) {
            std::future::pending::<()>().await;
        }
        tokio::task::yield_now().await;
    }
}
