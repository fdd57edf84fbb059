//! # Live View Instances
//!
//! A `ViewInstance` is a view that exists in the scene: a node handle, the
//! controller driving it, and the config it was opened from. Ownership is
//! strict — at any moment an instance is held by exactly one of the active
//! stack, the layer's cache, or a transition in flight (moved out of the
//! shared state while awaiting animations, put back afterwards).

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use super::config::ViewConfig;
use super::controller::ViewController;
use crate::scene::NodeId;

pub struct ViewInstance {
    /// Stable identity for diagnostics; instances of the same config opened
    /// at different times get different ids.
    pub id: Uuid,
    pub node: NodeId,
    pub controller: Box<dyn ViewController>,
    pub config: Arc<ViewConfig>,
    /// Whether this instance is the visually active top of its layer.
    /// Disappear hooks fire only while active: a view covered by a newer
    /// push was already notified and must not get a second pair when it is
    /// later truncated, closed in bulk, or removed by identity.
    pub active: bool,
}

impl ViewInstance {
    pub fn new(node: NodeId, controller: Box<dyn ViewController>, config: Arc<ViewConfig>) -> Self {
        Self {
            id: Uuid::new_v4(),
            node,
            controller,
            config,
            active: false,
        }
    }

    pub fn key(&self) -> &str {
        &self.config.key
    }
}

impl fmt::Debug for ViewInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ViewInstance({} {} {})", self.config.key, self.id, self.node)
    }
}
