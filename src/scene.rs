//! # Scene Graph Interface
//!
//! The rendering engine owns the node tree; this core only needs a handful
//! of primitives from it: create/attach/detach/destroy, sibling-index
//! bookkeeping for z-order, visibility, and a translucent rectangle for the
//! popup mask. Everything is expressed against the `SceneGraph` trait so the
//! navigation core stays engine-agnostic and fully testable without a
//! renderer.

use std::fmt;

/// Opaque handle into the engine's node tree.
///
/// Handles are minted by the `SceneGraph` implementation and have no meaning
/// outside of it. A destroyed node's handle must not be reused by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u64);

impl NodeId {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// RGBA color, components in `0.0..=1.0`. Used only for the popup mask fill.
pub type Rgba = [f32; 4];

/// Scene-graph primitives consumed by the navigation core.
///
/// Implemented by the embedding engine. Methods take `&self`; implementations
/// are expected to use interior mutability (engine node tables are shared
/// with the render loop anyway).
pub trait SceneGraph: Send + Sync {
    /// Create a detached node with a debug name.
    fn create_node(&self, name: &str) -> NodeId;

    /// Attach `child` as the last child of `parent`.
    fn add_child(&self, parent: NodeId, child: NodeId);

    /// Remove `node` from its parent, keeping it alive for later re-attach.
    fn detach(&self, node: NodeId);

    /// Detach `node` and free it together with its whole subtree. The
    /// navigation core relies on this when tearing down layer roots (the
    /// popup mask, for one, is only ever freed as a child of the popup
    /// root). All freed handles are dead afterwards.
    fn destroy(&self, node: NodeId);

    /// Position of `node` among its siblings (0 = bottom-most / drawn first).
    fn sibling_index(&self, node: NodeId) -> usize;

    /// Move `node` to the given position among its siblings.
    fn set_sibling_index(&self, node: NodeId, index: usize);

    fn set_visible(&self, node: NodeId, visible: bool);

    /// Fill `node` with a full-screen translucent rectangle.
    fn draw_mask_rect(&self, node: NodeId, color: Rgba);

    /// Remove any drawing from `node`, leaving an invisible (but still
    /// input-blocking) plane.
    fn clear_drawing(&self, node: NodeId);
}
